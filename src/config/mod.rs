//! Configuration module

mod site;

pub use site::CategoryMapping;
pub use site::HeaderConfig;
pub use site::LinkItem;
pub use site::PaginationConfig;
pub use site::ThemeConfig;
pub use site::ThemeStyle;
