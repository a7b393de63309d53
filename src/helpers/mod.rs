//! Helper functions shared by the feed, the server and the CLI

mod date;
mod derive;
mod html;
mod list;

pub use date::*;
pub use derive::*;
pub use html::*;
pub use list::*;
