//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Shown in place of a missing date
pub const NO_DATE: &str = "--";

/// Format a post date as `YYYY-MM-DD`
pub fn format_date<Tz: TimeZone>(date: Option<&DateTime<Tz>>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Format an essay date with its time, as `YYYY/MM/DD HH:MM`
pub fn format_essay_date<Tz: TimeZone>(date: Option<&DateTime<Tz>>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.map(|d| d.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Format a date for RSS `pubDate` (RFC 2822)
pub fn date_rfc2822<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc2822()
}
