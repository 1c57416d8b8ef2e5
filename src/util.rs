use chrono::{DateTime, Local, NaiveDateTime, Utc};
use crate::error::{LocError, Result};
use crate::model::DATE_FORMAT;

/// Commit timestamps are reported in the local timezone, to the second.
pub fn local_datetime(timestamp: &DateTime<Utc>) -> NaiveDateTime {
    timestamp.with_timezone(&Local).naive_local()
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|e| LocError::InvalidDate(format!("'{input}': {e}")))
}

/// `owner/name` -> `name`
pub fn short_name(repo: &str) -> &str {
    repo.rsplit('/').next().unwrap_or(repo)
}
