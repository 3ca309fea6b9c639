//! Timestamp helpers. Punch-ins store milliseconds since the Unix epoch.

use chrono::{DateTime, Local, TimeZone, Utc};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn to_local(ts_millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(ts_millis).single()
}

/// Short marker label, e.g. `Nov 30, 14:05`.
pub fn format_label(ts_millis: i64) -> String {
    to_local(ts_millis)
        .map(|dt| dt.format("%b %d, %H:%M").to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// RFC 3339 in local time, used by exports.
pub fn format_rfc3339(ts_millis: i64) -> String {
    to_local(ts_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts_millis.to_string())
}

/// `MM:SS` countdown.
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
