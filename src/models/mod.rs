pub mod notes;
pub mod user;

pub use notes::*;
pub use user::*;

use chrono::{DateTime, NaiveDateTime};

/// Render a backend timestamp as `YYYY-MM-DD HH:MM`, falling back to the raw value.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}
