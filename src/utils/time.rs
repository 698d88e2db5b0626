//! Time helpers shared by the lifecycle coordinator and the retention sweeper

use crate::utils::error::{RelayError, Result};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Format used for every human-facing timestamp stored with an alert
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default zone for rendered timestamps (UTC+8)
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Parse an IANA timezone name, falling back to UTC on unknown names
pub fn parse_timezone_lenient(name: &str) -> Tz {
    match name.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(e) => {
            warn!("Unknown timezone '{}', using UTC: {}", name, e);
            Tz::UTC
        }
    }
}

/// Parse an IANA timezone name strictly
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| RelayError::validation(format!("Invalid timezone '{}': {}", name, e)))
}

/// Parse a daily `HH:MM` time of day
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(value.trim(), "%H:%M")?)
}

/// Render a UTC instant in the display format of `tz`
pub fn format_in(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string()
}

/// Current time rendered in the display format of `tz`
pub fn now_in(tz: Tz) -> String {
    format_in(Utc::now(), tz)
}

/// Alertmanager encodes "no value" as `0001-01-01T00:00:00Z`
pub fn is_zero_time(instant: &DateTime<Utc>) -> bool {
    use chrono::Datelike;
    instant.year() <= 1
}
