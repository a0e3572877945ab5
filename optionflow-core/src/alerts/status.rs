//! Periodic market status heartbeat

use super::BOT_SIGNATURE;
use chrono::{DateTime, Datelike, Weekday};
use chrono_tz::Tz;

/// Weekdays count as open; holidays and session hours are not modelled
pub fn is_market_day(now: &DateTime<Tz>) -> bool {
    !matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn market_status_message(now: &DateTime<Tz>) -> String {
    let status = if is_market_day(now) { "OPEN" } else { "CLOSED" };
    format!(
        "🕒 *Market Status Check*\nStatus: {}\nTime: {}\n{} is running.",
        status,
        now.format("%Y-%m-%d %H:%M:%S %Z"),
        BOT_SIGNATURE
    )
}
