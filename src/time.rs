use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

use crate::model::{DayOfWeek, Minutes};

static TIME_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(AM|PM)").expect("static 12h time pattern")
});

/// Wall-clock hours and minutes on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
}

impl ClockTime {
    pub const DEFAULT: ClockTime = ClockTime { hours: 9, minutes: 0 };
}

/// Parse `"H:MM AM"` / `"H:MM PM"` (case-insensitive) into 24-hour time.
/// Falls back to 9:00 when the text doesn't match.
pub fn parse_time_12h(text: &str) -> ClockTime {
    let Some(caps) = TIME_12H.captures(text) else {
        return ClockTime::DEFAULT;
    };
    let (Ok(mut hours), Ok(minutes)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return ClockTime::DEFAULT;
    };
    let pm = caps[3].eq_ignore_ascii_case("PM");
    if pm && hours != 12 {
        hours += 12;
    } else if !pm && hours == 12 {
        hours = 0;
    }
    ClockTime { hours, minutes }
}

/// `"HH:MM"` → minutes since midnight. Components are not range-checked;
/// `None` when one isn't a number or the total overflows `Minutes`.
pub fn parse_time_24h(text: &str) -> Option<Minutes> {
    let (h, m) = text.split_once(':')?;
    let hours: Minutes = h.trim().parse().ok()?;
    let minutes: Minutes = m.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

pub fn format_hhmm(minutes: Minutes) -> String {
    format!("{:02}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}

pub fn format_time_12h(minutes: Minutes) -> String {
    let hours = minutes.div_euclid(60).rem_euclid(24);
    let suffix = if hours < 12 { "AM" } else { "PM" };
    let display = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:{:02} {suffix}", minutes.rem_euclid(60))
}

pub fn day_of_week(date: NaiveDate) -> DayOfWeek {
    DayOfWeek::from(date.weekday())
}

/// `YYYY-MM-DD` from local calendar fields.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn minutes_of_day(t: &NaiveDateTime) -> Minutes {
    (t.hour() * 60 + t.minute()) as Minutes
}

/// Datetime on `date` at `minutes` past midnight, if it names a valid time of day.
pub fn at_minutes(date: NaiveDate, minutes: Minutes) -> Option<NaiveDateTime> {
    if !(0..24 * 60).contains(&minutes) {
        return None;
    }
    date.and_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Serde adapter storing `Minutes` as `"HH:MM"`.
pub mod hhmm {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::model::Minutes;

    pub fn serialize<S: Serializer>(minutes: &Minutes, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hhmm(*minutes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Minutes, D::Error> {
        let text = String::deserialize(d)?;
        super::parse_time_24h(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid HH:MM time: {text:?}")))
    }
}

/// Serde adapter for optional `"HH:MM"` fields.
pub mod hhmm_opt {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::model::Minutes;

    pub fn serialize<S: Serializer>(minutes: &Option<Minutes>, s: S) -> Result<S::Ok, S::Error> {
        match minutes {
            Some(m) => s.serialize_some(&super::format_hhmm(*m)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Minutes>, D::Error> {
        let Some(text) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        super::parse_time_24h(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid HH:MM time: {text:?}")))
    }
}
