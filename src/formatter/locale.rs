use std::sync::LazyLock;

use regex::Regex;

static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:-[A-Za-z0-9]{1,8})*$").expect("language tag pattern is valid")
});

/// Languages the built-in formatter has data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Korean,
}

/// 12 or 24 hour clock, numbered as in `hourCycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourCycle {
    H11,
    H12,
    H23,
    H24,
}

impl HourCycle {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "h11" => Some(Self::H11),
            "h12" => Some(Self::H12),
            "h23" => Some(Self::H23),
            "h24" => Some(Self::H24),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_twelve_hour(self) -> bool {
        matches!(self, Self::H11 | Self::H12)
    }

    /// Hour as displayed on this clock, from a 0..=23 hour.
    #[must_use]
    pub const fn display_hour(self, hour: u32) -> u32 {
        match self {
            Self::H11 => hour % 12,
            Self::H12 => match hour % 12 {
                0 => 12,
                h => h,
            },
            Self::H23 => hour,
            Self::H24 => match hour {
                0 => 24,
                h => h,
            },
        }
    }
}

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_NARROW: [&str; 12] = ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"];

const WEEKDAYS_LONG: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKDAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const WEEKDAYS_NARROW: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

const WEEKDAYS_KO: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

impl Language {
    /// Language for a BCP 47 tag; `None` when the tag is malformed.
    /// Well-formed tags without data use English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        if !LANGUAGE_TAG.is_match(tag) {
            return None;
        }
        let primary = tag.split('-').next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("ko") {
            Some(Self::Korean)
        } else {
            Some(Self::English)
        }
    }

    #[must_use]
    pub const fn default_hour_cycle(self) -> HourCycle {
        match self {
            Self::English | Self::Korean => HourCycle::H12,
        }
    }

    /// Cycle selected by `hour12`.
    #[must_use]
    pub const fn hour12_cycle(self, hour12: bool) -> HourCycle {
        match (self, hour12) {
            (Self::English | Self::Korean, true) => HourCycle::H12,
            (Self::English | Self::Korean, false) => HourCycle::H23,
        }
    }

    /// `month` is 1-based.
    #[must_use]
    pub fn month_name(self, month: u32, width: &str) -> String {
        let idx = (month as usize).saturating_sub(1) % 12;
        match self {
            Self::English => match width {
                "long" => MONTHS_LONG[idx],
                "narrow" => MONTHS_NARROW[idx],
                _ => MONTHS_SHORT[idx],
            }
            .to_owned(),
            Self::Korean => format!("{month}월"),
        }
    }

    /// `weekday` counts from Sunday = 0.
    #[must_use]
    pub fn weekday_name(self, weekday: u32, width: &str) -> String {
        let idx = weekday as usize % 7;
        match (self, width) {
            (Self::English, "long") => WEEKDAYS_LONG[idx].to_owned(),
            (Self::English, "narrow") => WEEKDAYS_NARROW[idx].to_owned(),
            (Self::English, _) => WEEKDAYS_SHORT[idx].to_owned(),
            (Self::Korean, "long") => format!("{}요일", WEEKDAYS_KO[idx]),
            (Self::Korean, _) => WEEKDAYS_KO[idx].to_owned(),
        }
    }

    /// AM/PM marker.
    #[must_use]
    pub const fn meridiem(self, hour: u32) -> &'static str {
        match (self, hour < 12) {
            (Self::English, true) => "AM",
            (Self::English, false) => "PM",
            (Self::Korean, true) => "오전",
            (Self::Korean, false) => "오후",
        }
    }

    /// Flexible day period for the `dayPeriod` option.
    #[must_use]
    pub fn day_period(self, hour: u32, width: &str) -> &'static str {
        let narrow = width == "narrow";
        match self {
            Self::English => match hour {
                6..=11 => "in the morning",
                12 if narrow => "n",
                12 => "noon",
                13..=17 => "in the afternoon",
                18..=20 => "in the evening",
                _ => "at night",
            },
            Self::Korean => match hour {
                3..=5 => "새벽",
                6..=11 => "오전",
                12 => "정오",
                13..=17 => "오후",
                18..=20 => "저녁",
                _ => "밤",
            },
        }
    }

    /// Text between the date and the time.
    #[must_use]
    pub fn date_time_separator(self, date_style: Option<&str>) -> &'static str {
        match (self, date_style) {
            (Self::English, Some("full" | "long")) => " at ",
            (Self::English, _) => ", ",
            (Self::Korean, _) => " ",
        }
    }

    #[must_use]
    pub const fn range_separator(self) -> &'static str {
        match self {
            Self::English => "\u{2009}\u{2013}\u{2009}",
            Self::Korean => " ~ ",
        }
    }
}
