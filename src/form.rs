//! State of the tester form.
//!
//! The form holds text exactly as typed; [`update`] applies one [`Action`]
//! and returns the next state. Parsing into instants and filtering the
//! options happens on read.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::FormError;
use crate::options::{Field, FormatConfig};
use crate::preview::RenderMode;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub mode: RenderMode,
    pub date: String,
    pub time: String,
    pub end_date: String,
    pub end_time: String,
    /// Raw option slots; may hold empty placeholders.
    pub options: FormatConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetMode(RenderMode),
    SetDate(String),
    SetTime(String),
    SetEndDate(String),
    SetEndTime(String),
    /// Option text as entered; `hour12` takes `true`, `false` or empty.
    SetOption(Field, String),
    /// Reset every option, keeping the mode and the instants.
    ClearOptions,
    /// Replace the options with a preset's.
    Load(FormatConfig),
}

impl FormState {
    /// Form opened at `now`; the range end is one day later.
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        let end = now.checked_add_signed(TimeDelta::days(1)).unwrap_or(now);
        Self {
            mode: RenderMode::Default,
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            end_time: end.format(TIME_FORMAT).to_string(),
            options: FormatConfig::new(),
        }
    }

    /// The options with unset fields removed.
    #[must_use]
    pub fn options(&self) -> FormatConfig {
        self.options.filtered()
    }

    /// # Errors
    /// Returns [`FormError::InvalidDate`] when the date or time text is malformed.
    pub fn start(&self) -> Result<NaiveDateTime, FormError> {
        instant(&self.date, &self.time, "date", "time")
    }

    /// # Errors
    /// Returns [`FormError::InvalidDate`] when the end date or time text is malformed.
    pub fn end(&self) -> Result<NaiveDateTime, FormError> {
        instant(&self.end_date, &self.end_time, "end date", "end time")
    }

    /// Compact JSON of the filtered options.
    #[must_use]
    pub fn options_json(&self) -> String {
        self.options.to_json()
    }
}

/// Apply one action.
///
/// # Errors
/// Returns [`FormError::InvalidHour12`] when `hour12` text is not
/// `true`, `false` or empty. `state` is left as it was.
pub fn update(state: &FormState, action: Action) -> Result<FormState, FormError> {
    let mut state = state.clone();
    match action {
        Action::SetMode(mode) => state.mode = mode,
        Action::SetDate(text) => state.date = text,
        Action::SetTime(text) => state.time = text,
        Action::SetEndDate(text) => state.end_date = text,
        Action::SetEndTime(text) => state.end_time = text,
        Action::SetOption(field, text) => state.options.set(field, &text)?,
        Action::ClearOptions => state.options = FormatConfig::new(),
        Action::Load(config) => state.options = config,
    }
    Ok(state)
}

/// Date in `YYYY-MM-DD`, time in `HH:MM:SS` or `HH:MM`.
///
/// # Errors
/// Returns [`FormError::InvalidDate`] naming the part that failed to parse.
pub fn parse_instant(date: &str, time: &str) -> Result<NaiveDateTime, FormError> {
    instant(date, time, "date", "time")
}

fn instant(
    date: &str,
    time: &str,
    date_label: &'static str,
    time_label: &'static str,
) -> Result<NaiveDateTime, FormError> {
    let day = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
        FormError::InvalidDate {
            what: date_label,
            value: date.to_owned(),
        }
    })?;
    let time_text = time.trim();
    let clock = NaiveTime::parse_from_str(time_text, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time_text, "%H:%M"))
        .map_err(|_| FormError::InvalidDate {
            what: time_label,
            value: time.to_owned(),
        })?;
    Ok(day.and_time(clock))
}
