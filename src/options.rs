//! The `Intl.DateTimeFormat` option record and its field catalogue.
//!
//! A [`FormatConfig`] has one optional slot per known option. The form
//! writes raw text into the slots, so a slot may hold an empty string;
//! [`FormatConfig::filtered`] is the canonical form with those placeholders
//! removed, and it is what gets stored, exported and handed to a formatter.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FormError;

/// Every option the tool knows about, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    HourCycle,
    DateStyle,
    TimeStyle,
    DayPeriod,
    Weekday,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    TimeZoneName,
    TimeZone,
    Hour12,
}

pub const HOUR_CYCLES: &[&str] = &["h11", "h12", "h23", "h24"];
pub const STYLES: &[&str] = &["full", "long", "medium", "short"];
pub const TEXT_WIDTHS: &[&str] = &["long", "short", "narrow"];
pub const NUMERIC_WIDTHS: &[&str] = &["numeric", "2-digit"];
pub const MONTH_WIDTHS: &[&str] = &["numeric", "2-digit", "long", "short", "narrow"];
pub const TIME_ZONE_NAMES: &[&str] = &["long", "short"];
pub const HOUR12_VALUES: &[&str] = &["true", "false"];

impl Field {
    pub const ALL: [Self; 14] = [
        Self::HourCycle,
        Self::DateStyle,
        Self::TimeStyle,
        Self::DayPeriod,
        Self::Weekday,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::TimeZoneName,
        Self::TimeZone,
        Self::Hour12,
    ];

    /// Option name as spelled in `Intl.DateTimeFormat` and in documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HourCycle => "hourCycle",
            Self::DateStyle => "dateStyle",
            Self::TimeStyle => "timeStyle",
            Self::DayPeriod => "dayPeriod",
            Self::Weekday => "weekday",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::TimeZoneName => "timeZoneName",
            Self::TimeZone => "timeZone",
            Self::Hour12 => "hour12",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Values offered for the option. Empty for free-text options.
    #[must_use]
    pub const fn allowed_values(self) -> &'static [&'static str] {
        match self {
            Self::HourCycle => HOUR_CYCLES,
            Self::DateStyle | Self::TimeStyle => STYLES,
            Self::DayPeriod | Self::Weekday => TEXT_WIDTHS,
            Self::Year | Self::Day | Self::Hour | Self::Minute | Self::Second => NUMERIC_WIDTHS,
            Self::Month => MONTH_WIDTHS,
            Self::TimeZoneName => TIME_ZONE_NAMES,
            Self::TimeZone => &[],
            Self::Hour12 => HOUR12_VALUES,
        }
    }

    /// Date/time component options, the ones that clash with the styles.
    #[must_use]
    pub const fn is_component(self) -> bool {
        matches!(
            self,
            Self::Weekday
                | Self::Year
                | Self::Month
                | Self::Day
                | Self::DayPeriod
                | Self::Hour
                | Self::Minute
                | Self::Second
                | Self::TimeZoneName
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed value of a set field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Older stored presets carry the form's `"true"`/`"false"` text here.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_hour12"
    )]
    #[schemars(with = "Option<bool>")]
    pub hour12: Option<bool>,
}

impl FormatConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for text options, mostly for tests and defaults.
    ///
    /// # Panics
    /// Panics when `field` is [`Field::Hour12`]; use [`Self::with_hour12`].
    #[must_use]
    pub fn with(mut self, field: Field, value: &str) -> Self {
        let slot = self
            .text_slot_mut(field)
            .expect("hour12 is not a text option");
        *slot = Some(value.to_owned());
        self
    }

    #[must_use]
    pub fn with_hour12(mut self, value: bool) -> Self {
        self.hour12 = Some(value);
        self
    }

    fn text_slot(&self, field: Field) -> Option<&Option<String>> {
        match field {
            Field::HourCycle => Some(&self.hour_cycle),
            Field::DateStyle => Some(&self.date_style),
            Field::TimeStyle => Some(&self.time_style),
            Field::DayPeriod => Some(&self.day_period),
            Field::Weekday => Some(&self.weekday),
            Field::Year => Some(&self.year),
            Field::Month => Some(&self.month),
            Field::Day => Some(&self.day),
            Field::Hour => Some(&self.hour),
            Field::Minute => Some(&self.minute),
            Field::Second => Some(&self.second),
            Field::TimeZoneName => Some(&self.time_zone_name),
            Field::TimeZone => Some(&self.time_zone),
            Field::Hour12 => None,
        }
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::HourCycle => Some(&mut self.hour_cycle),
            Field::DateStyle => Some(&mut self.date_style),
            Field::TimeStyle => Some(&mut self.time_style),
            Field::DayPeriod => Some(&mut self.day_period),
            Field::Weekday => Some(&mut self.weekday),
            Field::Year => Some(&mut self.year),
            Field::Month => Some(&mut self.month),
            Field::Day => Some(&mut self.day),
            Field::Hour => Some(&mut self.hour),
            Field::Minute => Some(&mut self.minute),
            Field::Second => Some(&mut self.second),
            Field::TimeZoneName => Some(&mut self.time_zone_name),
            Field::TimeZone => Some(&mut self.time_zone),
            Field::Hour12 => None,
        }
    }

    /// Value of a field if it is set. Empty text counts as unset.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldValue<'_>> {
        match self.text_slot(field) {
            Some(slot) => slot
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(FieldValue::Text),
            None => self.hour12.map(FieldValue::Flag),
        }
    }

    /// Text of a string option if it is set.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_set(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Store raw form text into a field. Empty text leaves an unset
    /// placeholder; `hour12` takes `true`, `false` or empty.
    ///
    /// # Errors
    /// Returns [`FormError::InvalidHour12`] for any other `hour12` text.
    pub fn set(&mut self, field: Field, text: &str) -> Result<(), FormError> {
        if let Some(slot) = self.text_slot_mut(field) {
            *slot = Some(text.to_owned());
            return Ok(());
        }
        self.hour12 = parse_hour12(text)?;
        Ok(())
    }

    pub fn clear(&mut self, field: Field) {
        match self.text_slot_mut(field) {
            Some(slot) => *slot = None,
            None => self.hour12 = None,
        }
    }

    /// Set fields in form order.
    pub fn set_fields(&self) -> impl Iterator<Item = (Field, FieldValue<'_>)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Set fields ordered by option name, the order documents use.
    #[must_use]
    pub fn sorted_fields(&self) -> Vec<(Field, FieldValue<'_>)> {
        let mut fields: Vec<_> = self.set_fields().collect();
        fields.sort_by_key(|(field, _)| field.name());
        fields
    }

    /// Copy with every unset placeholder removed.
    #[must_use]
    pub fn filtered(&self) -> Self {
        let mut out = Self::default();
        for field in Field::ALL {
            match self.get(field) {
                Some(FieldValue::Text(text)) => {
                    if let Some(slot) = out.text_slot_mut(field) {
                        *slot = Some(text.to_owned());
                    }
                }
                Some(FieldValue::Flag(flag)) => out.hour12 = Some(flag),
                None => {}
            }
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set_fields().next().is_none()
    }

    /// Compact JSON of the filtered options, as handed to `Intl`.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.filtered()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parse the form's `hour12` selection.
///
/// # Errors
/// Returns [`FormError::InvalidHour12`] unless the text is `true`, `false` or empty.
pub fn parse_hour12(text: &str) -> Result<Option<bool>, FormError> {
    match text {
        "" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(FormError::InvalidHour12(other.to_owned())),
    }
}

fn deserialize_hour12<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagOrText {
        Flag(bool),
        Text(String),
    }

    match Option::<FlagOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlagOrText::Flag(flag)) => Ok(Some(flag)),
        Some(FlagOrText::Text(text)) => parse_hour12(&text).map_err(serde::de::Error::custom),
    }
}
