//! Built-in English and Korean date formatting.
//!
//! Instants are wall-clock times in the host zone. They are shifted into the
//! zone named by `timeZone` (or left in the host zone) and then laid out from
//! either the date/time styles or the individual component options. Rejected
//! options produce a failure text shaped like the JavaScript engine's: a
//! context line, the detail, then the typed error line and a stack frame.

mod locale;
mod zone;

pub use locale::{HourCycle, Language};
pub use zone::Zone;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};

use crate::error::FormatterFailure;
use crate::options::{Field, FieldValue, FormatConfig};
use crate::preview::DateTimeFormatter;

const FORMAT_CONTEXT: &str = "Error formatting date.";
const RANGE_CONTEXT: &str = "Error formatting date time range.";

#[derive(Debug, Clone, Copy)]
enum ErrorKind {
    Range,
    Type,
}

#[derive(Debug)]
struct Rejection {
    kind: ErrorKind,
    detail: String,
}

impl Rejection {
    fn range(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Range,
            detail: detail.into(),
        }
    }

    fn type_error(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Type,
            detail: detail.into(),
        }
    }

    fn into_failure(self, context: &str) -> FormatterFailure {
        let kind = match self.kind {
            ErrorKind::Range => "RangeError",
            ErrorKind::Type => "TypeError",
        };
        let detail = self.detail;
        FormatterFailure::new(format!(
            "{context}\n{detail}\n{kind}: {detail}\n    at new DateTimeFormat (<anonymous>)"
        ))
    }
}

/// Formatter for `en` and `ko`; other well-formed locales use English.
#[derive(Debug, Clone)]
pub struct BuiltinFormatter {
    host: Zone,
}

impl Default for BuiltinFormatter {
    fn default() -> Self {
        Self { host: Zone::utc() }
    }
}

struct Resolved<'a> {
    language: Language,
    zone: Zone,
    cycle: HourCycle,
    options: &'a FormatConfig,
    default_date: bool,
}

#[derive(Debug, Clone, Copy)]
struct Clock {
    year: i32,
    month: u32,
    day: u32,
    weekday: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Clock {
    fn at(instant: NaiveDateTime) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
            day: instant.day(),
            weekday: instant.weekday().num_days_from_sunday(),
            hour: instant.hour(),
            minute: instant.minute(),
            second: instant.second(),
        }
    }
}

/// Date and time halves of one formatted instant.
struct Parts {
    date: String,
    time: String,
    separator: &'static str,
}

impl Parts {
    fn joined(&self) -> String {
        match (self.date.is_empty(), self.time.is_empty()) {
            (false, false) => format!("{}{}{}", self.date, self.separator, self.time),
            (false, true) => self.date.clone(),
            _ => self.time.clone(),
        }
    }
}

impl BuiltinFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter whose input instants are wall-clock times in `name`.
    ///
    /// # Errors
    /// Returns an error message when the zone is unknown.
    pub fn with_host_zone(name: &str) -> Result<Self, String> {
        Zone::resolve(name)
            .map(|host| Self { host })
            .ok_or_else(|| format!("unknown time zone '{name}'"))
    }

    #[must_use]
    pub const fn host_zone(&self) -> &Zone {
        &self.host
    }

    fn resolve<'a>(
        &self,
        locale: &str,
        options: &'a FormatConfig,
    ) -> Result<Resolved<'a>, Rejection> {
        let language = Language::from_tag(locale)
            .ok_or_else(|| Rejection::range("Incorrect locale information provided"))?;

        for (field, value) in options.set_fields() {
            let FieldValue::Text(text) = value else {
                continue;
            };
            let allowed = field.allowed_values();
            if !allowed.is_empty() && !allowed.contains(&text) {
                return Err(Rejection::range(format!(
                    "Value {text} out of range for Intl.DateTimeFormat options property {field}"
                )));
            }
        }

        let zone = match options.text(Field::TimeZone) {
            Some(name) => Zone::resolve(name)
                .ok_or_else(|| Rejection::range(format!("Invalid time zone specified: {name}")))?,
            None => self.host.clone(),
        };

        let style = [Field::DateStyle, Field::TimeStyle]
            .into_iter()
            .find(|field| options.is_set(*field));
        if let Some(style) = style
            && let Some(component) = Field::ALL
                .into_iter()
                .find(|field| field.is_component() && options.is_set(*field))
        {
            return Err(Rejection::type_error(format!(
                "Can't set option {component} when {style} is used"
            )));
        }

        // hour12 wins over hourCycle.
        let cycle = match (
            options.hour12,
            options.text(Field::HourCycle).and_then(HourCycle::from_name),
        ) {
            (Some(hour12), _) => language.hour12_cycle(hour12),
            (None, Some(cycle)) => cycle,
            (None, None) => language.default_hour_cycle(),
        };

        let default_date = style.is_none()
            && ![
                Field::Weekday,
                Field::Year,
                Field::Month,
                Field::Day,
                Field::DayPeriod,
                Field::Hour,
                Field::Minute,
                Field::Second,
            ]
            .into_iter()
            .any(|field| options.is_set(field));

        Ok(Resolved {
            language,
            zone,
            cycle,
            options,
            default_date,
        })
    }

    fn localize(&self, instant: NaiveDateTime, zone: &Zone) -> Result<Clock, Rejection> {
        let shift = TimeDelta::minutes(i64::from(
            zone.offset_minutes() - self.host.offset_minutes(),
        ));
        instant
            .checked_add_signed(shift)
            .map(Clock::at)
            .ok_or_else(|| Rejection::range("Invalid time value"))
    }
}

impl DateTimeFormatter for BuiltinFormatter {
    fn format(
        &self,
        date: NaiveDateTime,
        locale: &str,
        options: &FormatConfig,
    ) -> Result<String, FormatterFailure> {
        let resolved = self
            .resolve(locale, options)
            .map_err(|r| r.into_failure(FORMAT_CONTEXT))?;
        let clock = self
            .localize(date, &resolved.zone)
            .map_err(|r| r.into_failure(FORMAT_CONTEXT))?;
        Ok(parts(&resolved, &clock).joined())
    }

    fn format_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        locale: &str,
        options: &FormatConfig,
    ) -> Result<String, FormatterFailure> {
        let resolved = self
            .resolve(locale, options)
            .map_err(|r| r.into_failure(RANGE_CONTEXT))?;
        let first = self
            .localize(start, &resolved.zone)
            .map_err(|r| r.into_failure(RANGE_CONTEXT))?;
        let last = self
            .localize(end, &resolved.zone)
            .map_err(|r| r.into_failure(RANGE_CONTEXT))?;
        Ok(range_text(&resolved, &first, &last))
    }
}

fn pad(value: u32, two_digit: bool) -> String {
    if two_digit {
        format!("{value:02}")
    } else {
        value.to_string()
    }
}

fn year_text(year: i32, width: &str) -> String {
    if width == "2-digit" {
        format!("{:02}", year.rem_euclid(100))
    } else {
        year.to_string()
    }
}

/// 24-hour clocks always pad the hour.
fn hour_text(cycle: HourCycle, hour: u32, two_digit: bool) -> String {
    pad(
        cycle.display_hour(hour),
        two_digit || !cycle.is_twelve_hour(),
    )
}

fn parts(resolved: &Resolved<'_>, clock: &Clock) -> Parts {
    let options = resolved.options;
    let language = resolved.language;
    let date_style = options.text(Field::DateStyle);
    let time_style = options.text(Field::TimeStyle);
    if date_style.is_some() || time_style.is_some() {
        return Parts {
            date: date_style
                .map(|style| style_date(language, clock, style))
                .unwrap_or_default(),
            time: time_style
                .map(|style| style_time(resolved, clock, style))
                .unwrap_or_default(),
            separator: language.date_time_separator(date_style),
        };
    }

    let mut time = component_time(resolved, clock);
    if let Some(style) = options.text(Field::TimeZoneName) {
        let name = resolved.zone.display_name(language, style);
        if !time.is_empty() {
            time.push(' ');
        }
        time.push_str(&name);
    }
    Parts {
        date: component_date(resolved, clock),
        time,
        separator: language.date_time_separator(None),
    }
}

fn style_date(language: Language, c: &Clock, style: &str) -> String {
    match language {
        Language::English => match style {
            "full" => format!(
                "{}, {} {}, {}",
                language.weekday_name(c.weekday, "long"),
                language.month_name(c.month, "long"),
                c.day,
                c.year
            ),
            "long" => format!(
                "{} {}, {}",
                language.month_name(c.month, "long"),
                c.day,
                c.year
            ),
            "medium" => format!(
                "{} {}, {}",
                language.month_name(c.month, "short"),
                c.day,
                c.year
            ),
            _ => format!("{}/{}/{:02}", c.month, c.day, c.year.rem_euclid(100)),
        },
        Language::Korean => match style {
            "full" => format!(
                "{}년 {}월 {}일 {}",
                c.year,
                c.month,
                c.day,
                language.weekday_name(c.weekday, "long")
            ),
            "long" => format!("{}년 {}월 {}일", c.year, c.month, c.day),
            "medium" => format!("{}. {}. {}.", c.year, c.month, c.day),
            _ => format!("{:02}. {}. {}.", c.year.rem_euclid(100), c.month, c.day),
        },
    }
}

fn style_time(resolved: &Resolved<'_>, c: &Clock, style: &str) -> String {
    let language = resolved.language;
    let cycle = resolved.cycle;
    let hour = hour_text(cycle, c.hour, false);
    let zone_name = match style {
        "full" => Some(resolved.zone.display_name(language, "long")),
        "long" => Some(resolved.zone.display_name(language, "short")),
        _ => None,
    };
    let clock = match (language, style) {
        (Language::Korean, "full" | "long") => {
            format!("{hour}시 {}분 {}초", c.minute, c.second)
        }
        (_, "short") => format!("{hour}:{:02}", c.minute),
        _ => format!("{hour}:{:02}:{:02}", c.minute, c.second),
    };
    let mut out = if cycle.is_twelve_hour() {
        let marker = language.meridiem(c.hour);
        match language {
            Language::English => format!("{clock} {marker}"),
            Language::Korean => format!("{marker} {clock}"),
        }
    } else {
        clock
    };
    if let Some(name) = zone_name {
        out.push(' ');
        out.push_str(&name);
    }
    out
}

fn component_date(resolved: &Resolved<'_>, c: &Clock) -> String {
    let options = resolved.options;
    let language = resolved.language;
    let (year_width, month_width, day_width) = if resolved.default_date {
        (Some("numeric"), Some("numeric"), Some("numeric"))
    } else {
        (
            options.text(Field::Year),
            options.text(Field::Month),
            options.text(Field::Day),
        )
    };
    let year = year_width.map(|width| year_text(c.year, width));
    let day = day_width.map(|width| pad(c.day, width == "2-digit"));
    let textual_month =
        month_width.is_some_and(|width| matches!(width, "long" | "short" | "narrow"));

    let date = match language {
        Language::English => {
            if let Some(width) = month_width.filter(|_| textual_month) {
                let month = language.month_name(c.month, width);
                match (day, year) {
                    (Some(day), Some(year)) => format!("{month} {day}, {year}"),
                    (Some(day), None) => format!("{month} {day}"),
                    (None, Some(year)) => format!("{month} {year}"),
                    (None, None) => month,
                }
            } else {
                let month = month_width.map(|width| pad(c.month, width == "2-digit"));
                [month, day, year]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("/")
            }
        }
        Language::Korean => {
            let month = month_width.map(|width| pad(c.month, width == "2-digit"));
            let present = [year.is_some(), month.is_some(), day.is_some()]
                .into_iter()
                .filter(|set| *set)
                .count();
            if month.is_some() && !textual_month && present >= 2 {
                [year, month, day]
                    .into_iter()
                    .flatten()
                    .map(|part| format!("{part}."))
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                [
                    year.map(|y| format!("{y}년")),
                    month.map(|m| format!("{m}월")),
                    day.map(|d| format!("{d}일")),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
            }
        }
    };

    let Some(width) = options.text(Field::Weekday) else {
        return date;
    };
    let weekday = language.weekday_name(c.weekday, width);
    if date.is_empty() {
        return weekday;
    }
    match language {
        Language::English => format!("{weekday}, {date}"),
        Language::Korean if width == "long" => format!("{date} {weekday}"),
        Language::Korean => format!("{date} ({weekday})"),
    }
}

fn component_time(resolved: &Resolved<'_>, c: &Clock) -> String {
    let options = resolved.options;
    let language = resolved.language;
    let cycle = resolved.cycle;
    let hour = options.text(Field::Hour);
    let minute = options.text(Field::Minute);
    let second = options.text(Field::Second);
    let period = options.text(Field::DayPeriod);

    if hour.is_none() && minute.is_none() && second.is_none() {
        return period
            .map(|width| language.day_period(c.hour, width).to_owned())
            .unwrap_or_default();
    }

    let mut fields = Vec::with_capacity(3);
    if let Some(width) = hour {
        fields.push(hour_text(cycle, c.hour, width == "2-digit"));
    }
    if let Some(width) = minute {
        fields.push(pad(
            c.minute,
            width == "2-digit" || hour.is_some() || second.is_some(),
        ));
    }
    if let Some(width) = second {
        fields.push(pad(
            c.second,
            width == "2-digit" || hour.is_some() || minute.is_some(),
        ));
    }
    let mut clock = fields.join(":");
    if language == Language::Korean && hour.is_some() && minute.is_none() && second.is_none() {
        clock.push('시');
    }
    if hour.is_none() || !cycle.is_twelve_hour() {
        return clock;
    }
    let marker = period.map_or_else(
        || language.meridiem(c.hour),
        |width| language.day_period(c.hour, width),
    );
    match language {
        Language::English => format!("{clock} {marker}"),
        Language::Korean => format!("{marker} {clock}"),
    }
}

fn range_text(resolved: &Resolved<'_>, first: &Clock, last: &Clock) -> String {
    let start = parts(resolved, first);
    let end = parts(resolved, last);
    let separator = resolved.language.range_separator();
    let (left, right) = (start.joined(), end.joined());
    if left == right {
        return left;
    }
    if let Some(collapsed) = collapse_days(resolved, first, last) {
        return collapsed;
    }
    if !start.date.is_empty() && !start.time.is_empty() && start.date == end.date {
        return format!(
            "{}{}{}{separator}{}",
            start.date, start.separator, start.time, end.time
        );
    }
    format!("{left}{separator}{right}")
}

/// "May 6 – 8, 2021" style ranges for English text-month dates within a year.
fn collapse_days(resolved: &Resolved<'_>, first: &Clock, last: &Clock) -> Option<String> {
    let options = resolved.options;
    let language = resolved.language;
    let blocking = [
        Field::DateStyle,
        Field::TimeStyle,
        Field::Weekday,
        Field::DayPeriod,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::TimeZoneName,
    ];
    if language != Language::English
        || first.year != last.year
        || blocking.into_iter().any(|field| options.is_set(field))
    {
        return None;
    }
    let month_width = options
        .text(Field::Month)
        .filter(|width| matches!(*width, "long" | "short" | "narrow"))?;
    let day_width = options.text(Field::Day)?;
    let year = year_text(first.year, options.text(Field::Year)?);
    let separator = language.range_separator();
    let day = |c: &Clock| pad(c.day, day_width == "2-digit");
    let month = |c: &Clock| language.month_name(c.month, month_width);
    if first.month == last.month {
        Some(format!(
            "{} {}{separator}{}, {year}",
            month(first),
            day(first),
            day(last)
        ))
    } else {
        Some(format!(
            "{} {}{separator}{} {}, {year}",
            month(first),
            day(first),
            month(last),
            day(last)
        ))
    }
}
