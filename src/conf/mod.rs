#![allow(clippy::module_name_repetitions)]

// Built-in documents: the first-run preset collection and the default settings.

#[must_use]
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "presets" => Some(DEFAULT_PRESETS),
        "settings" => Some(DEFAULT_SETTINGS),
        _ => None,
    }
}

const DEFAULT_PRESETS: &str = r"
shortDate:
  month: short
  day: numeric
  year: numeric
shortDateTime:
  dateStyle: medium
  timeStyle: short
shortDateWithoutYear:
  month: short
  day: numeric
utcShortDate:
  month: short
  day: numeric
  year: numeric
  timeZone: utc
shortYearMonth:
  month: short
  year: numeric
utcShortDateTime:
  dateStyle: long
  timeStyle: short
  timeZone: utc
23htime:
  hour: numeric
  minute: numeric
  hourCycle: h23
";

const DEFAULT_SETTINGS: &str = r"
locales:
  - en-US
  - ko-KR
time-zone: UTC
";
