//! Rendering a format configuration for one or more locales.
//!
//! The formatting engine is a [`DateTimeFormatter`]; this module only filters
//! the options, picks single or range formatting, and turns the engine's raw
//! failure text into the short message shown instead of a preview.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{FormatError, FormatterFailure};
use crate::options::FormatConfig;

pub const DEFAULT_LOCALES: &[&str] = &["en-US", "ko-KR"];

/// Stack frames and the typed error line repeated by the engine.
static NOISE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^at new DateTimeFormat|.+\.js|<anonymous>|\wError: \w")
        .expect("noise pattern is valid")
});

/// Locale-aware date formatting capability. Instants are wall-clock times
/// in the host time zone.
pub trait DateTimeFormatter {
    /// Format a single instant.
    ///
    /// # Errors
    /// Returns the engine's raw failure text when the options are rejected.
    fn format(
        &self,
        date: NaiveDateTime,
        locale: &str,
        options: &FormatConfig,
    ) -> Result<String, FormatterFailure>;

    /// Format the span between two instants.
    ///
    /// # Errors
    /// Returns the engine's raw failure text when the options are rejected.
    fn format_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        locale: &str,
        options: &FormatConfig,
    ) -> Result<String, FormatterFailure>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Default,
    Range,
}

/// Drop blank lines and engine noise from a failure message.
#[must_use]
pub fn clean_message(raw: &str) -> String {
    raw.split('\n')
        .filter(|line| !line.trim().is_empty() && !NOISE_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render `config` for one locale. Range mode without an end instant
/// falls back to single formatting.
///
/// # Errors
/// Returns the cleaned engine message when formatting fails.
pub fn render(
    formatter: &dyn DateTimeFormatter,
    config: &FormatConfig,
    locale: &str,
    date: NaiveDateTime,
    mode: RenderMode,
    end: Option<NaiveDateTime>,
) -> Result<String, FormatError> {
    let options = config.filtered();
    let result = match (mode, end) {
        (RenderMode::Range, Some(end)) => formatter.format_range(date, end, locale, &options),
        _ => formatter.format(date, locale, &options),
    };
    result.map_err(|failure| {
        debug!(locale, raw = %failure.message, "formatter rejected options");
        FormatError {
            message: clean_message(&failure.message),
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePreview {
    pub locale: String,
    pub result: Result<String, FormatError>,
}

/// Render every locale independently; one failing locale does not affect
/// the others.
#[must_use]
pub fn render_locales<L: AsRef<str>>(
    formatter: &dyn DateTimeFormatter,
    config: &FormatConfig,
    locales: &[L],
    date: NaiveDateTime,
    mode: RenderMode,
    end: Option<NaiveDateTime>,
) -> Vec<LocalePreview> {
    locales
        .iter()
        .map(|locale| {
            let locale = locale.as_ref();
            LocalePreview {
                locale: locale.to_owned(),
                result: render(formatter, config, locale, date, mode, end),
            }
        })
        .collect()
}
