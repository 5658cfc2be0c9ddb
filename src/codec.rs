//! YAML documents for preset import/export.
//!
//! Export writes one top-level key per preset, in collection order, with the
//! preset's set options as a nested mapping sorted by option name. Import
//! accepts the same shape and rejects anything it cannot map onto
//! [`FormatConfig`] fields.

use saphyr::{LoadableYamlNode, YamlOwned};

use crate::collection::PresetCollection;
use crate::error::ParseError;
use crate::options::{Field, FieldValue, FormatConfig, parse_hour12};

const INDENT: &str = "  ";
// Longest key YAML allows before the `:` on the same line.
const MAX_IMPLICIT_KEY: usize = 1024;

/// Serialize the filtered form of every preset.
#[must_use]
pub fn encode(collection: &PresetCollection) -> String {
    if collection.is_empty() {
        return "{}\n".to_string();
    }
    let mut out = String::new();
    for (name, config) in collection {
        let key = scalar(name, Position::Key);
        if key.chars().count() < MAX_IMPLICIT_KEY {
            out.push_str(&key);
        } else {
            out.push_str("? ");
            out.push_str(&key);
            out.push('\n');
        }
        let body = encode_fields(&config.filtered(), INDENT);
        if body.is_empty() {
            out.push_str(": {}\n");
        } else {
            out.push_str(":\n");
            out.push_str(&body);
        }
    }
    out
}

/// Document for a single preset, as shown before saving it.
#[must_use]
pub fn encode_config(config: &FormatConfig) -> String {
    let body = encode_fields(&config.filtered(), "");
    if body.is_empty() {
        "{}\n".to_string()
    } else {
        body
    }
}

fn encode_fields(config: &FormatConfig, indent: &str) -> String {
    let mut out = String::new();
    for (field, value) in config.sorted_fields() {
        out.push_str(indent);
        out.push_str(field.name());
        out.push_str(": ");
        match value {
            FieldValue::Text(text) => out.push_str(&scalar(text, Position::Value)),
            FieldValue::Flag(flag) => out.push_str(if flag { "true" } else { "false" }),
        }
        out.push('\n');
    }
    out
}

#[derive(Clone, Copy)]
enum Position {
    Key,
    Value,
}

/// Plain scalar when it reads back as the same string, JSON-quoted otherwise.
fn scalar(text: &str, position: Position) -> String {
    if reads_back_plain(text, position) {
        text.to_owned()
    } else {
        serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
    }
}

fn reads_back_plain(text: &str, position: Position) -> bool {
    if text.is_empty() || text.trim() != text || text.contains(['\n', '\r', '\t', '"', '\'']) {
        return false;
    }
    let probe = match position {
        Position::Key => format!("{text}: x\n"),
        Position::Value => format!("k: {text}\n"),
    };
    let Ok(docs) = YamlOwned::load_from_str(&probe) else {
        return false;
    };
    let Some(map) = docs.first().and_then(YamlOwned::as_mapping) else {
        return false;
    };
    if map.len() != 1 {
        return false;
    }
    map.iter().next().is_some_and(|(key, value)| match position {
        Position::Key => key.as_str() == Some(text),
        Position::Value => value.as_str() == Some(text),
    })
}

/// Parse an import document.
///
/// # Errors
/// Returns [`ParseError`] when the text is not YAML, is not a mapping of
/// preset names to option mappings, or names an unknown option.
pub fn decode(text: &str) -> Result<PresetCollection, ParseError> {
    let docs = YamlOwned::load_from_str(text).map_err(|e| syntax_error(text, &e.to_string()))?;
    if docs.len() > 1 {
        return Err(ParseError::new("expected a single YAML document"));
    }
    let Some(doc) = docs.first() else {
        return Ok(PresetCollection::new());
    };
    if doc.is_null() {
        return Ok(PresetCollection::new());
    }
    let Some(map) = doc.as_mapping() else {
        return Err(ParseError::new(
            "expected a mapping of preset names to format options",
        ));
    };

    let mut out = PresetCollection::new();
    for (key, value) in map {
        let Some(name) = scalar_key(key) else {
            return Err(ParseError::new(format!(
                "preset names should be scalars, found {key:?}"
            )));
        };
        let config = decode_config(&name, value)?;
        out.insert(name, config);
    }
    out.normalized()
}

fn decode_config(name: &str, node: &YamlOwned) -> Result<FormatConfig, ParseError> {
    if node.is_null() {
        return Ok(FormatConfig::new());
    }
    let Some(map) = node.as_mapping() else {
        return Err(ParseError::new(format!(
            "preset '{name}' should be a mapping of format options"
        )));
    };

    let mut config = FormatConfig::new();
    for (key, value) in map {
        let key_name = scalar_key(key).unwrap_or_else(|| format!("{key:?}"));
        let Some(field) = Field::from_name(&key_name) else {
            return Err(ParseError::new(format!(
                "unknown option '{key_name}' in preset '{name}'"
            )));
        };
        if value.is_null() {
            config.clear(field);
            continue;
        }
        if field == Field::Hour12 {
            config.hour12 = match (value.as_bool(), value.as_str()) {
                (Some(flag), _) => Some(flag),
                (None, Some(text)) => parse_hour12(text)
                    .map_err(|e| ParseError::new(format!("preset '{name}': {e}")))?,
                (None, None) => {
                    return Err(ParseError::new(format!(
                        "option 'hour12' of preset '{name}' should be true or false"
                    )));
                }
            };
            continue;
        }
        let Some(text) = value.as_str() else {
            return Err(ParseError::new(format!(
                "option '{field}' of preset '{name}' should be a string"
            )));
        };
        config
            .set(field, text)
            .map_err(|e| ParseError::new(format!("preset '{name}': {e}")))?;
    }
    Ok(config.filtered())
}

fn scalar_key(key: &YamlOwned) -> Option<String> {
    match (
        key.as_str(),
        key.as_integer(),
        key.as_floating_point(),
        key.as_bool(),
    ) {
        (Some(text), _, _, _) => Some(text.to_owned()),
        (None, Some(num), _, _) => Some(num.to_string()),
        (None, None, Some(float), _) => Some(float.to_string()),
        (None, None, None, Some(flag)) => Some(flag.to_string()),
        _ => None,
    }
}

struct NullSink;
impl<'i> saphyr_parser::EventReceiver<'i> for NullSink {
    fn on_event(&mut self, _ev: saphyr_parser::Event<'i>) {}
}

fn syntax_error(content: &str, fallback: &str) -> ParseError {
    let mut parser = saphyr_parser::Parser::new_from_str(content);
    let mut sink = NullSink;
    match parser.load(&mut sink, true) {
        Ok(()) => ParseError::new(format!("syntax error: {fallback}")),
        Err(err) => {
            let marker = err.marker();
            ParseError::at(
                format!("syntax error: {}", err.info()),
                marker.line(),
                marker.col() + 1,
            )
        }
    }
}
