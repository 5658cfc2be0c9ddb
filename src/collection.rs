use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unicode_normalization::UnicodeNormalization;

use crate::error::ParseError;
use crate::options::FormatConfig;

/// Trim and NFC-normalise a preset name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().nfc().collect()
}

/// Ordered mapping of preset name to options. Order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetCollection {
    entries: Vec<(String, FormatConfig)>,
}

impl PresetCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatConfig)> {
        self.entries
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormatConfig> {
        self.position(name).map(|idx| &self.entries[idx].1)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Insert or overwrite by key. An existing key keeps its position.
    /// Returns true when a previous entry was replaced.
    pub fn insert(&mut self, name: impl Into<String>, config: FormatConfig) -> bool {
        let name = name.into();
        if let Some(idx) = self.position(&name) {
            self.entries[idx].1 = config;
            true
        } else {
            self.entries.push((name, config));
            false
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FormatConfig> {
        let idx = self.position(name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Re-key an entry in place. The caller guarantees `new` is free.
    pub(crate) fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(idx) = self.position(old) else {
            return false;
        };
        new.clone_into(&mut self.entries[idx].0);
        true
    }

    /// Swap the block `start..start + len` with the entry right above it.
    pub(crate) fn move_block_up(&mut self, start: usize, len: usize) -> bool {
        if len == 0 || start == 0 || start + len > self.entries.len() {
            return false;
        }
        self.entries[start - 1..start + len].rotate_left(1);
        true
    }

    /// Swap the block `start..start + len` with the entry right below it.
    pub(crate) fn move_block_down(&mut self, start: usize, len: usize) -> bool {
        if len == 0 || start + len >= self.entries.len() {
            return false;
        }
        self.entries[start..=start + len].rotate_right(1);
        true
    }

    /// Every entry passed through [`FormatConfig::filtered`].
    #[must_use]
    pub fn filtered(&self) -> Self {
        self.entries
            .iter()
            .map(|(name, config)| (name.clone(), config.filtered()))
            .collect()
    }

    /// Same entries with every name passed through [`normalize_name`].
    ///
    /// # Errors
    /// Returns [`ParseError`] naming the first preset whose name is blank or
    /// collides with an earlier one once normalised.
    pub fn normalized(&self) -> Result<Self, ParseError> {
        let mut out = Self::new();
        for (raw, config) in &self.entries {
            let name = normalize_name(raw);
            if name.is_empty() {
                return Err(ParseError::new(format!("preset name '{raw}' is blank")));
            }
            if out.contains(&name) {
                return Err(ParseError::new(format!("duplicate preset name '{name}'")));
            }
            out.entries.push((name, config.clone()));
        }
        Ok(out)
    }
}

impl FromIterator<(String, FormatConfig)> for PresetCollection {
    fn from_iter<T: IntoIterator<Item = (String, FormatConfig)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (name, config) in iter {
            out.insert(name, config);
        }
        out
    }
}

impl<'a> IntoIterator for &'a PresetCollection {
    type Item = (&'a str, &'a FormatConfig);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a FormatConfig)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for PresetCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, config) in &self.entries {
            map.serialize_entry(name, config)?;
        }
        map.end()
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = PresetCollection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of preset names to format options")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = PresetCollection::new();
        while let Some((name, config)) = access.next_entry::<String, FormatConfig>()? {
            out.insert(name, config);
        }
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for PresetCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub name: String,
    /// Position of the entry when it was selected.
    pub index: usize,
}

/// Entries picked in the manage view, kept ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
}

impl Selection {
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = SelectionEntry>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|entry| entry.index);
        entries.dedup_by_key(|entry| entry.index);
        Self { entries }
    }

    /// Select the named entries of `collection`; unknown names are skipped.
    #[must_use]
    pub fn of<'a>(
        collection: &PresetCollection,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(names.into_iter().filter_map(|name| {
            collection.position(name).map(|index| SelectionEntry {
                name: name.to_owned(),
                index,
            })
        }))
    }

    #[must_use]
    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when each index follows the previous one by exactly one.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[1].index == pair[0].index + 1)
    }

    #[must_use]
    pub fn first_index(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.index)
    }

    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.entries.last().map(|entry| entry.index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn rename(&mut self, old: &str, new: &str) {
        for entry in &mut self.entries {
            if entry.name == old {
                new.clone_into(&mut entry.name);
            }
        }
    }

    pub(crate) fn shift_up(&mut self) {
        for entry in &mut self.entries {
            entry.index -= 1;
        }
    }

    pub(crate) fn shift_down(&mut self) {
        for entry in &mut self.entries {
            entry.index += 1;
        }
    }
}
