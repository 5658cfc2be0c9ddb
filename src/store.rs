//! Preset persistence and management.
//!
//! [`PresetStore`] owns the working [`PresetCollection`] and writes it back to
//! its [`Storage`] after every mutation. The collection loaded at start-up is
//! kept as the baseline that [`PresetStore::reset`] returns to.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec;
pub use crate::collection::normalize_name;
use crate::collection::{PresetCollection, Selection};
use crate::conf;
use crate::error::{StorageError, StoreError, ValidationError};
use crate::options::FormatConfig;

/// Storage key holding the JSON preset document.
pub const PRESETS_KEY: &str = "presets";
pub const EXPORT_FILE_NAME: &str = "intl-dateformat-tester-presets.yaml";
pub const EXPORT_MEDIA_TYPE: &str = "application/x-yaml;charset=utf-8";

/// Minimal key/value persistence used by the store.
pub trait Storage {
    fn read(&self, key: &str) -> Option<String>;
    /// Persist `value` under `key`.
    ///
    /// # Errors
    /// Returns an error when the value cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no stored value");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let write_err = |source| StorageError::Write {
            path: path.display().to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        fs::write(&path, value).map_err(write_err)?;
        debug!(path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }
}

/// In-process storage; counts writes so callers can tell a no-op from a save.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

/// A YAML document ready to be saved under its fixed file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: &'static str,
    pub media_type: &'static str,
    pub contents: String,
}

impl Export {
    /// Write the document into `dir` and return the written path.
    ///
    /// # Errors
    /// Returns [`StorageError::Write`] when the file cannot be written.
    pub fn write_into(&self, dir: &Path) -> Result<PathBuf, StorageError> {
        let path = dir.join(self.filename);
        fs::write(&path, &self.contents).map_err(|source| StorageError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }
}

/// The collection shipped with the tool, used when nothing is stored yet.
#[must_use]
pub fn default_presets() -> PresetCollection {
    let Some(doc) = conf::builtin("presets") else {
        return PresetCollection::new();
    };
    codec::decode(doc).unwrap_or_else(|e| {
        warn!(error = %e, "built-in presets failed to parse");
        PresetCollection::new()
    })
}

#[derive(Debug)]
pub struct PresetStore<S: Storage> {
    storage: S,
    presets: PresetCollection,
    baseline: PresetCollection,
    selection: Selection,
    active: Option<String>,
}

impl<S: Storage> PresetStore<S> {
    /// Load the stored collection, falling back to the built-in defaults when
    /// nothing is stored or the stored document is malformed.
    pub fn load(storage: S) -> Self {
        let presets = match storage.read(PRESETS_KEY) {
            Some(text) => match serde_json::from_str::<PresetCollection>(&text) {
                Ok(stored) => match stored.normalized() {
                    Ok(stored) => {
                        debug!(count = stored.len(), "loaded stored presets");
                        stored.filtered()
                    }
                    Err(e) => {
                        warn!(error = %e, "stored preset names are invalid, using defaults");
                        default_presets()
                    }
                },
                Err(e) => {
                    warn!(error = %e, "stored presets are malformed, using defaults");
                    default_presets()
                }
            },
            None => {
                debug!("no stored presets, using defaults");
                default_presets()
            }
        };
        Self {
            storage,
            baseline: presets.clone(),
            presets,
            selection: Selection::default(),
            active: None,
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn collection(&self) -> &PresetCollection {
        &self.presets
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.names()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormatConfig> {
        self.presets.get(name)
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Name of the preset currently loaded into the form.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.presets).map_err(StorageError::from)?;
        self.storage.write(PRESETS_KEY, &json)?;
        Ok(())
    }

    fn has_name(&self, name: &str) -> bool {
        self.presets.names().any(|existing| normalize_name(existing) == name)
    }

    /// Save `config` under a new name and make it the active preset.
    ///
    /// # Errors
    /// [`ValidationError::Blank`] for an empty or whitespace-only name,
    /// [`ValidationError::Duplicate`] when the trimmed name is taken, or a
    /// storage error if the write fails.
    pub fn add(&mut self, name: &str, config: &FormatConfig) -> Result<String, StoreError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(ValidationError::Blank.into());
        }
        if self.has_name(&name) {
            return Err(ValidationError::Duplicate(name).into());
        }
        self.presets.insert(name.clone(), config.filtered());
        self.selection = Selection::of(&self.presets, [name.as_str()]);
        self.active = Some(name.clone());
        info!(preset = %name, "added preset");
        self.persist()?;
        Ok(name)
    }

    /// Overwrite (or create) a preset by key and make it active. Returns
    /// true when an existing preset was replaced.
    ///
    /// # Errors
    /// [`ValidationError::Blank`] for an empty name, or a storage error.
    pub fn upsert(&mut self, name: &str, config: &FormatConfig) -> Result<bool, StoreError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Err(ValidationError::Blank.into());
        }
        let replaced = self.presets.insert(name.clone(), config.filtered());
        info!(preset = %name, replaced, "saved preset");
        self.active = Some(name);
        self.persist()?;
        Ok(replaced)
    }

    /// Rename a preset in place. Returns false, without writing, when the
    /// new name is empty or unchanged.
    ///
    /// # Errors
    /// [`ValidationError::Unknown`] when `old` does not exist,
    /// [`ValidationError::Duplicate`] when `new` names another preset, or a
    /// storage error.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<bool, StoreError> {
        let new = normalize_name(new);
        if new.is_empty() || new == old {
            debug!(preset = %old, "rename skipped");
            return Ok(false);
        }
        if !self.presets.contains(old) {
            return Err(ValidationError::Unknown(old.to_owned()).into());
        }
        if self.presets.contains(&new) {
            return Err(ValidationError::Duplicate(new).into());
        }
        self.presets.rename(old, &new);
        self.selection.rename(old, &new);
        if self.active.as_deref() == Some(old) {
            self.active = Some(new.clone());
        }
        info!(from = %old, to = %new, "renamed preset");
        self.persist()?;
        Ok(true)
    }

    /// Remove every named preset and clear the selection. Returns how many
    /// presets were removed.
    ///
    /// # Errors
    /// Returns a storage error if the write fails.
    pub fn delete<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<usize, StoreError> {
        let mut removed = 0;
        for name in names {
            if self.presets.remove(name).is_some() {
                removed += 1;
                if self.active.as_deref() == Some(name) {
                    self.active = None;
                }
            }
        }
        self.selection.clear();
        info!(removed, "deleted presets");
        self.persist()?;
        Ok(removed)
    }

    /// Replace the selection with the named presets.
    pub fn select<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> &Selection {
        self.selection = Selection::of(&self.presets, names);
        &self.selection
    }

    #[must_use]
    pub fn can_move_up(&self) -> bool {
        self.selection.is_contiguous() && self.selection.first_index().is_some_and(|idx| idx > 0)
    }

    #[must_use]
    pub fn can_move_down(&self) -> bool {
        self.selection.is_contiguous()
            && self
                .selection
                .last_index()
                .is_some_and(|idx| idx + 1 < self.presets.len())
    }

    /// Move the selected block one position up. No-op unless allowed.
    ///
    /// # Errors
    /// Returns a storage error if the write fails.
    pub fn move_up(&mut self) -> Result<bool, StoreError> {
        if !self.can_move_up() {
            return Ok(false);
        }
        let Some(start) = self.selection.first_index() else {
            return Ok(false);
        };
        if !self.presets.move_block_up(start, self.selection.len()) {
            return Ok(false);
        }
        self.selection.shift_up();
        self.persist()?;
        Ok(true)
    }

    /// Move the selected block one position down. No-op unless allowed.
    ///
    /// # Errors
    /// Returns a storage error if the write fails.
    pub fn move_down(&mut self) -> Result<bool, StoreError> {
        if !self.can_move_down() {
            return Ok(false);
        }
        let Some(start) = self.selection.first_index() else {
            return Ok(false);
        };
        if !self.presets.move_block_down(start, self.selection.len()) {
            return Ok(false);
        }
        self.selection.shift_down();
        self.persist()?;
        Ok(true)
    }

    /// Accept the working collection as the new baseline.
    pub fn commit(&mut self) {
        self.baseline = self.presets.clone();
    }

    /// Go back to the baseline collection.
    ///
    /// # Errors
    /// Returns a storage error if the write fails.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.presets = self.baseline.clone();
        self.selection.clear();
        self.forget_missing_active();
        info!(count = self.presets.len(), "reset presets");
        self.persist()
    }

    /// Replace the collection with the built-in presets.
    ///
    /// # Errors
    /// Returns a storage error if the write fails.
    pub fn restore_defaults(&mut self) -> Result<(), StoreError> {
        self.presets = default_presets();
        self.selection.clear();
        self.forget_missing_active();
        info!(count = self.presets.len(), "restored built-in presets");
        self.persist()
    }

    fn forget_missing_active(&mut self) {
        if let Some(name) = &self.active
            && !self.presets.contains(name)
        {
            self.active = None;
        }
    }

    /// Replace the whole collection with the presets of a YAML document.
    /// On a parse failure nothing changes.
    ///
    /// # Errors
    /// [`StoreError::Parse`] for a malformed document, or a storage error.
    pub fn import_from(&mut self, text: &str) -> Result<usize, StoreError> {
        let imported = codec::decode(text).inspect_err(|e| {
            warn!(error = %e, "import rejected");
        })?;
        self.presets = imported;
        self.selection.clear();
        self.forget_missing_active();
        info!(count = self.presets.len(), "imported presets");
        self.persist()?;
        Ok(self.presets.len())
    }

    /// Import raw file bytes: a byte order mark picks the encoding, UTF-8
    /// otherwise, malformed sequences are replaced.
    ///
    /// # Errors
    /// See [`Self::import_from`].
    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<usize, StoreError> {
        let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
        if had_errors {
            warn!(encoding = encoding.name(), "import file had malformed bytes");
        }
        self.import_from(&text)
    }

    /// Read and import a file.
    ///
    /// # Errors
    /// [`StoreError::Io`] when the file cannot be read, otherwise see
    /// [`Self::import_from`].
    pub fn import_file(&mut self, path: &Path) -> Result<usize, StoreError> {
        let bytes = fs::read(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.import_bytes(&bytes)
    }

    #[must_use]
    pub fn export_to(&self) -> Export {
        Export {
            filename: EXPORT_FILE_NAME,
            media_type: EXPORT_MEDIA_TYPE,
            contents: codec::encode(&self.presets),
        }
    }

    /// Make a stored preset active and return its options.
    ///
    /// # Errors
    /// [`ValidationError::Unknown`] when no preset has that name.
    pub fn activate(&mut self, name: &str) -> Result<&FormatConfig, StoreError> {
        if !self.presets.contains(name) {
            return Err(ValidationError::Unknown(name.to_owned()).into());
        }
        self.active = Some(name.to_owned());
        self.presets
            .get(name)
            .ok_or_else(|| ValidationError::Unknown(name.to_owned()).into())
    }

    /// Options of the active preset, to reload the form from.
    #[must_use]
    pub fn restore(&self) -> Option<&FormatConfig> {
        self.active.as_deref().and_then(|name| self.presets.get(name))
    }

    /// True when the form's options differ from the active preset.
    #[must_use]
    pub fn is_edited(&self, current: &FormatConfig) -> bool {
        self.restore()
            .is_some_and(|stored| stored.filtered() != current.filtered())
    }
}
