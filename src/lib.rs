#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

pub mod cli_support;
pub mod codec;
pub mod collection;
pub mod conf;
pub mod config;
pub mod error;
pub mod form;
pub mod formatter;
pub mod options;
pub mod preview;
pub mod store;

pub use collection::{PresetCollection, Selection, SelectionEntry};
pub use error::{
    FormError, FormatError, FormatterFailure, ParseError, StorageError, StoreError,
    ValidationError,
};
pub use form::{Action, FormState, update};
pub use formatter::BuiltinFormatter;
pub use options::{Field, FieldValue, FormatConfig};
pub use preview::{DateTimeFormatter, LocalePreview, RenderMode, render, render_locales};
pub use store::{Export, FileStorage, MemoryStorage, PresetStore, Storage};
