use dtf_tester::store::PRESETS_KEY;
use dtf_tester::{
    Field, FormatConfig, MemoryStorage, PresetStore, Storage, StoreError, ValidationError,
};

fn month(width: &str) -> FormatConfig {
    FormatConfig::new().with(Field::Month, width)
}

fn store_with(json: &str) -> PresetStore<MemoryStorage> {
    PresetStore::load(MemoryStorage::new().with_value(PRESETS_KEY, json))
}

#[test]
fn add_rejects_blank_names() {
    let mut store = PresetStore::load(MemoryStorage::new());
    for name in ["", "  ", "\t\n"] {
        let err = store.add(name, &month("long")).unwrap_err();
        assert!(
            matches!(err, StoreError::Validation(ValidationError::Blank)),
            "{name:?}: {err}"
        );
        assert_eq!(err.to_string(), "There are only whitespaces.");
    }
    assert_eq!(store.storage().writes(), 0);
}

#[test]
fn add_rejects_existing_names_after_trimming() {
    let mut store = PresetStore::load(MemoryStorage::new());
    let before = store.collection().clone();
    for name in ["shortDate", "  shortDate "] {
        let err = store.add(name, &month("long")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Duplicate(ref dup)) if dup == "shortDate"
        ));
    }
    assert_eq!(store.collection(), &before);
    assert_eq!(store.storage().writes(), 0);
}

#[test]
fn add_appends_selects_and_persists() {
    let mut store = PresetStore::load(MemoryStorage::new());
    let config = FormatConfig::new()
        .with(Field::Month, "long")
        .with(Field::Day, "");
    let name = store.add("  mine ", &config).unwrap();
    assert_eq!(name, "mine");
    assert_eq!(store.names().last(), Some("mine"));
    assert_eq!(store.active(), Some("mine"));
    assert_eq!(store.selection().names().collect::<Vec<_>>(), vec!["mine"]);
    assert_eq!(store.get("mine"), Some(&month("long")));

    let stored = store.storage().read(PRESETS_KEY).unwrap();
    assert!(stored.ends_with(r#""mine":{"month":"long"}}"#), "{stored}");
    assert_eq!(store.storage().writes(), 1);
}

#[test]
fn upsert_overwrites_in_place() {
    let mut store = store_with(r#"{"a":{"month":"long"},"b":{"day":"numeric"}}"#);
    assert!(store.upsert("a", &month("short")).unwrap());
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(store.get("a"), Some(&month("short")));
    assert!(!store.upsert("c", &month("narrow")).unwrap());
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert!(matches!(
        store.upsert(" ", &month("long")),
        Err(StoreError::Validation(ValidationError::Blank))
    ));
    assert_eq!(store.storage().writes(), 2);
}

#[test]
fn rename_to_same_or_empty_name_is_a_no_op() {
    let mut store = store_with(r#"{"a":{"month":"long"},"b":{"day":"numeric"}}"#);
    store.select(["a"]);
    let selection = store.selection().clone();
    assert!(!store.rename("a", "a").unwrap());
    assert!(!store.rename("a", "  a  ").unwrap());
    assert!(!store.rename("a", "   ").unwrap());
    assert_eq!(store.storage().writes(), 0);
    assert_eq!(store.selection(), &selection);
}

#[test]
fn rename_keeps_position_and_follows_selection() {
    let mut store = store_with(r#"{"a":{"month":"long"},"b":{"day":"numeric"},"c":{}}"#);
    store.activate("b").unwrap();
    store.select(["b"]);
    assert!(store.rename("b", "bee").unwrap());
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "bee", "c"]);
    assert_eq!(store.active(), Some("bee"));
    assert_eq!(store.selection().names().collect::<Vec<_>>(), vec!["bee"]);
    assert_eq!(store.storage().writes(), 1);
}

#[test]
fn rename_rejects_unknown_and_taken_names() {
    let mut store = store_with(r#"{"a":{},"b":{}}"#);
    assert!(matches!(
        store.rename("zzz", "y"),
        Err(StoreError::Validation(ValidationError::Unknown(_)))
    ));
    assert!(matches!(
        store.rename("a", "b"),
        Err(StoreError::Validation(ValidationError::Duplicate(_)))
    ));
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn delete_removes_named_and_clears_selection() {
    let mut store = store_with(r#"{"a":{},"b":{},"c":{}}"#);
    store.activate("b").unwrap();
    store.select(["a", "b"]);
    assert_eq!(store.delete(["b", "c", "missing"]).unwrap(), 2);
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a"]);
    assert!(store.selection().is_empty());
    assert_eq!(store.active(), None);
}

#[test]
fn activate_restore_and_edit_tracking() {
    let mut store = PresetStore::load(MemoryStorage::new());
    let config = store.activate("shortDate").unwrap().clone();
    assert_eq!(config.text(Field::Month), Some("short"));
    assert_eq!(store.restore(), Some(&config));

    let mut edited = config.clone();
    assert!(!store.is_edited(&edited));
    edited.set(Field::Weekday, "").unwrap();
    assert!(!store.is_edited(&edited));
    edited.set(Field::Month, "long").unwrap();
    assert!(store.is_edited(&edited));

    assert!(matches!(
        store.activate("nope"),
        Err(StoreError::Validation(ValidationError::Unknown(_)))
    ));
}

#[test]
fn reset_returns_to_the_loaded_collection() {
    let mut store = store_with(r#"{"a":{},"b":{}}"#);
    store.add("c", &FormatConfig::new()).unwrap();
    store.delete(["a"]).unwrap();
    store.reset().unwrap();
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(store.active(), None);

    store.add("c", &FormatConfig::new()).unwrap();
    store.commit();
    store.delete(["a"]).unwrap();
    store.reset().unwrap();
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(store.active(), Some("c"));
}

#[test]
fn restore_defaults_brings_back_builtin_presets() {
    let mut store = store_with(r#"{"a":{}}"#);
    store.restore_defaults().unwrap();
    assert_eq!(store.len(), 7);
    assert_eq!(store.names().next(), Some("shortDate"));
    assert!(!store.collection().contains("a"));
}
