use prefstore::core::engine::SettingsEngine;
use prefstore::core::sqlite::SqliteStore;
use prefstore::core::store::{SettingsStore, StoredValue};
use prefstore::settings_fields;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq)]
struct EditorSettings {
    enabled: bool,
    font_size: i64,
    zoom: f64,
    theme: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            font_size: 12,
            zoom: 1.25,
            theme: "dark".to_string(),
        }
    }
}

settings_fields!(EditorSettings, "Editor", {
    enabled: bool,
    font_size: int,
    zoom: float,
    theme: text,
});

#[test]
fn adapter_honors_the_store_contract() {
    let store = SqliteStore::open_in_memory().expect("in-memory store");

    assert!(!store.collection_exists("Editor").unwrap());
    store.create_collection("Editor").unwrap();
    store.create_collection("Editor").unwrap();
    assert!(store.collection_exists("Editor").unwrap());

    store.set_bool("Editor", "enabled", true).unwrap();
    store.set_int("Editor", "font_size", 12).unwrap();
    store.set_text("Editor", "theme", "dark").unwrap();

    assert!(store.get_bool("Editor", "enabled").unwrap());
    assert_eq!(store.get_int("Editor", "font_size").unwrap(), 12);
    assert_eq!(store.get_text("Editor", "theme").unwrap(), "dark");

    assert!(store.property_exists("Editor", "theme").unwrap());
    assert!(!store.property_exists("Editor", "missing").unwrap());
    assert!(store.get_int("Editor", "missing").is_err());

    store.set_text("Editor", "theme", "light").unwrap();
    assert_eq!(store.get_text("Editor", "theme").unwrap(), "light");
}

#[test]
fn writes_to_an_uncreated_collection_are_rejected() {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    assert!(store.set_int("nope", "k", 1).is_err());
}

#[test]
fn engine_round_trip_through_sqlite() {
    let tmp = tempdir().expect("tempdir");
    let db_path = tmp.path().join("settings.db");

    let engine = SettingsEngine::new(SqliteStore::open(&db_path).expect("open store"));
    engine.save(&EditorSettings::default());

    let mut fresh = EditorSettings {
        enabled: false,
        font_size: 0,
        zoom: 0.0,
        theme: String::new(),
    };
    engine.load(&mut fresh);
    assert_eq!(fresh, EditorSettings::default());
}

#[test]
fn saved_settings_survive_reopening_the_database() {
    let tmp = tempdir().expect("tempdir");
    let db_path = tmp.path().join("settings.db");

    {
        let engine = SettingsEngine::new(SqliteStore::open(&db_path).expect("open store"));
        engine
            .try_save(&EditorSettings {
                font_size: 16,
                theme: "solarized".to_string(),
                ..EditorSettings::default()
            })
            .expect("save");
    }

    let engine = SettingsEngine::new(SqliteStore::open(&db_path).expect("reopen store"));
    let mut restored = EditorSettings::default();
    engine.try_load(&mut restored).expect("load");

    assert_eq!(restored.font_size, 16);
    assert_eq!(restored.theme, "solarized");
}

#[test]
fn inspection_lists_collections_and_properties_sorted() {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    store.create_collection("Zulu").unwrap();
    store.create_collection("Alpha").unwrap();
    store.set_int("Alpha", "b_key", 2).unwrap();
    store.set_text("Alpha", "a_key", "v").unwrap();

    assert_eq!(store.collections().unwrap(), vec!["Alpha", "Zulu"]);

    let props = store.properties("Alpha").unwrap();
    assert_eq!(
        props,
        vec![
            ("a_key".to_string(), StoredValue::Text("v".to_string())),
            ("b_key".to_string(), StoredValue::Int(2)),
        ]
    );
    assert!(store.properties("Zulu").unwrap().is_empty());
}

#[test]
fn floats_are_stored_as_their_textual_encoding() {
    let tmp = tempdir().expect("tempdir");
    let db_path = tmp.path().join("settings.db");

    let engine = SettingsEngine::new(SqliteStore::open(&db_path).expect("open store"));
    engine.save(&EditorSettings::default());

    let raw = engine.store().get_text("Editor", "zoom").expect("raw zoom");
    assert_eq!(raw, "1.25");
}
