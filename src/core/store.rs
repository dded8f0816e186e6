//! Store adapter contract and the in-memory reference implementation.
//!
//! The engine talks to persistence exclusively through [`SettingsStore`]:
//! collection existence and creation, per-key existence, and typed get/set
//! primitives for the three native stored kinds. Floating-point has no native
//! stored kind and travels through the text primitives.

use crate::core::error::PrefstoreError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// A raw value as held by a store collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// The hierarchical key-value store contract the engine builds upon.
///
/// Reading a property that does not exist, or with a primitive that does not
/// match its stored kind, is a store-access error; callers are expected to
/// consult `property_exists` first. Durability and location are entirely the
/// implementation's concern.
pub trait SettingsStore: Send + Sync {
    fn collection_exists(&self, name: &str) -> Result<bool, PrefstoreError>;
    fn create_collection(&self, name: &str) -> Result<(), PrefstoreError>;
    fn property_exists(&self, collection: &str, key: &str) -> Result<bool, PrefstoreError>;

    fn get_bool(&self, collection: &str, key: &str) -> Result<bool, PrefstoreError>;
    fn set_bool(&self, collection: &str, key: &str, value: bool) -> Result<(), PrefstoreError>;

    fn get_int(&self, collection: &str, key: &str) -> Result<i64, PrefstoreError>;
    fn set_int(&self, collection: &str, key: &str, value: i64) -> Result<(), PrefstoreError>;

    fn get_text(&self, collection: &str, key: &str) -> Result<String, PrefstoreError>;
    fn set_text(&self, collection: &str, key: &str, value: &str) -> Result<(), PrefstoreError>;
}

type Collections = HashMap<String, HashMap<String, StoredValue>>;

/// In-memory store: collections as a map of maps behind a mutex.
///
/// The injectable test double for the engine, also usable as an ephemeral
/// store in hosts that do not want anything on disk.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<R>(
        &self,
        f: impl FnOnce(&mut Collections) -> Result<R, PrefstoreError>,
    ) -> Result<R, PrefstoreError> {
        let mut guard = self
            .collections
            .lock()
            .map_err(|_| PrefstoreError::StoreAccess("memory store lock poisoned".to_string()))?;
        f(&mut guard)
    }

    fn get(&self, collection: &str, key: &str) -> Result<StoredValue, PrefstoreError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .and_then(|entries| entries.get(key))
                .cloned()
                .ok_or_else(|| {
                    PrefstoreError::StoreAccess(format!(
                        "no property '{}' in collection '{}'",
                        key, collection
                    ))
                })
        })
    }

    fn set(&self, collection: &str, key: &str, value: StoredValue) -> Result<(), PrefstoreError> {
        self.with_collections(|collections| {
            let entries = collections.get_mut(collection).ok_or_else(|| {
                PrefstoreError::StoreAccess(format!("no collection '{}'", collection))
            })?;
            entries.insert(key.to_string(), value);
            Ok(())
        })
    }
}

impl SettingsStore for MemoryStore {
    fn collection_exists(&self, name: &str) -> Result<bool, PrefstoreError> {
        self.with_collections(|collections| Ok(collections.contains_key(name)))
    }

    fn create_collection(&self, name: &str) -> Result<(), PrefstoreError> {
        self.with_collections(|collections| {
            collections.entry(name.to_string()).or_default();
            Ok(())
        })
    }

    fn property_exists(&self, collection: &str, key: &str) -> Result<bool, PrefstoreError> {
        self.with_collections(|collections| {
            Ok(collections
                .get(collection)
                .is_some_and(|entries| entries.contains_key(key)))
        })
    }

    fn get_bool(&self, collection: &str, key: &str) -> Result<bool, PrefstoreError> {
        match self.get(collection, key)? {
            StoredValue::Bool(value) => Ok(value),
            other => Err(PrefstoreError::StoreAccess(format!(
                "property '{}' in collection '{}' is not a boolean: {:?}",
                key, collection, other
            ))),
        }
    }

    fn set_bool(&self, collection: &str, key: &str, value: bool) -> Result<(), PrefstoreError> {
        self.set(collection, key, StoredValue::Bool(value))
    }

    fn get_int(&self, collection: &str, key: &str) -> Result<i64, PrefstoreError> {
        match self.get(collection, key)? {
            StoredValue::Int(value) => Ok(value),
            other => Err(PrefstoreError::StoreAccess(format!(
                "property '{}' in collection '{}' is not an integer: {:?}",
                key, collection, other
            ))),
        }
    }

    fn set_int(&self, collection: &str, key: &str, value: i64) -> Result<(), PrefstoreError> {
        self.set(collection, key, StoredValue::Int(value))
    }

    fn get_text(&self, collection: &str, key: &str) -> Result<String, PrefstoreError> {
        match self.get(collection, key)? {
            StoredValue::Text(value) => Ok(value),
            other => Err(PrefstoreError::StoreAccess(format!(
                "property '{}' in collection '{}' is not text: {:?}",
                key, collection, other
            ))),
        }
    }

    fn set_text(&self, collection: &str, key: &str, value: &str) -> Result<(), PrefstoreError> {
        self.set(collection, key, StoredValue::Text(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_are_created_lazily_and_idempotently() {
        let store = MemoryStore::new();
        assert!(!store.collection_exists("Editor").unwrap());

        store.create_collection("Editor").unwrap();
        assert!(store.collection_exists("Editor").unwrap());

        store.set_int("Editor", "font_size", 12).unwrap();
        store.create_collection("Editor").unwrap();
        assert_eq!(store.get_int("Editor", "font_size").unwrap(), 12);
    }

    #[test]
    fn typed_round_trip_per_primitive() {
        let store = MemoryStore::new();
        store.create_collection("c").unwrap();

        store.set_bool("c", "b", true).unwrap();
        store.set_int("c", "i", -7).unwrap();
        store.set_text("c", "t", "hello").unwrap();

        assert!(store.get_bool("c", "b").unwrap());
        assert_eq!(store.get_int("c", "i").unwrap(), -7);
        assert_eq!(store.get_text("c", "t").unwrap(), "hello");
        assert!(store.property_exists("c", "b").unwrap());
        assert!(!store.property_exists("c", "missing").unwrap());
    }

    #[test]
    fn missing_property_and_kind_mismatch_are_errors() {
        let store = MemoryStore::new();
        store.create_collection("c").unwrap();
        store.set_text("c", "t", "hello").unwrap();

        assert!(store.get_int("c", "absent").is_err());
        assert!(store.get_bool("c", "t").is_err());
        assert!(store.get_int("x", "t").is_err());
    }

    #[test]
    fn set_on_unknown_collection_is_an_error() {
        let store = MemoryStore::new();
        assert!(store.set_bool("nope", "k", true).is_err());
    }

    #[test]
    fn overwrite_replaces_the_stored_value() {
        let store = MemoryStore::new();
        store.create_collection("c").unwrap();
        store.set_text("c", "theme", "dark").unwrap();
        store.set_text("c", "theme", "light").unwrap();
        assert_eq!(store.get_text("c", "theme").unwrap(), "light");
    }
}
