//! Save/load engine walking a settings type's field registry.
//!
//! `save`/`load` reproduce the legacy fail-soft contract: every failure is
//! caught at the operation boundary and surfaced only as a debug diagnostic.
//! A mid-loop store failure therefore leaves the operation partially applied
//! (already-written fields stay written, the rest are skipped) and the caller
//! cannot observe it. Hosts that need to react to failures use `try_save`/
//! `try_load`, which return the error instead; the fail-soft entry points are
//! thin wrappers over them. There is no rollback in either flavor.

use crate::core::error::PrefstoreError;
use crate::core::field::{FieldKind, FieldValue, Settings, encode_float, parse_float};
use crate::core::notify::ChangeNotifier;
use crate::core::store::SettingsStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Per-collection-name exclusion locks, allocated lazily.
///
/// Concurrent save/load calls against the same collection would otherwise
/// race on the exists-then-create check and interleave field writes; calls
/// against different collections stay independent.
#[derive(Default)]
struct CollectionLocks {
    entries: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CollectionLocks {
    fn get(&self, name: &str) -> Result<Arc<Mutex<()>>, PrefstoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PrefstoreError::StoreAccess("collection lock table poisoned".to_string()))?;
        Ok(entries
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

/// The settings persistence engine, generic over its injected store.
///
/// One engine per store handle; meant to be constructed once and shared for
/// the life of the process (wrap in `Arc` for multi-threaded hosts).
pub struct SettingsEngine<S: SettingsStore> {
    store: S,
    notifier: ChangeNotifier,
    locks: CollectionLocks,
}

impl<S: SettingsStore> SettingsEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: ChangeNotifier::new(),
            locks: CollectionLocks::default(),
        }
    }

    /// The injected store handle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The change notifier fired after successful saves.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Fail-soft save. Never returns an error; failures are logged at debug
    /// level and otherwise invisible to the caller.
    pub fn save<T: Settings + 'static>(&self, settings: &T) {
        if let Err(err) = self.try_save(settings) {
            debug!(collection = T::NAME, error = %err, "settings save failed");
        }
    }

    /// Strict save: write every registered field into the collection named
    /// `T::NAME`, creating the collection on first use.
    ///
    /// Fires the change notifier exactly once iff at least one field was
    /// written. The first store error aborts the remaining fields; fields
    /// already written stay written and the notifier does not fire.
    pub fn try_save<T: Settings + 'static>(&self, settings: &T) -> Result<(), PrefstoreError> {
        let lock = self.locks.get(T::NAME)?;
        let _guard = lock
            .lock()
            .map_err(|_| PrefstoreError::StoreAccess("collection lock poisoned".to_string()))?;

        if !self.store.collection_exists(T::NAME)? {
            self.store.create_collection(T::NAME)?;
        }

        let mut any_saved = false;
        for field in T::fields() {
            match (field.get)(settings) {
                FieldValue::Bool(value) => self.store.set_bool(T::NAME, field.name, value)?,
                FieldValue::Int(value) => self.store.set_int(T::NAME, field.name, value)?,
                FieldValue::Float(value) => {
                    self.store
                        .set_text(T::NAME, field.name, &encode_float(value))?
                }
                FieldValue::Text(value) => self.store.set_text(T::NAME, field.name, &value)?,
            }
            any_saved = true;
        }

        if any_saved {
            self.notifier.notify();
        }
        Ok(())
    }

    /// Fail-soft load. Never returns an error; failures are logged at debug
    /// level and otherwise invisible to the caller.
    pub fn load<T: Settings + 'static>(&self, settings: &mut T) {
        if let Err(err) = self.try_load(settings) {
            debug!(collection = T::NAME, error = %err, "settings load failed");
        }
    }

    /// Strict load: read every registered field back into `settings`.
    ///
    /// No-ops entirely if the collection was never saved. A key absent from
    /// the collection leaves that field at its in-memory value, so a type
    /// grown since the data was written keeps defaults for its new fields.
    /// A stored float that fails to parse loads as `0.0` (diagnostic only;
    /// the original value is unrecoverable). The first store error aborts
    /// the remaining fields; fields already loaded keep their new values.
    pub fn try_load<T: Settings + 'static>(&self, settings: &mut T) -> Result<(), PrefstoreError> {
        let lock = self.locks.get(T::NAME)?;
        let _guard = lock
            .lock()
            .map_err(|_| PrefstoreError::StoreAccess("collection lock poisoned".to_string()))?;

        if !self.store.collection_exists(T::NAME)? {
            return Ok(());
        }

        for field in T::fields() {
            if !self.store.property_exists(T::NAME, field.name)? {
                continue;
            }
            let value = match field.kind {
                FieldKind::Bool => FieldValue::Bool(self.store.get_bool(T::NAME, field.name)?),
                FieldKind::Int => FieldValue::Int(self.store.get_int(T::NAME, field.name)?),
                FieldKind::Text => FieldValue::Text(self.store.get_text(T::NAME, field.name)?),
                FieldKind::Float => {
                    let raw = self.store.get_text(T::NAME, field.name)?;
                    let parsed = match parse_float(field.name, &raw) {
                        Ok(value) => value,
                        Err(err) => {
                            debug!(collection = T::NAME, error = %err, "stored float unreadable, loading zero");
                            0.0
                        }
                    };
                    FieldValue::Float(parsed)
                }
            };
            (field.set)(settings, value);
        }
        Ok(())
    }
}
