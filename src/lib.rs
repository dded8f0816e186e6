//! Prefstore: typed settings persistence over a hierarchical key-value store.
//!
//! Prefstore marshals the fields of caller-owned settings objects into named
//! collections of a key-value store, and back. Each settings type declares a
//! compile-time field registry (name, scalar kind, getter, setter); the engine
//! walks that registry in declaration order, one store operation per field.
//!
//! # Core pieces
//!
//! - [`core::field`]: the `Settings` trait, field descriptors, and the
//!   [`settings_fields!`] macro that generates registries.
//! - [`core::store`]: the `SettingsStore` adapter contract plus an in-memory
//!   implementation for tests and embedding.
//! - [`core::sqlite`]: the SQLite-backed store adapter.
//! - [`core::engine`]: save/load in both fail-soft and strict flavors.
//! - [`core::notify`]: the settings-changed subscription registry.
//!
//! # Contract highlights
//!
//! - Four scalar kinds only: boolean, integer, floating-point, text.
//!   Floating-point values travel through the store as their canonical
//!   textual encoding.
//! - `save`/`load` never return errors. Failures abort the remaining fields,
//!   leave already-touched fields as they are, and surface only as debug
//!   diagnostics. The `try_save`/`try_load` variants return the error instead.
//! - A successful save that wrote at least one field fires the change
//!   notifier exactly once, synchronously, on the saving thread.
//! - Loading a collection that was never saved leaves every field at its
//!   in-memory value, so defaults stand.
//!
//! # Example
//!
//! ```
//! use prefstore::core::engine::SettingsEngine;
//! use prefstore::core::store::MemoryStore;
//! use prefstore::settings_fields;
//!
//! struct EditorSettings {
//!     enabled: bool,
//!     font_size: i64,
//!     zoom: f64,
//!     theme: String,
//! }
//!
//! settings_fields!(EditorSettings, "Editor", {
//!     enabled: bool,
//!     font_size: int,
//!     zoom: float,
//!     theme: text,
//! });
//!
//! let engine = SettingsEngine::new(MemoryStore::new());
//! let editor = EditorSettings {
//!     enabled: true,
//!     font_size: 12,
//!     zoom: 1.25,
//!     theme: "dark".to_string(),
//! };
//! engine.save(&editor);
//!
//! let mut fresh = EditorSettings {
//!     enabled: false,
//!     font_size: 0,
//!     zoom: 0.0,
//!     theme: String::new(),
//! };
//! engine.load(&mut fresh);
//! assert_eq!(fresh.font_size, 12);
//! assert_eq!(fresh.theme, "dark");
//! ```

pub mod core;
