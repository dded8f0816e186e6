//! Core modules for the prefstore persistence engine.

pub mod engine;
pub mod error;
pub mod field;
pub mod notify;
pub mod sqlite;
pub mod store;
