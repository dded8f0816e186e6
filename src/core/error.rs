use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefstoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Store access failed: {0}")]
    StoreAccess(String),
    #[error("Stored value for '{field}' is not a valid float: {value:?}")]
    Conversion { field: String, value: String },
}
