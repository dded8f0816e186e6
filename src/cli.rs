//! CLI struct definitions for the prefstore inspection tool.
//!
//! All clap-derived types live here. Dispatch logic lives in `main.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "prefstore",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect and edit a prefstore settings database (raw store access; settings objects never enter the picture)"
)]
pub(crate) struct Cli {
    /// Path to the settings database.
    #[clap(long)]
    pub db: PathBuf,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// List collection names
    Collections,
    /// Print the properties of one collection, or of all collections
    Dump {
        /// Collection to dump (all collections if omitted)
        collection: Option<String>,
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
    /// Print a single raw value
    Get { collection: String, key: String },
    /// Write a single raw value, creating the collection if needed
    Set {
        collection: String,
        key: String,
        value: String,
        /// Stored kind: 'bool', 'int', or 'text'.
        #[clap(long, default_value = "text")]
        kind: String,
    },
}
