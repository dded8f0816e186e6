use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use prefstore::core::sqlite::SqliteStore;
use prefstore::core::store::{SettingsStore, StoredValue};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("open settings database {}", cli.db.display()))?;

    match cli.command {
        Command::Collections => {
            for name in store.collections()? {
                println!("{}", name);
            }
        }
        Command::Dump { collection, format } => dump(&store, collection.as_deref(), &format)?,
        Command::Get { collection, key } => {
            let entry = store
                .properties(&collection)?
                .into_iter()
                .find(|(k, _)| *k == key);
            match entry {
                Some((_, value)) => println!("{}", render(&value)),
                None => bail!("no property '{}' in collection '{}'", key, collection),
            }
        }
        Command::Set {
            collection,
            key,
            value,
            kind,
        } => {
            if !store.collection_exists(&collection)? {
                store.create_collection(&collection)?;
            }
            match kind.as_str() {
                "bool" => {
                    let parsed = value
                        .parse()
                        .context("value must be 'true' or 'false' for --kind bool")?;
                    store.set_bool(&collection, &key, parsed)?;
                }
                "int" => {
                    let parsed = value.parse().context("value must be an integer for --kind int")?;
                    store.set_int(&collection, &key, parsed)?;
                }
                "text" => store.set_text(&collection, &key, &value)?,
                other => bail!("unknown kind '{}': expected bool, int, or text", other),
            }
        }
    }

    Ok(())
}

fn dump(store: &SqliteStore, collection: Option<&str>, format: &str) -> Result<()> {
    let names = match collection {
        Some(name) => vec![name.to_string()],
        None => store.collections()?,
    };

    match format {
        "json" => {
            let mut doc = serde_json::Map::new();
            for name in names {
                let mut entries = serde_json::Map::new();
                for (key, value) in store.properties(&name)? {
                    entries.insert(key, serde_json::to_value(value)?);
                }
                doc.insert(name, entries.into());
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(doc))?
            );
        }
        "text" => {
            for name in names {
                println!("{}", name.bold());
                for (key, value) in store.properties(&name)? {
                    println!("  {} = {}", key.cyan(), render(&value));
                }
            }
        }
        other => bail!("unknown format '{}': expected text or json", other),
    }
    Ok(())
}

fn render(value: &StoredValue) -> String {
    match value {
        StoredValue::Bool(v) => v.to_string(),
        StoredValue::Int(v) => v.to_string(),
        StoredValue::Text(v) => v.clone(),
    }
}
