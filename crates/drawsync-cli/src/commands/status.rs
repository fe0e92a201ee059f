//! Status command handler

use anyhow::Result;

use drawsync_core::credential::stored_credential;
use drawsync_core::storage::{DOCUMENT_KEY, SYNCED_VERSION_KEY};
use drawsync_core::{Config, FileStore, KeyValueStore};

use crate::output::{Output, OutputFormat};

/// Show token presence, local document and remote settings
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let store = FileStore::from_config(config);

    let logged_in = stored_credential(&store)?.is_some();
    let document_size = store.get(DOCUMENT_KEY)?.map(|d| d.len());
    let synced_version = store.get(SYNCED_VERSION_KEY)?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "logged_in": logged_in,
                    "document_size": document_size,
                    "synced_version": synced_version,
                    "remote": {
                        "api_url": config.api_url,
                        "repository": config.repository,
                        "document_path": config.document_path,
                        "private": config.private_repository
                    },
                    "store_path": store.path()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", synced_version.as_deref().unwrap_or(""));
        }
        OutputFormat::Human => {
            println!("drawsync Status");
            println!("===============");
            println!();
            println!(
                "Token:    {}",
                if logged_in { "stored" } else { "not set" }
            );
            match document_size {
                Some(size) => println!("Document: {} bytes", size),
                None => println!("Document: (none)"),
            }
            println!(
                "Synced:   {}",
                synced_version.as_deref().unwrap_or("(never)")
            );
            println!();
            println!("Remote:");
            println!("  API:        {}", config.api_url);
            println!("  Repository: {}", config.repository);
            println!("  Path:       {}", config.document_path);
            println!(
                "  Visibility: {}",
                if config.private_repository {
                    "private"
                } else {
                    "public"
                }
            );
            println!();
            println!("Store: {}", store.path().display());
        }
    }

    Ok(())
}
