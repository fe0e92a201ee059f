//! Pull command handler

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use drawsync_core::{Config, DocumentSync};

use super::with_timeout;
use crate::output::Output;
use crate::prompt::credential_provider;

/// Pull the remote document into local storage, optionally writing a copy
pub async fn pull(config: &Config, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let sync = DocumentSync::from_config(config, credential_provider())?;

    let pulled = with_timeout(config, sync.pull_detailed()).await?;

    if let Some(path) = path {
        fs::write(&path, pulled.document.as_str())
            .with_context(|| format!("Failed to write document to {:?}", path))?;
    }

    output.print_pulled(&pulled);
    Ok(())
}
