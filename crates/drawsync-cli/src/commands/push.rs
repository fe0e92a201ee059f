//! Push command handler

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use drawsync_core::{Config, DocumentSync, LocalDocument, PushMode};

use super::with_timeout;
use crate::output::Output;
use crate::prompt::credential_provider;

/// Push the local document, optionally importing it from a file first
pub async fn push(
    config: &Config,
    file: Option<PathBuf>,
    force: bool,
    output: &Output,
) -> Result<()> {
    let sync = DocumentSync::from_config(config, credential_provider())?;

    if let Some(path) = file {
        let document = read_document(&path)?;
        sync.save_local_document(&document)?;
    }

    let mode = if force {
        PushMode::Force
    } else {
        PushMode::Checked
    };
    let ack = with_timeout(config, sync.push_stored(mode)).await?;
    output.print_ack(&ack);

    Ok(())
}

/// Read a JSON document from disk, rejecting anything that does not parse
fn read_document(path: &PathBuf) -> Result<LocalDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document from {:?}", path))?;
    let document = LocalDocument::new(content);
    document
        .to_json()
        .with_context(|| format!("{:?} is not valid JSON", path))?;
    Ok(document)
}
