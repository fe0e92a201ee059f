//! Command handlers

pub mod config;
pub mod login;
pub mod pull;
pub mod push;
pub mod status;

use std::future::Future;

use anyhow::{bail, Result};

use drawsync_core::{Config, SyncResult};

/// Run a whole push or pull under the configured timeout
///
/// A timed-out operation is abandoned where it stands; the remote keeps
/// whatever the last completed step produced.
pub async fn with_timeout<T>(
    config: &Config,
    operation: impl Future<Output = SyncResult<T>>,
) -> Result<T> {
    match tokio::time::timeout(config.timeout(), operation).await {
        Ok(result) => Ok(result?),
        Err(_) => bail!(
            "Timed out after {}s. The remote may be partially updated; re-run to finish.",
            config.timeout_secs
        ),
    }
}
