//! Login and logout command handlers

use anyhow::{Context, Result};

use drawsync_core::credential::{clear_credential, save_credential};
use drawsync_core::{
    Config, Credential, CredentialProvider, FileStore, GithubClient, RemoteApi, SyncError,
};

use super::with_timeout;
use crate::output::Output;
use crate::prompt::PromptCredentialProvider;

/// Verify a token against the API and store it
pub async fn login(config: &Config, token: Option<String>, output: &Output) -> Result<()> {
    let credential = match token {
        Some(token) => Credential::new(token).context("Token must not be empty")?,
        None => PromptCredentialProvider
            .provide()
            .ok_or(SyncError::MissingCredential)?,
    };

    // Reject bad tokens before they are stored
    let client = GithubClient::from_config(config)?;
    let user = with_timeout(config, client.current_user(&credential)).await?;

    let store = FileStore::from_config(config);
    save_credential(&store, &credential)?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "status": "success",
                "login": user.login,
                "name": user.name,
            })
        );
    } else {
        output.success(&format!("Logged in as {}", user.login));
    }

    Ok(())
}

/// Remove the stored token
pub fn logout(config: &Config, output: &Output) -> Result<()> {
    let store = FileStore::from_config(config);

    if clear_credential(&store)? {
        output.success("Removed stored token");
    } else {
        output.message("No token stored.");
    }

    Ok(())
}
