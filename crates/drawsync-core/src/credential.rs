//! Access token handling
//!
//! The token is read from the local store. When it is missing, a
//! [`CredentialProvider`] is asked to supply one; a supplied token is stored
//! and reused for every later operation until it is cleared.

use std::fmt;

use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};
use crate::storage::{KeyValueStore, CREDENTIAL_KEY};

/// Environment variable read by [`EnvCredentialProvider`]
pub const TOKEN_ENV_VAR: &str = "DRAWSYNC_TOKEN";

/// Bearer token for the remote API
///
/// `Debug` and `Display` never print the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting blank input
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Supplies a token when none is stored, or declines
pub trait CredentialProvider: Send + Sync {
    fn provide(&self) -> Option<Credential>;
}

/// Always supplies the same token
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider(Credential);

impl StaticCredentialProvider {
    pub fn new(credential: Credential) -> Self {
        Self(credential)
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn provide(&self) -> Option<Credential> {
        Some(self.0.clone())
    }
}

/// Always declines
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyCredentialProvider;

impl CredentialProvider for DenyCredentialProvider {
    fn provide(&self) -> Option<Credential> {
        None
    }
}

/// Reads the token from `DRAWSYNC_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn provide(&self) -> Option<Credential> {
        std::env::var(TOKEN_ENV_VAR).ok().and_then(Credential::new)
    }
}

/// Tries each provider in order until one supplies a token
pub struct ChainedCredentialProvider {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentialProvider {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl Default for ChainedCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for ChainedCredentialProvider {
    fn provide(&self) -> Option<Credential> {
        self.providers.iter().find_map(|p| p.provide())
    }
}

/// Load the stored token without consulting a provider
pub fn stored_credential(store: &dyn KeyValueStore) -> SyncResult<Option<Credential>> {
    Ok(store.get(CREDENTIAL_KEY)?.and_then(Credential::new))
}

/// Return the stored token, or obtain one from the provider and store it
pub fn obtain_credential(
    store: &dyn KeyValueStore,
    provider: &dyn CredentialProvider,
) -> SyncResult<Credential> {
    if let Some(credential) = stored_credential(store)? {
        debug!("Using stored access token");
        return Ok(credential);
    }

    let credential = provider.provide().ok_or(SyncError::MissingCredential)?;
    store.set(CREDENTIAL_KEY, credential.expose())?;
    info!("Stored new access token");
    Ok(credential)
}

/// Store a token, replacing any existing one
pub fn save_credential(store: &dyn KeyValueStore, credential: &Credential) -> SyncResult<()> {
    store.set(CREDENTIAL_KEY, credential.expose())?;
    Ok(())
}

/// Remove the stored token. Returns whether one was present.
pub fn clear_credential(store: &dyn KeyValueStore) -> SyncResult<bool> {
    let had = store.get(CREDENTIAL_KEY)?.is_some();
    store.remove(CREDENTIAL_KEY)?;
    if had {
        info!("Cleared stored access token");
    }
    Ok(had)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        token: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl CredentialProvider for CountingProvider {
        fn provide(&self) -> Option<Credential> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.token.and_then(Credential::new)
        }
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        assert_eq!(Credential::new(" ghp_x \n").unwrap().expose(), "ghp_x");
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("ghp_supersecret").unwrap();
        assert!(!format!("{:?}", credential).contains("supersecret"));
        assert!(!credential.to_string().contains("supersecret"));
        assert_eq!(credential.bearer(), "Bearer ghp_supersecret");
    }

    #[test]
    fn test_obtain_prompts_once_then_reuses() {
        let store = MemoryStore::new();
        let provider = CountingProvider {
            token: Some("ghp_first"),
            calls: AtomicUsize::new(0),
        };

        let first = obtain_credential(&store, &provider).unwrap();
        let second = obtain_credential(&store, &provider).unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap().as_deref(), Some("ghp_first"));
    }

    #[test]
    fn test_declined_prompt_stores_nothing() {
        let store = MemoryStore::new();

        let err = obtain_credential(&store, &DenyCredentialProvider).unwrap_err();
        assert!(matches!(err, SyncError::MissingCredential));
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_stored_token_is_treated_as_missing() {
        let store = MemoryStore::with_entries([(CREDENTIAL_KEY, "")]);

        let err = obtain_credential(&store, &DenyCredentialProvider).unwrap_err();
        assert!(matches!(err, SyncError::MissingCredential));
    }

    #[test]
    fn test_chained_provider_falls_through() {
        let provider = ChainedCredentialProvider::new()
            .with(DenyCredentialProvider)
            .with(StaticCredentialProvider::new(Credential::new("ghp_chain").unwrap()));

        assert_eq!(provider.provide().unwrap().expose(), "ghp_chain");
        assert!(ChainedCredentialProvider::new().provide().is_none());
    }

    #[test]
    fn test_clear_credential() {
        let store = MemoryStore::with_entries([(CREDENTIAL_KEY, "ghp_x")]);

        assert!(clear_credential(&store).unwrap());
        assert!(!clear_credential(&store).unwrap());
        assert!(stored_credential(&store).unwrap().is_none());
    }
}
