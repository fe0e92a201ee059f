//! Sync error handling
//!
//! Every failure of a push or pull surfaces as one [`SyncError`] kind. The
//! only remote response that is not an error is "repository already
//! exists" during container creation.

use thiserror::Error;

use crate::storage::StoreError;

/// Errors that can occur while pushing or pulling the document
#[derive(Error, Debug)]
pub enum SyncError {
    /// No token stored and the provider declined to supply one
    #[error("No access token available. Run `drawsync login` to provide one.")]
    MissingCredential,

    /// The remote rejected the token while resolving the user
    #[error("Authentication failed ({status}): {message}")]
    AuthFailure { status: u16, message: String },

    /// Repository creation failed for a reason other than "already exists"
    #[error("Failed to create repository '{repository}' ({status}): {message}")]
    ContainerCreateFailure {
        repository: String,
        status: u16,
        message: String,
    },

    /// Pull attempted before anything was pushed
    #[error("Remote document '{path}' does not exist")]
    NotFound { path: String },

    /// The remote document changed since the version this write is based on
    #[error("Remote document '{path}' was modified by another writer (expected version {}, found {})",
        .expected.as_deref().unwrap_or("none"),
        .found.as_deref().unwrap_or("none"))]
    VersionConflict {
        path: String,
        expected: Option<String>,
        found: Option<String>,
    },

    /// Network or transport failure
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The remote's rate limit is exhausted (403 with no requests left, or 429)
    #[error("Rate limit exceeded ({status}), resets at {}",
        .resets_at.as_deref().unwrap_or("an unknown time"))]
    RateLimited {
        status: u16,
        resets_at: Option<String>,
    },

    /// Unexpected HTTP status from the remote
    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Remote content or response body could not be decoded
    #[error("Failed to decode remote content: {0}")]
    Decode(String),

    /// `push_stored` called with no local document
    #[error("No local document stored. Push a file or pull first.")]
    NoLocalDocument,

    /// Local key-value store failure
    #[error("Local store error: {0}")]
    Storage(#[from] StoreError),
}

impl SyncError {
    /// Check if re-running the whole operation may succeed without user action
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::TransportError(_) | SyncError::RateLimited { .. } => true,
            SyncError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            SyncError::MissingCredential => {
                Some("Create a personal access token with repository access and run `drawsync login`.")
            }
            SyncError::AuthFailure { .. } => {
                Some("The stored token was rejected. Run `drawsync logout`, then `drawsync login` with a valid token.")
            }
            SyncError::NotFound { .. } => Some("Nothing has been pushed yet. Run `drawsync push` first."),
            SyncError::VersionConflict { .. } => {
                Some("Pull the latest document first, or push with --force to overwrite it.")
            }
            SyncError::TransportError(_) => Some("Check your network connection and try again."),
            SyncError::RateLimited { .. } => Some("Wait for the rate limit to reset, then try again."),
            SyncError::Storage(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Decode(err.to_string())
        } else {
            SyncError::TransportError(err.to_string())
        }
    }
}

impl From<base64::DecodeError> for SyncError {
    fn from(err: base64::DecodeError) -> Self {
        SyncError::Decode(err.to_string())
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
