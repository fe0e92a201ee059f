//! Local key-value storage
//!
//! Holds the state that outlives a single push or pull:
//!
//! - `github_pat` - the access token
//! - `document` - the local document (plain JSON text)
//! - `remote_version` - version tag of the last successful push or pull
//!
//! Two implementations are provided: [`FileStore`] keeps everything in one
//! JSON file under the data directory, [`MemoryStore`] keeps it in process.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the access token
pub const CREDENTIAL_KEY: &str = "github_pat";

/// Key holding the local document
pub const DOCUMENT_KEY: &str = "document";

/// Key holding the version tag this store last synced against
pub const SYNCED_VERSION_KEY: &str = "remote_version";

/// String key-value store shared by the credential and document state
///
/// Implementations use interior mutability; no cross-process locking is
/// provided.
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value (no-op if absent)
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
