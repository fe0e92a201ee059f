//! drawsync Core Library
//!
//! This crate keeps a single drawing document (opaque JSON) in sync with a
//! file in a GitHub repository owned by the token holder.
//!
//! # Architecture
//!
//! - **DocumentSync**: the push/pull sequence (token, user, repository,
//!   version, write)
//! - **RemoteApi**: the remote calls, backed by GitHub or kept in memory
//! - **KeyValueStore**: local state (token, document, last synced version)
//! - **CredentialProvider**: supplies a token when none is stored
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let sync = DocumentSync::from_config(&config, EnvCredentialProvider)?;
//!
//! let ack = sync.push(&LocalDocument::new(r#"{"shapes":[]}"#)).await?;
//! let doc = sync.pull().await?;
//! ```
//!
//! # Modules
//!
//! - `sync`: push/pull sequencing (main entry point)
//! - `remote`: GitHub client and in-memory remote
//! - `storage`: local key-value stores
//! - `credential`: token handling and providers
//! - `document`: document, version tag and content encoding
//! - `error`: sync error kinds
//! - `config`: application configuration

pub mod config;
pub mod credential;
pub mod document;
pub mod error;
pub mod remote;
pub mod storage;
pub mod sync;

pub use config::Config;
pub use credential::{
    ChainedCredentialProvider, Credential, CredentialProvider, DenyCredentialProvider,
    EnvCredentialProvider, StaticCredentialProvider,
};
pub use document::{Ack, LocalDocument, Pulled, RemoteLocation, VersionTag};
pub use error::{SyncError, SyncResult};
pub use remote::{GithubClient, MemoryRemote, RemoteApi, RemoteUser};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use sync::{DocumentSync, PushMode, SyncSettings};
