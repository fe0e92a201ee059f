//! Remote API
//!
//! The four calls a sync needs from the hosting service:
//!
//! 1. Resolve the user behind a token
//! 2. Create the repository (idempotent)
//! 3. Read a file's metadata and content
//! 4. Write a file, guarded by its current version tag
//!
//! [`GithubClient`] talks to the GitHub REST API. [`MemoryRemote`] keeps the
//! same state in process.

mod github;
mod memory;

pub use github::GithubClient;
pub use memory::MemoryRemote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::document::{RemoteLocation, VersionTag};
use crate::error::SyncResult;

/// Identity behind a token (`GET /user`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl RemoteUser {
    /// Committer identity for writes
    ///
    /// Returns `None` when the account hides its email; the remote then
    /// attributes the commit to the token owner.
    pub fn committer(&self) -> Option<Committer> {
        let email = self.email.clone().filter(|e| !e.is_empty())?;
        let name = self
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.login.clone());
        Some(Committer { name, email })
    }
}

/// Body of `POST /user/repos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateContainer {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub is_template: bool,
}

/// Outcome of a create-if-absent call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    AlreadyExists,
}

/// File metadata and content (`GET /repos/{owner}/{repo}/contents/{path}`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub sha: VersionTag,
    /// Encoded content, possibly wrapped across lines
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Author/committer identity attached to a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentWrite {
    pub message: String,
    /// Base64-encoded content
    pub content: String,
    /// Version being replaced; omitted when creating the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<VersionTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<Committer>,
}

/// What the remote reports after a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub version: VersionTag,
    pub commit: Option<String>,
}

/// Calls made against the hosting service during a sync
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Resolve the user owning `credential`
    async fn current_user(&self, credential: &Credential) -> SyncResult<RemoteUser>;

    /// Create the repository, treating "already exists" as success
    async fn create_container(
        &self,
        credential: &Credential,
        request: &CreateContainer,
    ) -> SyncResult<ContainerStatus>;

    /// Fetch the document, or `None` if it does not exist
    async fn fetch_document(
        &self,
        credential: &Credential,
        location: &RemoteLocation,
    ) -> SyncResult<Option<RemoteFile>>;

    /// Write the document
    ///
    /// Fails with `VersionConflict` when `write.sha` is not the current
    /// version (or is omitted while the document exists).
    async fn write_document(
        &self,
        credential: &Credential,
        location: &RemoteLocation,
        write: &DocumentWrite,
    ) -> SyncResult<WriteReceipt>;
}
