//! In-process remote
//!
//! Mirrors the GitHub semantics the sync relies on: tokens map to users,
//! repository creation is idempotent, and writes are rejected unless they
//! name the current version of the file. Every call is recorded so callers
//! can assert on ordering.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    ContainerStatus, CreateContainer, DocumentWrite, RemoteApi, RemoteFile, RemoteUser,
    WriteReceipt,
};
use crate::credential::Credential;
use crate::document::{decode_content, encode_content, LocalDocument, RemoteLocation, VersionTag};
use crate::error::{SyncError, SyncResult};

type DocumentKey = (String, String, String);

#[derive(Debug, Default)]
struct RemoteState {
    users: HashMap<String, RemoteUser>,
    containers: HashSet<(String, String)>,
    containers_created: usize,
    documents: HashMap<DocumentKey, RemoteFile>,
    commits: usize,
    calls: Vec<&'static str>,
    offline: bool,
}

/// Remote held entirely in memory
///
/// Cloning yields another handle onto the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    state: Arc<Mutex<RemoteState>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token and the user it resolves to
    pub fn with_user(self, token: &str, user: RemoteUser) -> Self {
        self.lock().users.insert(token.to_string(), user);
        self
    }

    /// Make every subsequent call fail with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Names of the calls made so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn has_container(&self, owner: &str, name: &str) -> bool {
        self.lock()
            .containers
            .contains(&(owner.to_string(), name.to_string()))
    }

    /// Number of repositories actually created (not counting "already exists")
    pub fn containers_created(&self) -> usize {
        self.lock().containers_created
    }

    /// Raw stored file at `location`
    pub fn file(&self, location: &RemoteLocation) -> Option<RemoteFile> {
        self.lock().documents.get(&key(location)).cloned()
    }

    /// Number of successful writes
    pub fn commit_count(&self) -> usize {
        self.lock().commits
    }

    /// Write directly, as another client would, bypassing version checks
    pub fn overwrite(&self, location: &RemoteLocation, document: &LocalDocument) -> VersionTag {
        let mut state = self.lock();
        state
            .containers
            .insert((location.owner.clone(), location.repository.clone()));
        let version = fresh_version();
        state.documents.insert(
            key(location),
            RemoteFile {
                sha: version.clone(),
                content: encode_content(document),
                encoding: Some("base64".to_string()),
            },
        );
        state.commits += 1;
        version
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call, then check connectivity and the token
    fn enter(
        &self,
        call: &'static str,
        credential: &Credential,
    ) -> SyncResult<(MutexGuard<'_, RemoteState>, RemoteUser)> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.offline {
            return Err(SyncError::TransportError("connection refused".to_string()));
        }
        let user = state
            .users
            .get(credential.expose())
            .cloned()
            .ok_or_else(|| SyncError::AuthFailure {
                status: 401,
                message: "Bad credentials".to_string(),
            })?;
        Ok((state, user))
    }
}

#[async_trait]
impl RemoteApi for MemoryRemote {
    async fn current_user(&self, credential: &Credential) -> SyncResult<RemoteUser> {
        let (_state, user) = self.enter("current_user", credential)?;
        Ok(user)
    }

    async fn create_container(
        &self,
        credential: &Credential,
        request: &CreateContainer,
    ) -> SyncResult<ContainerStatus> {
        let (mut state, user) = self.enter("create_container", credential)?;
        if request.name.is_empty() {
            return Err(SyncError::ContainerCreateFailure {
                repository: request.name.clone(),
                status: 422,
                message: "name is too short".to_string(),
            });
        }
        if state.containers.insert((user.login, request.name.clone())) {
            state.containers_created += 1;
            Ok(ContainerStatus::Created)
        } else {
            Ok(ContainerStatus::AlreadyExists)
        }
    }

    async fn fetch_document(
        &self,
        credential: &Credential,
        location: &RemoteLocation,
    ) -> SyncResult<Option<RemoteFile>> {
        let (state, _user) = self.enter("fetch_document", credential)?;
        Ok(state.documents.get(&key(location)).cloned())
    }

    async fn write_document(
        &self,
        credential: &Credential,
        location: &RemoteLocation,
        write: &DocumentWrite,
    ) -> SyncResult<WriteReceipt> {
        let (mut state, _user) = self.enter("write_document", credential)?;

        let container = (location.owner.clone(), location.repository.clone());
        if !state.containers.contains(&container) {
            return Err(SyncError::Api {
                status: 404,
                message: "Not Found".to_string(),
            });
        }

        decode_content(&write.content).map_err(|_| SyncError::Api {
            status: 422,
            message: "content is not valid Base64".to_string(),
        })?;

        let current = state.documents.get(&key(location)).map(|f| f.sha.clone());
        if current != write.sha {
            return Err(SyncError::VersionConflict {
                path: location.path.clone(),
                expected: write.sha.as_ref().map(|v| v.to_string()),
                found: current.map(|v| v.to_string()),
            });
        }

        let version = fresh_version();
        state.documents.insert(
            key(location),
            RemoteFile {
                sha: version.clone(),
                content: write.content.clone(),
                encoding: Some("base64".to_string()),
            },
        );
        state.commits += 1;
        let commit = format!("commit-{}", state.commits);

        Ok(WriteReceipt {
            version,
            commit: Some(commit),
        })
    }
}

fn key(location: &RemoteLocation) -> DocumentKey {
    (
        location.owner.clone(),
        location.repository.clone(),
        location.path.clone(),
    )
}

fn fresh_version() -> VersionTag {
    VersionTag::new(uuid::Uuid::new_v4().simple().to_string())
}
