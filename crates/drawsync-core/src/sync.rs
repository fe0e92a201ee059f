//! Document sync
//!
//! Pushes the local document to the remote repository, or pulls it back.
//! Both directions run the same sequence:
//!
//! 1. Obtain the access token (ask the provider and store it if missing)
//! 2. Resolve the user behind the token
//! 3. Ensure the repository exists (create-if-absent)
//! 4. Fetch the remote document's current version
//! 5. Write (push) or decode and store (pull)
//!
//! Each step depends on the previous one and none is skipped. Step 4 is
//! repeated on every push so that a write always names the version it
//! replaces; a stale version is reported as `VersionConflict` instead of
//! overwriting someone else's change.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::credential::{clear_credential, obtain_credential, Credential, CredentialProvider};
use crate::document::{
    decode_content, encode_content, Ack, LocalDocument, Pulled, RemoteLocation, VersionTag,
};
use crate::error::{SyncError, SyncResult};
use crate::remote::{
    ContainerStatus, CreateContainer, DocumentWrite, GithubClient, RemoteApi, RemoteFile,
    RemoteUser,
};
use crate::storage::{FileStore, KeyValueStore, DOCUMENT_KEY, SYNCED_VERSION_KEY};

/// How a push treats a remote version it has not seen before
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushMode {
    /// Refuse to overwrite a remote version other than the one last synced
    #[default]
    Checked,
    /// Overwrite whatever version is current (last writer wins)
    Force,
}

/// Remote naming and repository creation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub repository: String,
    pub description: String,
    pub private: bool,
    pub document_path: String,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            repository: config.repository.clone(),
            description: config.repository_description.clone(),
            private: config.private_repository,
            document_path: config.document_path.clone(),
        }
    }

    fn location(&self, owner: &str) -> RemoteLocation {
        RemoteLocation {
            owner: owner.to_string(),
            repository: self.repository.clone(),
            path: self.document_path.clone(),
        }
    }

    fn create_request(&self) -> CreateContainer {
        CreateContainer {
            name: self.repository.clone(),
            description: self.description.clone(),
            private: self.private,
            is_template: false,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Which way the document moves, and what step 5 yields
#[async_trait]
trait Direction: Send {
    type Output: Send;

    async fn finish<R, S, P>(
        self,
        sync: &DocumentSync<R, S, P>,
        session: &Session,
        existing: Option<RemoteFile>,
    ) -> SyncResult<Self::Output>
    where
        R: RemoteApi,
        S: KeyValueStore,
        P: CredentialProvider;
}

/// Decode the remote document into the store
struct Read;

/// Write `document` over the fetched version
struct Write<'a> {
    document: &'a LocalDocument,
    mode: PushMode,
}

#[async_trait]
impl Direction for Read {
    type Output = Pulled;

    async fn finish<R, S, P>(
        self,
        sync: &DocumentSync<R, S, P>,
        session: &Session,
        existing: Option<RemoteFile>,
    ) -> SyncResult<Pulled>
    where
        R: RemoteApi,
        S: KeyValueStore,
        P: CredentialProvider,
    {
        sync.read(session, existing)
    }
}

#[async_trait]
impl<'a> Direction for Write<'a> {
    type Output = Ack;

    async fn finish<R, S, P>(
        self,
        sync: &DocumentSync<R, S, P>,
        session: &Session,
        existing: Option<RemoteFile>,
    ) -> SyncResult<Ack>
    where
        R: RemoteApi,
        S: KeyValueStore,
        P: CredentialProvider,
    {
        sync.write(session, existing, self.document, self.mode).await
    }
}

/// Token, identity and location resolved by steps 1-3
struct Session {
    credential: Credential,
    user: RemoteUser,
    location: RemoteLocation,
    container: ContainerStatus,
}

/// Synchronizes one local document with one remote file
pub struct DocumentSync<R, S, P> {
    remote: R,
    store: S,
    provider: P,
    settings: SyncSettings,
}

impl<P: CredentialProvider> DocumentSync<GithubClient, FileStore, P> {
    /// Sync against GitHub using the on-disk store from `config`
    pub fn from_config(config: &Config, provider: P) -> SyncResult<Self> {
        Ok(Self::new(
            GithubClient::from_config(config)?,
            FileStore::from_config(config),
            provider,
            SyncSettings::from_config(config),
        ))
    }
}

impl<R, S, P> DocumentSync<R, S, P>
where
    R: RemoteApi,
    S: KeyValueStore,
    P: CredentialProvider,
{
    pub fn new(remote: R, store: S, provider: P, settings: SyncSettings) -> Self {
        Self {
            remote,
            store,
            provider,
            settings,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Push `document`, refusing to overwrite unseen remote changes
    pub async fn push(&self, document: &LocalDocument) -> SyncResult<Ack> {
        self.push_with(document, PushMode::Checked).await
    }

    pub async fn push_with(&self, document: &LocalDocument, mode: PushMode) -> SyncResult<Ack> {
        self.run(Write { document, mode }).await
    }

    /// Push the document currently held in the local store
    pub async fn push_stored(&self, mode: PushMode) -> SyncResult<Ack> {
        let document = self.local_document()?.ok_or(SyncError::NoLocalDocument)?;
        self.push_with(&document, mode).await
    }

    /// Pull the remote document into the local store and return it
    pub async fn pull(&self) -> SyncResult<LocalDocument> {
        Ok(self.pull_detailed().await?.document)
    }

    /// Like [`pull`](Self::pull), also reporting version and location
    pub async fn pull_detailed(&self) -> SyncResult<Pulled> {
        self.run(Read).await
    }

    /// Run steps 1-3 only
    pub async fn ensure_container(&self) -> SyncResult<(RemoteLocation, ContainerStatus)> {
        let session = self.open_session().await?;
        Ok((session.location, session.container))
    }

    /// Local document, if one is stored
    pub fn local_document(&self) -> SyncResult<Option<LocalDocument>> {
        Ok(self.store.get(DOCUMENT_KEY)?.map(LocalDocument::new))
    }

    /// Replace the stored local document
    pub fn save_local_document(&self, document: &LocalDocument) -> SyncResult<()> {
        self.store.set(DOCUMENT_KEY, document.as_str())?;
        Ok(())
    }

    /// Version tag of the last successful push or pull
    pub fn synced_version(&self) -> SyncResult<Option<VersionTag>> {
        Ok(self
            .store
            .get(SYNCED_VERSION_KEY)?
            .filter(|v| !v.is_empty())
            .map(VersionTag::new))
    }

    /// Remove the stored access token
    pub fn forget_credential(&self) -> SyncResult<bool> {
        clear_credential(&self.store)
    }

    /// The one sequencing routine shared by push and pull
    async fn run<D: Direction>(&self, direction: D) -> SyncResult<D::Output> {
        let session = self.open_session().await?;

        let existing = self
            .remote
            .fetch_document(&session.credential, &session.location)
            .await?;

        direction.finish(self, &session, existing).await
    }

    async fn open_session(&self) -> SyncResult<Session> {
        let credential = obtain_credential(&self.store, &self.provider)?;

        let user = self.remote.current_user(&credential).await?;
        debug!("Authenticated as {}", user.login);

        let container = self
            .remote
            .create_container(&credential, &self.settings.create_request())
            .await?;
        let location = self.settings.location(&user.login);
        if container == ContainerStatus::Created {
            info!("Created repository {}/{}", location.owner, location.repository);
        }

        Ok(Session {
            credential,
            user,
            location,
            container,
        })
    }

    fn read(&self, session: &Session, existing: Option<RemoteFile>) -> SyncResult<Pulled> {
        let file = existing.ok_or_else(|| SyncError::NotFound {
            path: session.location.path.clone(),
        })?;

        if let Some(encoding) = file.encoding.as_deref() {
            if encoding != "base64" {
                return Err(SyncError::Decode(format!(
                    "unsupported content encoding '{}' for {}",
                    encoding, session.location
                )));
            }
        }

        let document = decode_content(&file.content)?;
        self.store.set(DOCUMENT_KEY, document.as_str())?;
        self.store.set(SYNCED_VERSION_KEY, file.sha.as_str())?;

        info!(
            "Pulled {} ({} bytes, version {})",
            session.location,
            document.len(),
            file.sha.short()
        );
        Ok(Pulled {
            document,
            version: file.sha,
            location: session.location.clone(),
        })
    }

    async fn write(
        &self,
        session: &Session,
        existing: Option<RemoteFile>,
        document: &LocalDocument,
        mode: PushMode,
    ) -> SyncResult<Ack> {
        let previous = existing.map(|file| file.sha);

        if mode == PushMode::Checked {
            let synced = self.synced_version()?;
            if let Some(current) = &previous {
                if synced.as_ref() != Some(current) {
                    warn!(
                        "Remote {} is at version {} but this store last synced {:?}",
                        session.location,
                        current.short(),
                        synced.as_ref().map(|v| v.short())
                    );
                    return Err(SyncError::VersionConflict {
                        path: session.location.path.clone(),
                        expected: synced.map(|v| v.to_string()),
                        found: Some(current.to_string()),
                    });
                }
            }
        }

        let write = DocumentWrite {
            message: commit_message(),
            content: encode_content(document),
            sha: previous.clone(),
            committer: session.user.committer(),
        };

        let receipt = self
            .remote
            .write_document(&session.credential, &session.location, &write)
            .await?;
        self.store.set(SYNCED_VERSION_KEY, receipt.version.as_str())?;

        info!(
            "Pushed {} ({} bytes, version {})",
            session.location,
            document.len(),
            receipt.version.short()
        );

        Ok(Ack {
            version: receipt.version,
            previous,
            commit: receipt.commit,
            location: session.location.clone(),
        })
    }
}

fn commit_message() -> String {
    format!(
        "Synced at {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
