//! Document types
//!
//! The local document is opaque JSON text. It travels to the remote as
//! standard base64; the contents API may wrap that base64 across lines,
//! which [`decode_content`] ignores.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Local copy of the synced state (plain JSON text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalDocument(String);

impl LocalDocument {
    /// Wrap raw document text without validation
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Serialize a JSON value into a document
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self(value.to_string())
    }

    /// Parse the document as JSON
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for LocalDocument {
    fn from(content: String) -> Self {
        Self(content)
    }
}

impl fmt::Display for LocalDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content hash of a remote document, used for optimistic concurrency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the synced document lives on the remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteLocation {
    pub owner: String,
    pub repository: String,
    pub path: String,
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.repository, self.path)
    }
}

/// Acknowledgment of a successful push
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    /// Version tag of the content just written
    pub version: VersionTag,
    /// Version tag the write replaced (`None` on first write)
    pub previous: Option<VersionTag>,
    /// Commit created by the write, when the remote reports one
    pub commit: Option<String>,
    pub location: RemoteLocation,
}

impl Ack {
    /// Whether this push created the remote document
    pub fn is_first_write(&self) -> bool {
        self.previous.is_none()
    }
}

/// Result of a successful pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulled {
    pub document: LocalDocument,
    /// Version tag of the pulled content
    pub version: VersionTag,
    pub location: RemoteLocation,
}

/// Encode document text for the remote
pub fn encode_content(document: &LocalDocument) -> String {
    STANDARD.encode(document.as_str().as_bytes())
}

/// Decode remote content back into a document
///
/// Whitespace inside the encoded text is ignored.
pub fn decode_content(encoded: &str) -> SyncResult<LocalDocument> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;
    let text = String::from_utf8(bytes)
        .map_err(|e| SyncError::Decode(format!("remote content is not UTF-8: {}", e)))?;
    Ok(LocalDocument(text))
}
