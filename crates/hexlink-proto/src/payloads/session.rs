//! Handshake and session payloads.

use serde::{Deserialize, Serialize};

use crate::model::PlayerId;

/// Client version and build identity, sent in reply to a version check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientVersions {
    /// Release version, e.g. "0.50.1".
    pub version: String,
    /// Build identity (commit or content hash).
    pub build: String,
}

/// Client display name, sent after the greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientName {
    /// Requested player name.
    pub name: String,
    /// Whether an automated collaborator plays this seat.
    pub is_bot: bool,
}

/// Server rejected the client's version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IllegalClientVersion {
    /// Version the server runs.
    pub server_version: String,
}

/// Server picked a different name for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectName {
    /// Name to use from now on.
    pub name: String,
}

/// Server assigned the local player id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalPlayerNumber {
    /// Local player id.
    pub player_id: PlayerId,
}
