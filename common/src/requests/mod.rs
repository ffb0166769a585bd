//! Payloads of the `/api/commands` endpoints.

use serde::{Deserialize, Serialize};

/// Completes a pending account link with the code the user spoke.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRequest {
    pub code: String,
    pub voice_identity: String,
    /// Bearer token for the device address lookup.
    pub location_lookup_token: String,
    pub device_id: String,
}

/// Shared by create-job and scan: an optional job name plus the caller's identities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRequest {
    pub job_name: String,
    pub voice_identity: String,
    /// Account identity cached in the voice session, empty when unknown.
    pub session_account_identity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliverRequest {
    pub job_name: String,
    pub voice_identity: String,
    pub session_account_identity: String,
    /// Bearer token for the account email lookup.
    pub email_lookup_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickScanRequest {
    pub voice_identity: String,
    pub session_account_identity: String,
    pub method: String,
    pub destination: String,
}

/// Successful reply of every command: who the command was attributed to, and to which job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub account_identity: String,
    pub job_name: String,
}

/// Classification of a failed command. The dispatch layer only ever looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingJobName,
    CursorNotFound,
    CursorExpired,
    CodeNotFound,
    CodeExpired,
    UnlinkedAccount,
    UnsupportedMethod,
    InvalidAddress,
    Store,
    Auth,
    Transport,
}

/// Failed reply of a command endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFailure {
    pub kind: ErrorKind,
    /// User-facing text for this kind of failure.
    pub message: String,
}
