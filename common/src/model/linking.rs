use serde::{Deserialize, Serialize};

/// A pending or completed account-link transaction.
///
/// The account dashboard creates the record with `accepted = false`, an empty
/// `voice_identity` and a freshly generated code. The backend mutates it exactly
/// once, when the user speaks that code before it expires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkingRecord {
    pub voice_identity: String,
    /// Rendered postal location of the device that completed the link.
    pub location: String,
    /// The code as it was heard, echoed back for auditing.
    pub spoken_code: String,
    pub generated_code: String,
    pub accepted: bool,
    /// Creation time in milliseconds since the Unix epoch.
    pub initialized_at_millis: i64,
    pub account_identity: String,
}
