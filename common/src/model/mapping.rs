use serde::{Deserialize, Serialize};

/// Durable voice identity to account identity mapping.
///
/// Written the first time an identity is resolved through a completed linking
/// record, then trusted for every later resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMapping {
    pub voice_identity: String,
    pub account_identity: String,
}
