use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The last job a voice identity operated on.
///
/// Stored in the `cursor` collection keyed by the voice identity and overwritten
/// on every successful create-job or scan. The job name is only usable while the
/// record is fresh; see `CURSOR_TTL_SECS` on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRecord {
    /// When the cursor was written.
    pub set: DateTime<Utc>,
    /// Account identity the job belongs to.
    pub account_identity: String,
    /// Name of the job the user last created or scanned into.
    pub job_name: String,
}
