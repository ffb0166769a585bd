//! Command documents consumed by the scanning and delivery workers.
//!
//! The backend only ever appends these; the workers delete them once handled.

use serde::{Deserialize, Serialize};

/// A request to scan one page into a job.
///
/// `method` and `destination` are only present for quick scans, which deliver
/// the page right after scanning it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanCommand {
    pub account_identity: String,
    pub voice_identity: String,
    pub job_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// A request to deliver a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCommand {
    pub account_identity: String,
    pub voice_identity: String,
    pub job_name: String,
    pub method: String,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_command_omits_unset_delivery_fields() {
        let command = ScanCommand {
            account_identity: "acct-1".to_string(),
            voice_identity: "voice-1".to_string(),
            job_name: "Invoice".to_string(),
            method: None,
            destination: None,
        };

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "accountIdentity": "acct-1",
                "voiceIdentity": "voice-1",
                "jobName": "Invoice",
            })
        );
    }
}
