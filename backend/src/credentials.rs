//! Service-account credentials for the document store.
//!
//! The deployment environment provides the key as separate variables; they are
//! assembled into the JSON blob the store gateway expects.

use serde::{Deserialize, Serialize};

const KEY_FIELDS: [(&str, &str); 10] = [
    ("type", "TYPE"),
    ("project_id", "PROJECT_ID"),
    ("private_key_id", "PRIVATE_KEY_ID"),
    ("private_key", "PRIVATE_KEY"),
    ("client_email", "CLIENT_EMAIL"),
    ("client_id", "CLIENT_ID"),
    ("auth_uri", "AUTH_URI"),
    ("token_uri", "TOKEN_URI"),
    ("auth_provider_x509_cert_url", "AUTH_PROVIDER_X509_CERT_URL"),
    ("client_x509_cert_url", "CLIENT_X509_CERT_URL"),
];

/// Parsed form of the credential blob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
}

/// Builds the credential blob from the process environment.
///
/// Missing variables become empty strings; the gateway decides whether the
/// result is usable.
pub fn key_from_env() -> Vec<u8> {
    key_from_lookup(|var| std::env::var(var).ok())
}

fn key_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Vec<u8> {
    let key: serde_json::Map<String, serde_json::Value> = KEY_FIELDS
        .iter()
        .map(|&(field, var)| (field.to_string(), lookup(var).unwrap_or_default().into()))
        .collect();
    serde_json::Value::Object(key).to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_every_field_and_escapes_key_material() {
        let blob = key_from_lookup(|var| match var {
            "PROJECT_ID" => Some("reborne".to_string()),
            "PRIVATE_KEY" => Some("-----BEGIN\nabc\n-----END".to_string()),
            _ => None,
        });

        let key: ServiceAccountKey = serde_json::from_slice(&blob).unwrap();
        assert_eq!(key.project_id, "reborne");
        assert_eq!(key.private_key, "-----BEGIN\nabc\n-----END");
        assert_eq!(key.client_email, "");

        let raw: serde_json::Value = serde_json::from_slice(&blob).unwrap();
        assert_eq!(raw.as_object().unwrap().len(), KEY_FIELDS.len());
    }
}
