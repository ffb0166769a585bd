//! The slice of the voice-platform request/response envelope this service uses.
//!
//! Unknown fields are ignored on the way in, so full platform payloads can be
//! posted as-is.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceRequest {
    pub version: String,
    pub session: Session,
    pub context: Context,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub new: bool,
    pub session_id: String,
    pub user: User,
    pub attributes: SessionAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub user_id: String,
}

/// Values the service stores in the voice session between utterances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionAttributes {
    #[serde(rename = "syncUserId", skip_serializing_if = "String::is_empty")]
    pub sync_user_id: String,
    #[serde(rename = "previousJobCursor", skip_serializing_if = "String::is_empty")]
    pub previous_job_cursor: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: System,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct System {
    pub api_access_token: String,
    pub api_endpoint: String,
    pub device: Device,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub device_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub request_type: String,
    pub request_id: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    pub name: String,
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Slot {
    pub name: String,
    pub value: Option<String>,
}

impl VoiceRequest {
    pub fn intent_name(&self) -> &str {
        &self.request.intent.name
    }

    /// Value of the named slot, or an empty string when the user left it out.
    pub fn slot(&self, name: &str) -> &str {
        self.request
            .intent
            .slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .unwrap_or("")
    }

    pub fn voice_identity(&self) -> &str {
        &self.session.user.user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceResponse {
    pub version: String,
    pub session_attributes: SessionAttributes,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl VoiceResponse {
    /// Plain-text speech response carrying the given session attributes forward.
    pub fn plain_text(text: impl Into<String>, end_session: bool, attributes: SessionAttributes) -> Self {
        Self {
            version: "1.0".to_string(),
            session_attributes: attributes,
            response: ResponseBody {
                output_speech: OutputSpeech {
                    speech_type: "PlainText".to_string(),
                    text: text.into(),
                },
                should_end_session: end_session,
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.response.output_speech.text
    }
}
