//! Lookups against the voice platform's device and profile APIs.
//!
//! Both calls are plain bearer-token GETs. They feed the core with the device
//! location used when completing a link and the email address used for
//! delivery.

use crate::config::VoiceApiConfig;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("voice API answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Postal address of a device as returned by the device settings API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceAddress {
    pub state_or_region: String,
    pub city: String,
    pub country_code: String,
    pub postal_code: String,
    pub address_line1: String,
    pub address_line2: String,
    pub address_line3: String,
    pub district_or_county: String,
}

impl DeviceAddress {
    /// Location string stored on a completed linking record, e.g. `"Austin, TX 78701"`.
    pub fn prompted_location(&self) -> String {
        format!("{}, {} {}", self.city, self.state_or_region, self.postal_code)
    }
}

#[derive(Clone)]
pub struct VoiceApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl VoiceApiClient {
    pub fn new(config: &VoiceApiConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn device_address(&self, token: &str, device_id: &str) -> Result<DeviceAddress, LookupError> {
        let url = format!("{}/v1/devices/{}/settings/address", self.base_url, device_id);
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = reject_error_status(response).await?;
        Ok(response.json::<DeviceAddress>().await?)
    }

    /// The account email; the API returns it as a JSON string.
    pub async fn user_email(&self, token: &str) -> Result<String, LookupError> {
        let url = format!("{}/v2/accounts/~current/settings/Profile.email", self.base_url);
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = reject_error_status(response).await?;
        Ok(response.json::<String>().await?)
    }
}

async fn reject_error_status(response: reqwest::Response) -> Result<reqwest::Response, LookupError> {
    let status = response.status();
    if status.as_u16() > 399 {
        let body = response.text().await.unwrap_or_default();
        return Err(LookupError::Status { status, body });
    }
    Ok(response)
}
