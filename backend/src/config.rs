//! Process-wide configuration, read once at startup from the environment.

use crate::timing::Ttls;
use chrono::Duration as TtlDuration;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read {key}: {message}")]
    Unreadable { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub voice_api: VoiceApiConfig,
    pub ttls: Ttls,
}

/// Where the document store and the account mapping store live.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project the service-account credentials must belong to.
    pub project: String,
    pub documents_path: PathBuf,
    pub mappings_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct VoiceApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: optional_env("LIAISON_HOST")?.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_optional_env("LIAISON_PORT", 8080)?,
            store: StoreConfig {
                project: optional_env("STORE_PROJECT")?.unwrap_or_else(|| "reborne".to_string()),
                documents_path: optional_env("STORE_PATH")?
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("liaison.sqlite")),
                mappings_path: optional_env("USER_MAPPINGS_PATH")?
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("user_mappings.sqlite")),
            },
            voice_api: VoiceApiConfig {
                base_url: optional_env("VOICE_API_BASE")?
                    .unwrap_or_else(|| "https://api.amazonalexa.com".to_string()),
                timeout: Duration::from_secs(parse_optional_env("VOICE_API_TIMEOUT_SECS", 5)?),
            },
            ttls: Ttls {
                cursor: ttl_env("CURSOR_TTL_SECS", 300)?,
                sync: ttl_env("SYNC_TTL_SECS", 180)?,
            },
        })
    }
}

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::Unreadable {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|v| v.unwrap_or(default))
}

fn ttl_env(key: &str, default_secs: i64) -> Result<TtlDuration, ConfigError> {
    let secs: i64 = parse_optional_env(key, default_secs)?;
    TtlDuration::try_seconds(secs)
        .filter(|ttl| *ttl > TtlDuration::zero())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{secs} is not a usable number of seconds"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn optional_env_treats_empty_as_missing() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::set_var("_LIAISON_TEST_EMPTY", "");
        assert_eq!(optional_env("_LIAISON_TEST_EMPTY").unwrap(), None);
        std::env::remove_var("_LIAISON_TEST_EMPTY");
    }

    #[test]
    fn parse_optional_env_falls_back_to_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::remove_var("_LIAISON_TEST_PORT");
        let port: u16 = parse_optional_env("_LIAISON_TEST_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn parse_optional_env_rejects_garbage() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::set_var("_LIAISON_TEST_TTL", "five minutes");
        let result: Result<i64, _> = parse_optional_env("_LIAISON_TEST_TTL", 300);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        std::env::remove_var("_LIAISON_TEST_TTL");
    }

    #[test]
    fn ttl_must_be_positive() {
        let _lock = ENV_LOCK.lock().unwrap();
        std::env::set_var("_LIAISON_TEST_TTL_ZERO", "0");
        assert!(ttl_env("_LIAISON_TEST_TTL_ZERO", 300).is_err());
        std::env::remove_var("_LIAISON_TEST_TTL_ZERO");
        assert_eq!(
            ttl_env("_LIAISON_TEST_TTL_ZERO", 300).unwrap(),
            TtlDuration::minutes(5)
        );
    }
}
