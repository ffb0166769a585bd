//! HTTP surface of the liaison backend.
//!
//! - `commands`: the core operations as JSON endpoints under `/api/commands`.
//! - `voice`: voice-platform envelope intake and intent dispatch under `/api/voice`.
//! - `respond`: speech text for successes and for each kind of failure.

pub mod commands;
pub mod respond;
pub mod voice;

use crate::config::{Config, StoreConfig};
use crate::errors::{ErrorContext, LiaisonError};
use crate::store::{DocumentStore, MappingStore, SqliteMappingStore, StoreConnection};
use crate::timing::Ttls;
use crate::voice_api::{LookupError, VoiceApiClient};
use std::sync::Arc;

/// Application state shared with every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreConfig,
    /// Service-account credential blob, assembled once at startup.
    pub credentials: Arc<Vec<u8>>,
    pub ttls: Ttls,
    pub voice_api: VoiceApiClient,
}

impl AppState {
    pub fn new(config: &Config, credentials: Vec<u8>) -> Result<Self, LookupError> {
        Ok(Self {
            store: config.store.clone(),
            credentials: Arc::new(credentials),
            ttls: config.ttls,
            voice_api: VoiceApiClient::new(&config.voice_api)?,
        })
    }

    /// Opens both stores for one invocation.
    pub fn open_stores(&self) -> Result<OpenStores, LiaisonError> {
        let documents = StoreConnection::open(
            &self.store.documents_path,
            &self.store.project,
            &self.credentials,
        )?;
        let mappings = SqliteMappingStore::open(&self.store.mappings_path).map_err(|e| {
            LiaisonError::store(ErrorContext::new("open_store", "could not open user mapping store"), e)
        })?;
        Ok(OpenStores { documents, mappings })
    }
}

/// Connections held for the duration of one command; dropping them releases both.
pub struct OpenStores {
    pub documents: StoreConnection,
    pub mappings: SqliteMappingStore,
}

impl OpenStores {
    pub fn stores(&self) -> Stores<'_> {
        Stores {
            documents: &self.documents,
            mappings: &self.mappings,
        }
    }

    pub fn close(self) {
        self.documents.close();
    }
}

/// The stores a command operates on.
#[derive(Clone, Copy)]
pub struct Stores<'a> {
    pub documents: &'a dyn DocumentStore,
    pub mappings: &'a dyn MappingStore,
}
