use super::reply;
use crate::accounts::linking::complete_linking;
use crate::errors::{ErrorContext, LiaisonError};
use crate::services::{AppState, Stores};
use crate::timing::Ttls;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::requests::{CommandOutcome, SyncRequest};

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<SyncRequest>) -> HttpResponse {
    reply(sync(&state, &payload).await)
}

/// Looks up the device location, then accepts the pending link for the spoken code.
pub async fn sync(state: &AppState, req: &SyncRequest) -> Result<CommandOutcome, LiaisonError> {
    let open = state.open_stores()?;
    let address = state
        .voice_api
        .device_address(&req.location_lookup_token, &req.device_id)
        .await
        .map_err(|source| LiaisonError::Transport {
            context: ErrorContext::new("sync", "could not get device address")
                .voice(&req.voice_identity)
                .code(&req.code),
            source,
        })?;

    let outcome = complete_sync(
        &open.stores(),
        state.ttls,
        Utc::now(),
        &req.code,
        &req.voice_identity,
        &address.prompted_location(),
    )?;
    open.close();
    Ok(outcome)
}

pub fn complete_sync(
    stores: &Stores<'_>,
    ttls: Ttls,
    now: DateTime<Utc>,
    code: &str,
    voice_identity: &str,
    location: &str,
) -> Result<CommandOutcome, LiaisonError> {
    let accepted = complete_linking(stores.documents, code, voice_identity, location, ttls.sync, now)?;
    Ok(CommandOutcome {
        account_identity: accepted.account_identity,
        job_name: String::new(),
    })
}
