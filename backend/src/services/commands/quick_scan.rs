use super::reply;
use crate::accounts::identity::resolve_account_identity;
use crate::errors::LiaisonError;
use crate::job_controller::commands::enqueue_quick_scan;
use crate::services::{AppState, Stores};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::requests::{CommandOutcome, QuickScanRequest};

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<QuickScanRequest>) -> HttpResponse {
    reply(quick_scan(&state, &payload))
}

pub fn quick_scan(state: &AppState, req: &QuickScanRequest) -> Result<CommandOutcome, LiaisonError> {
    let open = state.open_stores()?;
    let outcome = quick_scan_with(&open.stores(), Utc::now(), req)?;
    open.close();
    Ok(outcome)
}

pub fn quick_scan_with(
    stores: &Stores<'_>,
    now: DateTime<Utc>,
    req: &QuickScanRequest,
) -> Result<CommandOutcome, LiaisonError> {
    let account_identity = resolve_account_identity(
        stores.documents,
        stores.mappings,
        &req.voice_identity,
        &req.session_account_identity,
    )?;
    let job_name = enqueue_quick_scan(
        stores.documents,
        &req.voice_identity,
        &account_identity,
        &req.method,
        &req.destination,
        now,
    )?;

    Ok(CommandOutcome {
        account_identity,
        job_name,
    })
}
