use super::reply;
use crate::accounts::identity::resolve_account_identity;
use crate::errors::LiaisonError;
use crate::job_controller::commands::enqueue_scan;
use crate::job_controller::cursor::effective_job_name;
use crate::services::{AppState, Stores};
use crate::timing::Ttls;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::requests::{CommandOutcome, JobRequest};

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<JobRequest>) -> HttpResponse {
    reply(scan(&state, &payload))
}

pub fn scan(state: &AppState, req: &JobRequest) -> Result<CommandOutcome, LiaisonError> {
    let open = state.open_stores()?;
    let outcome = scan_with(&open.stores(), state.ttls, Utc::now(), req)?;
    open.close();
    Ok(outcome)
}

/// Queues a scan into the named job, or into the cursor's job when no name is given.
pub fn scan_with(
    stores: &Stores<'_>,
    ttls: Ttls,
    now: DateTime<Utc>,
    req: &JobRequest,
) -> Result<CommandOutcome, LiaisonError> {
    let job_name = effective_job_name(stores.documents, &req.job_name, &req.voice_identity, ttls.cursor, now)?;
    let account_identity = resolve_account_identity(
        stores.documents,
        stores.mappings,
        &req.voice_identity,
        &req.session_account_identity,
    )?;
    enqueue_scan(stores.documents, &job_name, &req.voice_identity, &account_identity, now)?;

    Ok(CommandOutcome {
        account_identity,
        job_name,
    })
}
