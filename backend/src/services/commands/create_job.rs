use super::reply;
use crate::accounts::identity::resolve_account_identity;
use crate::errors::{ErrorContext, LiaisonError};
use crate::job_controller::cursor::record_cursor;
use crate::services::{AppState, Stores};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::requests::{CommandOutcome, JobRequest};

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<JobRequest>) -> HttpResponse {
    reply(create_job(&state, &payload))
}

pub fn create_job(state: &AppState, req: &JobRequest) -> Result<CommandOutcome, LiaisonError> {
    let open = state.open_stores()?;
    let outcome = create_job_with(&open.stores(), Utc::now(), req)?;
    open.close();
    Ok(outcome)
}

/// Makes `req.job_name` the current job of the voice identity.
pub fn create_job_with(
    stores: &Stores<'_>,
    now: DateTime<Utc>,
    req: &JobRequest,
) -> Result<CommandOutcome, LiaisonError> {
    if req.job_name.is_empty() {
        return Err(LiaisonError::MissingJobName(
            ErrorContext::new("create_job", "could not set cursor without a job name")
                .voice(&req.voice_identity),
        ));
    }
    let account_identity = resolve_account_identity(
        stores.documents,
        stores.mappings,
        &req.voice_identity,
        &req.session_account_identity,
    )?;
    record_cursor(stores.documents, &req.job_name, &req.voice_identity, &account_identity, now)?;

    Ok(CommandOutcome {
        account_identity,
        job_name: req.job_name.clone(),
    })
}
