use super::reply;
use crate::accounts::identity::resolve_account_identity;
use crate::errors::{ErrorContext, LiaisonError};
use crate::job_controller::commands::{enqueue_delivery, EMAIL_METHOD};
use crate::job_controller::cursor::required_job_name;
use crate::services::{AppState, Stores};
use crate::timing::Ttls;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::requests::{CommandOutcome, DeliverRequest};

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<DeliverRequest>) -> HttpResponse {
    reply(deliver(&state, &payload).await)
}

/// Emails the job to the address on the voice account.
///
/// The job name is settled before the email lookup so a user without a job is
/// asked for one rather than hitting a lookup failure.
pub async fn deliver(state: &AppState, req: &DeliverRequest) -> Result<CommandOutcome, LiaisonError> {
    let open = state.open_stores()?;
    let now = Utc::now();
    let job_name = required_job_name(
        &open.documents,
        &req.job_name,
        &req.voice_identity,
        state.ttls.cursor,
        now,
    )?;
    let email = state
        .voice_api
        .user_email(&req.email_lookup_token)
        .await
        .map_err(|source| LiaisonError::Transport {
            context: ErrorContext::new("deliver", "could not get user email")
                .voice(&req.voice_identity)
                .job(&job_name),
            source,
        })?;

    let req = DeliverRequest {
        job_name,
        ..req.clone()
    };
    let outcome = deliver_with(&open.stores(), state.ttls, now, &req, EMAIL_METHOD, &email)?;
    open.close();
    Ok(outcome)
}

pub fn deliver_with(
    stores: &Stores<'_>,
    ttls: Ttls,
    now: DateTime<Utc>,
    req: &DeliverRequest,
    method: &str,
    destination: &str,
) -> Result<CommandOutcome, LiaisonError> {
    let job_name = required_job_name(stores.documents, &req.job_name, &req.voice_identity, ttls.cursor, now)?;
    let account_identity = resolve_account_identity(
        stores.documents,
        stores.mappings,
        &req.voice_identity,
        &req.session_account_identity,
    )?;
    enqueue_delivery(
        stores.documents,
        &job_name,
        &req.voice_identity,
        &account_identity,
        method,
        destination,
    )?;

    Ok(CommandOutcome {
        account_identity,
        job_name,
    })
}
