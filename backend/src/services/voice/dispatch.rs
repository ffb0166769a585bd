//! # Intent Dispatch
//!
//! Maps one voice-platform request onto one core operation.
//!
//! | Intent      | Operation                                                       |
//! |-------------|-----------------------------------------------------------------|
//! | `sync`      | complete a pending link with the `spokenCode` slot              |
//! | `createJob` | make the `jobName` slot the current job                         |
//! | `scan`      | queue a scan into `jobName`, or into the remembered job         |
//! | `emailJob`  | deliver `jobName`, or the remembered job, to the account email  |
//! | `quickScan` | scan into a throwaway job and email it right away               |
//! | anything else, including help and fallback | welcome message      |
//!
//! An empty `jobName` slot falls back to the `previousJobCursor` session
//! attribute before the cursor store is consulted. On success the resolved
//! account identity and job name are written back into the session so the next
//! utterance can skip the lookups.

use crate::errors::{ErrorContext, LiaisonError};
use crate::job_controller::commands::EMAIL_METHOD;
use crate::services::commands::{create_job, deliver, quick_scan, scan, sync};
use crate::services::respond;
use crate::services::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{CommandOutcome, DeliverRequest, JobRequest, QuickScanRequest, SyncRequest};
use common::voice::{SessionAttributes, VoiceRequest, VoiceResponse};
use log::debug;

const JOB_NAME_SLOT: &str = "jobName";
const SPOKEN_CODE_SLOT: &str = "spokenCode";

pub(crate) async fn process(state: web::Data<AppState>, payload: web::Json<VoiceRequest>) -> HttpResponse {
    HttpResponse::Ok().json(dispatch(&state, &payload).await)
}

pub async fn dispatch(state: &AppState, request: &VoiceRequest) -> VoiceResponse {
    let attributes = request.session.attributes.clone();
    let voice_identity = request.voice_identity().to_string();
    let token = request.context.system.api_access_token.clone();
    debug!("dispatching intent {:?} for {voice_identity}", request.intent_name());

    let result = match request.intent_name() {
        "sync" => {
            let req = SyncRequest {
                code: request.slot(SPOKEN_CODE_SLOT).to_string(),
                voice_identity,
                location_lookup_token: token,
                device_id: request.context.system.device.device_id.clone(),
            };
            sync(state, &req).await.map(|outcome| (outcome, "sync your account".to_string()))
        }
        "createJob" => create_job(state, &job_request(request, &attributes))
            .map(|outcome| (outcome, "create a job".to_string())),
        "scan" => scan(state, &job_request(request, &attributes))
            .map(|outcome| (outcome, "scan a page".to_string())),
        "emailJob" => {
            let job = job_request(request, &attributes);
            let req = DeliverRequest {
                job_name: job.job_name,
                voice_identity,
                session_account_identity: job.session_account_identity,
                email_lookup_token: token,
            };
            deliver(state, &req).await.map(|outcome| {
                let action = format!("email job {}", outcome.job_name);
                (outcome, action)
            })
        }
        "quickScan" => quick_scan_to_account_email(state, &voice_identity, &attributes, &token)
            .await
            .map(|outcome| (outcome, "scan and email a page".to_string())),
        _ => return respond::welcome(attributes),
    };

    match result {
        Ok((outcome, action)) => respond::positively(&action, remember(attributes, &outcome)),
        Err(err) => respond::failure(&err, attributes),
    }
}

fn job_request(request: &VoiceRequest, attributes: &SessionAttributes) -> JobRequest {
    let slot = request.slot(JOB_NAME_SLOT);
    let job_name = if slot.is_empty() {
        attributes.previous_job_cursor.clone()
    } else {
        slot.to_string()
    };
    JobRequest {
        job_name,
        voice_identity: request.voice_identity().to_string(),
        session_account_identity: attributes.sync_user_id.clone(),
    }
}

async fn quick_scan_to_account_email(
    state: &AppState,
    voice_identity: &str,
    attributes: &SessionAttributes,
    token: &str,
) -> Result<CommandOutcome, LiaisonError> {
    let email = state.voice_api.user_email(token).await.map_err(|source| LiaisonError::Transport {
        context: ErrorContext::new("quick_scan", "could not get user email").voice(voice_identity),
        source,
    })?;
    let req = QuickScanRequest {
        voice_identity: voice_identity.to_string(),
        session_account_identity: attributes.sync_user_id.clone(),
        method: EMAIL_METHOD.to_string(),
        destination: email,
    };
    quick_scan(state, &req)
}

/// Session attributes for the next utterance.
fn remember(mut attributes: SessionAttributes, outcome: &CommandOutcome) -> SessionAttributes {
    attributes.sync_user_id = outcome.account_identity.clone();
    if !outcome.job_name.is_empty() {
        attributes.previous_job_cursor = outcome.job_name.clone();
    }
    attributes
}
