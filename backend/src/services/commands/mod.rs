//! # Command Service Module
//!
//! The core operations exposed as JSON endpoints under `/api/commands`. Each
//! invocation opens the stores, runs its steps strictly in order, and releases the
//! stores when it returns.
//!
//! ## Registered Routes:
//!
//! *   **`POST /sync`**: completes a pending account link with a spoken code.
//! *   **`POST /create_job`**: points the cursor at a new job.
//! *   **`POST /scan`**: queues a page scan into the named or remembered job.
//! *   **`POST /deliver`**: queues delivery of a job to the account email.
//! *   **`POST /quick_scan`**: scans into a throwaway job and delivers it.
//!
//! Success is `200 OK` with a `CommandOutcome`; failure is a `CommandFailure`
//! with a status chosen from its kind.

mod create_job;
mod deliver;
mod quick_scan;
mod scan;
mod sync;

pub use create_job::{create_job, create_job_with};
pub use deliver::{deliver, deliver_with};
pub use quick_scan::{quick_scan, quick_scan_with};
pub use scan::{scan, scan_with};
pub use sync::{complete_sync, sync};

use super::respond::classify;
use crate::errors::LiaisonError;
use actix_web::web::{post, scope};
use actix_web::{HttpResponse, Scope};
use common::requests::{CommandFailure, CommandOutcome, ErrorKind};

const API_PATH: &str = "/api/commands";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/sync", post().to(sync::process))
        .route("/create_job", post().to(create_job::process))
        .route("/scan", post().to(scan::process))
        .route("/deliver", post().to(deliver::process))
        .route("/quick_scan", post().to(quick_scan::process))
}

fn reply(result: Result<CommandOutcome, LiaisonError>) -> HttpResponse {
    let err = match result {
        Ok(outcome) => return HttpResponse::Ok().json(outcome),
        Err(err) => err,
    };
    let (kind, message) = classify(&err);
    let mut response = match kind {
        ErrorKind::MissingJobName
        | ErrorKind::CursorNotFound
        | ErrorKind::CursorExpired
        | ErrorKind::UnsupportedMethod
        | ErrorKind::InvalidAddress => HttpResponse::BadRequest(),
        ErrorKind::CodeNotFound => HttpResponse::NotFound(),
        ErrorKind::CodeExpired => HttpResponse::Gone(),
        ErrorKind::UnlinkedAccount => HttpResponse::Forbidden(),
        ErrorKind::Transport => HttpResponse::BadGateway(),
        ErrorKind::Store | ErrorKind::Auth => HttpResponse::ServiceUnavailable(),
    };
    response.json(CommandFailure {
        kind,
        message: message.to_string(),
    })
}
