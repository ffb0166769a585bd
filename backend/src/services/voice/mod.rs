//! Voice-platform intake.
//!
//! The platform posts its request envelope to `POST /api/voice`; `dispatch` picks
//! the operation from the intent name and answers with a speech response.

mod dispatch;

pub use dispatch::dispatch;

use actix_web::web;

const API_PATH: &str = "/api/voice";

pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH).route("", web::post().to(dispatch::process))
}
