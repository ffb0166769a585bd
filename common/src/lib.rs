//! Types shared between the liaison backend and anything that talks to it.
//!
//! - `model`: the documents persisted in the document store and the mapping store.
//! - `requests`: JSON payloads of the command endpoints and their replies.
//! - `voice`: the subset of the voice-platform envelope the dispatcher reads and writes.

pub mod model;
pub mod requests;
pub mod voice;
