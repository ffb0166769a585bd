//! Job bookkeeping for voice commands.
//!
//! - `cursor`: remembers the last job each voice identity used, so follow-up
//!   utterances may leave the job name out.
//! - `commands`: validates and appends the scan and delivery command documents
//!   consumed by the workers.

pub mod commands;
pub mod cursor;
