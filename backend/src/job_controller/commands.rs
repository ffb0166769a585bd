//! # Command Enqueuer
//!
//! Appends scan and delivery command documents for the workers. Scanning also
//! refreshes the cursor. Delivery input is validated before anything is written:
//! the method first (only email is supported), then the destination address, so
//! an unsupported method wins when both are wrong.

use super::cursor::record_cursor;
use crate::errors::{ErrorContext, LiaisonError};
use crate::store::{add_record, DocumentStore, DELIVERY_COLLECTION, SCAN_COLLECTION};
use chrono::{DateTime, Utc};
use common::model::command::{DeliveryCommand, ScanCommand};
use regex::Regex;

/// The only delivery method the workers understand so far.
pub const EMAIL_METHOD: &str = "email";

static EMAIL_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^(?i)[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$").unwrap()
});

pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

/// Checks method then destination without touching the store.
pub fn validate_delivery(
    operation: &'static str,
    job_name: &str,
    voice_identity: &str,
    method: &str,
    destination: &str,
) -> Result<(), LiaisonError> {
    if method != EMAIL_METHOD {
        return Err(LiaisonError::UnsupportedMethod {
            context: ErrorContext::new(operation, format!("method for delivery {method} not yet supported"))
                .voice(voice_identity)
                .job(job_name),
            method: method.to_string(),
        });
    }
    if !is_valid_email(destination) {
        return Err(LiaisonError::InvalidAddress {
            context: ErrorContext::new(operation, format!("invalid email address {destination}"))
                .voice(voice_identity)
                .job(job_name),
            input: "email address".to_string(),
        });
    }
    Ok(())
}

/// Appends a scan command and points the cursor at `job_name`.
pub fn enqueue_scan(
    documents: &dyn DocumentStore,
    job_name: &str,
    voice_identity: &str,
    account_identity: &str,
    now: DateTime<Utc>,
) -> Result<(), LiaisonError> {
    let command = ScanCommand {
        account_identity: account_identity.to_string(),
        voice_identity: voice_identity.to_string(),
        job_name: job_name.to_string(),
        method: None,
        destination: None,
    };
    add_record(documents, SCAN_COLLECTION, &command).map_err(|e| {
        LiaisonError::store(
            ErrorContext::new("enqueue_scan", "there was a problem creating the scan command")
                .account(account_identity)
                .voice(voice_identity)
                .job(job_name),
            e,
        )
    })?;
    record_cursor(documents, job_name, voice_identity, account_identity, now)
}

pub fn enqueue_delivery(
    documents: &dyn DocumentStore,
    job_name: &str,
    voice_identity: &str,
    account_identity: &str,
    method: &str,
    destination: &str,
) -> Result<(), LiaisonError> {
    validate_delivery("enqueue_delivery", job_name, voice_identity, method, destination)?;

    let command = DeliveryCommand {
        account_identity: account_identity.to_string(),
        voice_identity: voice_identity.to_string(),
        job_name: job_name.to_string(),
        method: method.to_string(),
        destination: destination.to_string(),
    };
    add_record(documents, DELIVERY_COLLECTION, &command).map_err(|e| {
        LiaisonError::store(
            ErrorContext::new("enqueue_delivery", "could not create delivery command")
                .account(account_identity)
                .voice(voice_identity)
                .job(job_name),
            e,
        )
    })?;
    Ok(())
}

/// Scans a page into a throwaway job named after the current Unix time and
/// delivers it straight away. Returns the generated job name.
///
/// The cursor is left alone.
pub fn enqueue_quick_scan(
    documents: &dyn DocumentStore,
    voice_identity: &str,
    account_identity: &str,
    method: &str,
    destination: &str,
    now: DateTime<Utc>,
) -> Result<String, LiaisonError> {
    let job_name = now.timestamp().to_string();
    validate_delivery("enqueue_quick_scan", &job_name, voice_identity, method, destination)?;

    let command = ScanCommand {
        account_identity: account_identity.to_string(),
        voice_identity: voice_identity.to_string(),
        job_name: job_name.clone(),
        method: Some(method.to_string()),
        destination: Some(destination.to_string()),
    };
    add_record(documents, SCAN_COLLECTION, &command).map_err(|e| {
        LiaisonError::store(
            ErrorContext::new("enqueue_quick_scan", "there was a problem creating the scan command")
                .account(account_identity)
                .voice(voice_identity)
                .job(&job_name),
            e,
        )
    })?;
    Ok(job_name)
}
