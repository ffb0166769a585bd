//! # Job Cursor Manager
//!
//! One cursor document per voice identity in the `cursor` collection, overwritten
//! whenever a job is created or scanned into. When an utterance omits the job
//! name the cursor supplies it, as long as it is no older than the cursor TTL.

use crate::errors::{ErrorContext, LiaisonError};
use crate::store::{get_record, set_record, DocumentStore, CURSOR_COLLECTION};
use crate::timing::is_cursor_stale;
use chrono::{DateTime, Duration, Utc};
use common::model::cursor::CursorRecord;

/// Job name to act on: the explicit one if given, otherwise the fresh cursor's.
///
/// An explicit name is returned verbatim without touching the store.
pub fn effective_job_name(
    documents: &dyn DocumentStore,
    explicit_name: &str,
    voice_identity: &str,
    cursor_ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, LiaisonError> {
    if !explicit_name.is_empty() {
        return Ok(explicit_name.to_string());
    }

    let context = |log: &str| ErrorContext::new("effective_job_name", log).voice(voice_identity);
    let cursor: Option<CursorRecord> = get_record(documents, CURSOR_COLLECTION, voice_identity)
        .map_err(|e| LiaisonError::store(context("could not read cursor"), e))?;
    let cursor = cursor.ok_or_else(|| LiaisonError::CursorNotFound(context("no cursor for voice identity")))?;

    if is_cursor_stale(cursor.set, now, cursor_ttl) {
        return Err(LiaisonError::CursorExpired(
            context(&format!("cursor set at {} is expired", cursor.set))
                .account(&cursor.account_identity)
                .job(&cursor.job_name),
        ));
    }
    Ok(cursor.job_name)
}

/// Like [`effective_job_name`], for operations that cannot proceed without a job.
///
/// A missing cursor is reported as `MissingJobName`; an expired one stays `CursorExpired`.
pub fn required_job_name(
    documents: &dyn DocumentStore,
    explicit_name: &str,
    voice_identity: &str,
    cursor_ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, LiaisonError> {
    match effective_job_name(documents, explicit_name, voice_identity, cursor_ttl, now) {
        Err(LiaisonError::CursorNotFound(context)) => Err(LiaisonError::MissingJobName(ErrorContext {
            log: "no job name given and no cursor to fall back on".to_string(),
            ..context
        })),
        other => other,
    }
}

/// Overwrites the cursor of `voice_identity` with `job_name`, stamped `now`.
pub fn record_cursor(
    documents: &dyn DocumentStore,
    job_name: &str,
    voice_identity: &str,
    account_identity: &str,
    now: DateTime<Utc>,
) -> Result<(), LiaisonError> {
    let cursor = CursorRecord {
        set: now,
        account_identity: account_identity.to_string(),
        job_name: job_name.to_string(),
    };
    set_record(documents, CURSOR_COLLECTION, voice_identity, &cursor).map_err(|e| {
        LiaisonError::store(
            ErrorContext::new("record_cursor", "could not set new cursor")
                .account(account_identity)
                .voice(voice_identity)
                .job(job_name),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::doubles::{memory_store, UntouchableStore};
    use common::requests::ErrorKind;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn explicit_name_skips_the_store() {
        let name =
            effective_job_name(&UntouchableStore, "Invoice", "voice-1", Duration::minutes(5), t0()).unwrap();
        assert_eq!(name, "Invoice");
    }

    #[test]
    fn fresh_cursor_supplies_job_name() {
        let store = memory_store();
        record_cursor(&store, "Invoice", "voice-1", "acct-1", t0()).unwrap();

        let later = t0() + Duration::minutes(5);
        let name = effective_job_name(&store, "", "voice-1", Duration::minutes(5), later).unwrap();
        assert_eq!(name, "Invoice");
    }

    #[test]
    fn stale_cursor_is_expired() {
        let store = memory_store();
        record_cursor(&store, "Invoice", "voice-1", "acct-1", t0()).unwrap();

        let later = t0() + Duration::minutes(5) + Duration::seconds(1);
        let err = effective_job_name(&store, "", "voice-1", Duration::minutes(5), later).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CursorExpired);
        assert_eq!(err.context().job_name.as_deref(), Some("Invoice"));

        let err = required_job_name(&store, "", "voice-1", Duration::minutes(5), later).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CursorExpired);
    }

    #[test]
    fn missing_cursor_depends_on_whether_a_job_is_required() {
        let store = memory_store();

        let err = effective_job_name(&store, "", "voice-1", Duration::minutes(5), t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CursorNotFound);

        let err = required_job_name(&store, "", "voice-1", Duration::minutes(5), t0()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingJobName);
        assert_eq!(err.context().voice_identity.as_deref(), Some("voice-1"));
    }

    #[test]
    fn record_cursor_overwrites_previous_job() {
        let store = memory_store();
        record_cursor(&store, "Invoice", "voice-1", "acct-1", t0()).unwrap();
        record_cursor(&store, "Receipts", "voice-1", "acct-1", t0() + Duration::minutes(1)).unwrap();

        let cursor: CursorRecord = get_record(&store, CURSOR_COLLECTION, "voice-1").unwrap().unwrap();
        assert_eq!(cursor.job_name, "Receipts");
        assert_eq!(cursor.set, t0() + Duration::minutes(1));
    }
}
