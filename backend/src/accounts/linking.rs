//! # Linking Transaction Manager
//!
//! Completes a pending account link once the user speaks the code shown on the
//! account dashboard.
//!
//! 1.  **Match**: find unaccepted linking records whose generated code equals the
//!     spoken code. None is `CodeNotFound`. When several match, the last one in
//!     store order is used and the ambiguity is logged.
//! 2.  **Expiry**: the code is only good until `initialized_at + sync_ttl`. An
//!     expired record is reported as `CodeExpired` and left untouched.
//! 3.  **Accept**: voice identity, spoken code and device location are applied to
//!     a copy of the record, which is marked accepted and written back keyed by its
//!     account identity in a single document write. If the write fails nothing is
//!     committed and the caller gets `Store`.
//!
//! Accepted records no longer match step 1, so repeating a successful call with
//! the same code yields `CodeNotFound`.

use crate::errors::{ErrorContext, LiaisonError};
use crate::store::{query_records, set_record, DocumentStore, Filter, SYNC_COLLECTION};
use crate::timing::{from_epoch_millis, is_linking_expired, linking_deadline};
use chrono::{DateTime, Duration, Utc};
use common::model::linking::LinkingRecord;
use log::{debug, warn};

const OPERATION: &str = "complete_linking";

/// Accepts the pending link for `spoken_code` and returns the accepted record.
pub fn complete_linking(
    documents: &dyn DocumentStore,
    spoken_code: &str,
    voice_identity: &str,
    resolved_location: &str,
    sync_ttl: Duration,
    now: DateTime<Utc>,
) -> Result<LinkingRecord, LiaisonError> {
    let context = |log: &str| ErrorContext::new(OPERATION, log).code(spoken_code).voice(voice_identity);

    let filters = [
        Filter::eq("generatedCode", spoken_code),
        Filter::eq("accepted", false),
    ];
    let mut candidates = query_records::<LinkingRecord>(documents, SYNC_COLLECTION, &filters)
        .map_err(|e| LiaisonError::store(context("unexpected error while retrieving linking record"), e))?;

    if candidates.len() > 1 {
        warn!(
            "{} pending linking records share code {spoken_code}; using the last one",
            candidates.len()
        );
    }
    let (_, pending) = candidates
        .pop()
        .ok_or_else(|| LiaisonError::CodeNotFound(context("no pending linking record for code")))?;

    let initialized_at = from_epoch_millis(pending.initialized_at_millis);
    if is_linking_expired(initialized_at, now, sync_ttl) {
        let deadline = linking_deadline(initialized_at, sync_ttl)
            .map_or_else(|| "never".to_string(), |deadline| deadline.to_string());
        return Err(LiaisonError::CodeExpired(
            context(&format!("linking record initialized {initialized_at} expired at {deadline}"))
                .account(&pending.account_identity),
        ));
    }

    let accepted = LinkingRecord {
        voice_identity: voice_identity.to_string(),
        spoken_code: spoken_code.to_string(),
        location: resolved_location.to_string(),
        accepted: true,
        ..pending
    };
    set_record(documents, SYNC_COLLECTION, &accepted.account_identity, &accepted).map_err(|e| {
        LiaisonError::store(
            context("could not update linking record").account(&accepted.account_identity),
            e,
        )
    })?;

    debug!("linked {voice_identity} to {}", accepted.account_identity);
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::doubles::{memory_store, FailingWrites};
    use crate::store::get_record;
    use common::requests::ErrorKind;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_600, 0).unwrap()
    }

    fn pending(account_identity: &str, code: &str, age: Duration) -> LinkingRecord {
        LinkingRecord {
            generated_code: code.to_string(),
            initialized_at_millis: (now() - age).timestamp_millis(),
            account_identity: account_identity.to_string(),
            ..Default::default()
        }
    }

    fn seed(store: &dyn DocumentStore, record: &LinkingRecord) {
        set_record(store, SYNC_COLLECTION, &record.account_identity, record).unwrap();
    }

    fn stored(store: &dyn DocumentStore, account_identity: &str) -> LinkingRecord {
        get_record(store, SYNC_COLLECTION, account_identity).unwrap().unwrap()
    }

    #[test]
    fn accepts_fresh_code_and_attaches_voice_identity_and_location() {
        let store = memory_store();
        seed(&store, &pending("acct-1", "4812", Duration::seconds(30)));

        let accepted = complete_linking(
            &store,
            "4812",
            "voice-1",
            "Austin, TX 78701",
            Duration::minutes(3),
            now(),
        )
        .unwrap();

        assert!(accepted.accepted);
        assert_eq!(stored(&store, "acct-1"), accepted);
        assert_eq!(accepted.voice_identity, "voice-1");
        assert_eq!(accepted.spoken_code, "4812");
        assert_eq!(accepted.location, "Austin, TX 78701");
    }

    #[test]
    fn unknown_code_is_not_found() {
        let store = memory_store();
        seed(&store, &pending("acct-1", "4812", Duration::seconds(30)));

        let err = complete_linking(&store, "9999", "voice-1", "", Duration::minutes(3), now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CodeNotFound);
        assert_eq!(err.context().spoken_code.as_deref(), Some("9999"));
    }

    #[test]
    fn expired_code_leaves_record_untouched() {
        let store = memory_store();
        let record = pending("acct-1", "4812", Duration::seconds(181));
        seed(&store, &record);

        let err = complete_linking(&store, "4812", "voice-1", "Austin", Duration::minutes(3), now())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CodeExpired);
        assert_eq!(stored(&store, "acct-1"), record);
    }

    #[test]
    fn code_expires_exactly_at_deadline() {
        let store = memory_store();
        seed(&store, &pending("acct-1", "4812", Duration::minutes(3)));

        let err = complete_linking(&store, "4812", "voice-1", "", Duration::minutes(3), now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CodeExpired);
    }

    #[test]
    fn far_future_initialization_is_accepted_without_overflow() {
        let store = memory_store();
        let record = LinkingRecord {
            initialized_at_millis: 8_210_266_876_799_000,
            ..pending("acct-1", "4812", Duration::zero())
        };
        seed(&store, &record);

        let accepted =
            complete_linking(&store, "4812", "voice-1", "", Duration::minutes(3), now()).unwrap();

        assert!(accepted.accepted);
        assert_eq!(stored(&store, "acct-1").initialized_at_millis, 8_210_266_876_799_000);
    }

    #[test]
    fn second_completion_with_same_code_is_not_found() {
        let store = memory_store();
        seed(&store, &pending("acct-1", "4812", Duration::seconds(10)));
        let ttl = Duration::minutes(3);

        complete_linking(&store, "4812", "voice-1", "Austin", ttl, now()).unwrap();
        let err = complete_linking(&store, "4812", "voice-1", "Austin", ttl, now()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CodeNotFound);
    }

    #[test]
    fn ambiguous_code_picks_last_pending_record() {
        let store = memory_store();
        seed(&store, &pending("acct-1", "4812", Duration::seconds(20)));
        seed(&store, &pending("acct-2", "4812", Duration::seconds(10)));

        let accepted =
            complete_linking(&store, "4812", "voice-1", "", Duration::minutes(3), now()).unwrap();

        assert_eq!(accepted.account_identity, "acct-2");
        assert!(!stored(&store, "acct-1").accepted);
    }

    #[test]
    fn failed_write_commits_nothing() {
        let inner = memory_store();
        let record = pending("acct-1", "4812", Duration::seconds(10));
        seed(&inner, &record);
        let store = FailingWrites {
            inner: &inner,
            fail_reads: false,
        };

        let err = complete_linking(&store, "4812", "voice-1", "Austin", Duration::minutes(3), now())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(stored(&inner, "acct-1"), record);
    }
}
