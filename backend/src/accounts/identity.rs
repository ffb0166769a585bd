//! # Identity Resolver
//!
//! Resolves the account identity a voice identity acts for. Sources are tried in
//! order and the first hit wins:
//!
//! 1.  **Session**: an account identity already cached in the voice session is
//!     returned as-is, without touching any store.
//! 2.  **Mapping store**: the durable voice identity to account identity cache.
//! 3.  **Completed link**: an accepted linking record for the voice identity. The
//!     result is written back into the mapping store for next time. That write is
//!     best effort: its failure is logged and the resolution still succeeds.
//!
//! When none of them knows the voice identity the user has never linked and the
//! call fails with `UnlinkedAccount`. A store failure in step 2 or 3 aborts the
//! resolution instead of falling through. A mapping or linking record with an
//! empty account identity counts as no match.

use crate::errors::{ErrorContext, LiaisonError};
use crate::store::{query_records, DocumentStore, Filter, MappingStore, SYNC_COLLECTION};
use common::model::linking::LinkingRecord;
use common::model::mapping::AccountMapping;
use log::{debug, warn};

const OPERATION: &str = "resolve_account_identity";

pub fn resolve_account_identity(
    documents: &dyn DocumentStore,
    mappings: &dyn MappingStore,
    voice_identity: &str,
    session_account_identity: &str,
) -> Result<String, LiaisonError> {
    if !session_account_identity.is_empty() {
        return Ok(session_account_identity.to_string());
    }

    let cached = mappings.get(voice_identity).map_err(|e| {
        LiaisonError::store(
            ErrorContext::new(OPERATION, "could not read user mapping").voice(voice_identity),
            e,
        )
    })?;
    if let Some(mapping) = cached.filter(|mapping| !mapping.account_identity.is_empty()) {
        debug!("resolved {voice_identity} from user mapping");
        return Ok(mapping.account_identity);
    }

    let account_identity = completed_link(documents, voice_identity)?
        .map(|record| record.account_identity)
        .ok_or_else(|| {
            LiaisonError::UnlinkedAccount(
                ErrorContext::new(OPERATION, "voice identity has not completed linking")
                    .voice(voice_identity),
            )
        })?;

    let mapping = AccountMapping {
        voice_identity: voice_identity.to_string(),
        account_identity: account_identity.clone(),
    };
    if let Err(e) = mappings.put(&mapping) {
        let context = ErrorContext::new(OPERATION, "could not persist linking result to user mapping")
            .account(&account_identity)
            .voice(voice_identity);
        warn!("user mapping backfill skipped: {context}: {e}");
    }

    Ok(account_identity)
}

/// Last accepted linking record for the voice identity that names an account, if any.
fn completed_link(
    documents: &dyn DocumentStore,
    voice_identity: &str,
) -> Result<Option<LinkingRecord>, LiaisonError> {
    let filters = [
        Filter::eq("voiceIdentity", voice_identity),
        Filter::eq("accepted", true),
    ];
    let records = query_records::<LinkingRecord>(documents, SYNC_COLLECTION, &filters).map_err(|e| {
        LiaisonError::store(
            ErrorContext::new(OPERATION, "unexpected error while retrieving linking record")
                .voice(voice_identity),
            e,
        )
    })?;
    Ok(records
        .into_iter()
        .map(|(_, record)| record)
        .filter(|record| !record.account_identity.is_empty())
        .last())
}
