//! Error taxonomy of the liaison core.
//!
//! Every failure carries an [`ErrorContext`] so it can be logged with the
//! identities involved. The dispatch layer never inspects more than
//! [`LiaisonError::kind`] when choosing what to say to the user.

use crate::store::StoreFailure;
use crate::voice_api::LookupError;
use common::requests::ErrorKind;
use std::fmt;

/// Correlation data attached to every error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub account_identity: Option<String>,
    pub voice_identity: Option<String>,
    pub job_name: Option<String>,
    pub spoken_code: Option<String>,
    /// Name of the operation that failed.
    pub operation: &'static str,
    pub log: String,
}

impl ErrorContext {
    pub fn new(operation: &'static str, log: impl Into<String>) -> Self {
        Self {
            account_identity: None,
            voice_identity: None,
            job_name: None,
            spoken_code: None,
            operation,
            log: log.into(),
        }
    }

    pub fn account(mut self, account_identity: &str) -> Self {
        self.account_identity = non_empty(account_identity);
        self
    }

    pub fn voice(mut self, voice_identity: &str) -> Self {
        self.voice_identity = non_empty(voice_identity);
        self
    }

    pub fn job(mut self, job_name: &str) -> Self {
        self.job_name = non_empty(job_name);
        self
    }

    pub fn code(mut self, spoken_code: &str) -> Self {
        self.spoken_code = non_empty(spoken_code);
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "operation={} account={} voice={} job={} code={} log={}",
            self.operation,
            show(&self.account_identity),
            show(&self.voice_identity),
            show(&self.job_name),
            show(&self.spoken_code),
            self.log
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LiaisonError {
    #[error("missing job name: {0}")]
    MissingJobName(ErrorContext),

    #[error("cursor not found: {0}")]
    CursorNotFound(ErrorContext),

    #[error("cursor expired: {0}")]
    CursorExpired(ErrorContext),

    #[error("linking code not found: {0}")]
    CodeNotFound(ErrorContext),

    #[error("linking code expired: {0}")]
    CodeExpired(ErrorContext),

    #[error("voice identity not linked: {0}")]
    UnlinkedAccount(ErrorContext),

    #[error("unsupported delivery method {method:?}: {context}")]
    UnsupportedMethod { context: ErrorContext, method: String },

    #[error("invalid {input}: {context}")]
    InvalidAddress { context: ErrorContext, input: String },

    #[error("store failure: {context}: {source}")]
    Store {
        context: ErrorContext,
        #[source]
        source: StoreFailure,
    },

    #[error("store authentication failed: {0}")]
    Auth(ErrorContext),

    #[error("voice API lookup failed: {context}: {source}")]
    Transport {
        context: ErrorContext,
        #[source]
        source: LookupError,
    },
}

impl LiaisonError {
    pub fn store(context: ErrorContext, source: StoreFailure) -> Self {
        Self::Store { context, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingJobName(_) => ErrorKind::MissingJobName,
            Self::CursorNotFound(_) => ErrorKind::CursorNotFound,
            Self::CursorExpired(_) => ErrorKind::CursorExpired,
            Self::CodeNotFound(_) => ErrorKind::CodeNotFound,
            Self::CodeExpired(_) => ErrorKind::CodeExpired,
            Self::UnlinkedAccount(_) => ErrorKind::UnlinkedAccount,
            Self::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
            Self::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            Self::Store { .. } => ErrorKind::Store,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::MissingJobName(context)
            | Self::CursorNotFound(context)
            | Self::CursorExpired(context)
            | Self::CodeNotFound(context)
            | Self::CodeExpired(context)
            | Self::UnlinkedAccount(context)
            | Self::Auth(context) => context,
            Self::UnsupportedMethod { context, .. }
            | Self::InvalidAddress { context, .. }
            | Self::Store { context, .. }
            | Self::Transport { context, .. } => context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_skips_empty_identities() {
        let context = ErrorContext::new("scan", "cursor is expired")
            .account("")
            .voice("voice-1")
            .job("Invoice");

        assert_eq!(context.account_identity, None);
        assert_eq!(context.voice_identity.as_deref(), Some("voice-1"));
        assert_eq!(
            context.to_string(),
            "operation=scan account=- voice=voice-1 job=Invoice code=- log=cursor is expired"
        );
    }

    #[test]
    fn kind_follows_variant() {
        let err = LiaisonError::UnsupportedMethod {
            context: ErrorContext::new("enqueue_delivery", "sms"),
            method: "sms".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
        assert_eq!(err.context().operation, "enqueue_delivery");
    }
}
