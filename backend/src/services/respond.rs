//! Speech text returned to the voice platform.
//!
//! [`classify`] is the single place where a failed command turns into user-facing
//! text. It logs the error with its full context and looks at nothing but the
//! error kind when choosing the message.

use crate::errors::LiaisonError;
use common::requests::ErrorKind;
use common::voice::{SessionAttributes, VoiceResponse};
use log::{error, info};

pub fn welcome(attributes: SessionAttributes) -> VoiceResponse {
    VoiceResponse::plain_text("Welcome!", false, attributes)
}

pub fn positively(action: &str, attributes: SessionAttributes) -> VoiceResponse {
    if action.is_empty() {
        return VoiceResponse::plain_text("Okay", false, attributes);
    }
    VoiceResponse::plain_text(format!("Okay, I'll {action} for you."), false, attributes)
}

/// Speech response for a failed command.
pub fn failure(err: &LiaisonError, attributes: SessionAttributes) -> VoiceResponse {
    VoiceResponse::plain_text(classify(err).1, false, attributes)
}

/// Logs `err` and returns its kind with the message to speak.
pub fn classify(err: &LiaisonError) -> (ErrorKind, &'static str) {
    let kind = err.kind();
    match kind {
        ErrorKind::Store | ErrorKind::Auth | ErrorKind::Transport => error!("[{kind:?}] {err}"),
        _ => info!("[{kind:?}] {err}"),
    }
    (kind, message_for(kind))
}

pub fn message_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::CursorExpired => {
            "It's been a while since your last scan, and you'll need to specify a job first. \
             You can create a new job, or use a previous job by telling me to scan a page to that job. \
             Just tell me which you'd like to do."
        }
        ErrorKind::CursorNotFound => {
            "You'll need to specify a job first. You can create a new job, or tell me to scan a page \
             to an existing job. Just tell me which you'd like to do."
        }
        ErrorKind::MissingJobName => {
            "You'll need to specify a job first. You can create a new job, or tell me to scan a page \
             to a job. Just tell me which you'd like to do."
        }
        ErrorKind::CodeNotFound => {
            "Unfortunately I was not able to find a match to the code you specified. Please speak the \
             prompt given on your screen again, or click cancel, and retry the sync process."
        }
        ErrorKind::CodeExpired => {
            "While I was able to find a matching code to the one you spoke, it has unfortunately \
             expired. Please click cancel, and retry the sync process while making sure to speak the \
             code given within a few minutes."
        }
        ErrorKind::UnlinkedAccount => {
            "You have not yet synced your device to your account. Please open the dashboard in your \
             browser, and start the sync process by clicking on the user icon on the screen."
        }
        ErrorKind::UnsupportedMethod => {
            "Unfortunately, I can't deliver your job in the method you've selected yet. \
             Try asking me to email the job instead."
        }
        ErrorKind::InvalidAddress => {
            "The email you've chosen for delivery isn't valid. Try again with a valid email address."
        }
        ErrorKind::Store | ErrorKind::Auth | ErrorKind::Transport => {
            "There was a problem attempting your request; please try again later."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorContext;

    #[test]
    fn positive_response_names_the_action() {
        let response = positively("scan a page", SessionAttributes::default());
        assert_eq!(response.text(), "Okay, I'll scan a page for you.");
        assert!(!response.response.should_end_session);
        assert_eq!(positively("", SessionAttributes::default()).text(), "Okay");
    }

    #[test]
    fn job_name_problems_ask_for_a_job() {
        for kind in [ErrorKind::MissingJobName, ErrorKind::CursorNotFound, ErrorKind::CursorExpired] {
            assert!(message_for(kind).contains("specify a job"));
        }
    }

    #[test]
    fn system_failures_share_a_generic_message() {
        let err = LiaisonError::Auth(ErrorContext::new("open_store", "bad key"));
        let (kind, message) = classify(&err);
        assert_eq!(kind, ErrorKind::Auth);
        assert_eq!(message, message_for(ErrorKind::Store));
        assert!(message.contains("try again later"));
    }
}
