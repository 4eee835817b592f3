//! Delivery error types and their user-facing categories.

use crate::messages::Message;

/// Errors that can occur while validating or sending an email.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Mail credentials not configured")]
    MissingCredentials,

    #[error("Invalid recipient email address: {0}")]
    InvalidEmail(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Mail relay rejected credentials (status {status})")]
    Authentication { status: u16 },

    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Mail relay rejected payload (status {status}): {body}")]
    PayloadRejected { status: u16, body: String },

    #[error("Mail relay error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coarse failure class, each with its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    Authentication,
    Connectivity,
    Payload,
    Configuration,
    Validation,
    Other,
}

impl DeliveryError {
    pub fn category(&self) -> DeliveryFailure {
        match self {
            DeliveryError::MissingCredentials => DeliveryFailure::Configuration,
            DeliveryError::InvalidEmail(_) | DeliveryError::MissingField(_) => {
                DeliveryFailure::Validation
            }
            DeliveryError::InvalidPayload(_) | DeliveryError::PayloadRejected { .. } => {
                DeliveryFailure::Payload
            }
            DeliveryError::Authentication { .. } => DeliveryFailure::Authentication,
            DeliveryError::Connectivity(_) => DeliveryFailure::Connectivity,
            DeliveryError::Http(e) if e.is_connect() || e.is_timeout() => {
                DeliveryFailure::Connectivity
            }
            DeliveryError::Api { .. } | DeliveryError::Http(_) => DeliveryFailure::Other,
        }
    }

    /// The message shown to the user for this error.
    pub fn user_message(&self) -> Message {
        match self {
            DeliveryError::InvalidEmail(_) => Message::InvalidEmail,
            DeliveryError::MissingField("text" | "png") => Message::NothingToSend,
            DeliveryError::MissingField(_) => Message::MissingFields,
            _ => match self.category() {
                DeliveryFailure::Authentication => Message::DeliveryAuthFailed,
                DeliveryFailure::Connectivity => Message::DeliveryConnectivity,
                DeliveryFailure::Payload => Message::DeliveryPayload,
                DeliveryFailure::Configuration => Message::DeliveryConfig,
                DeliveryFailure::Validation | DeliveryFailure::Other => Message::DeliveryGeneric,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            DeliveryError::Authentication { status: 401 }.category(),
            DeliveryFailure::Authentication
        );
        assert_eq!(
            DeliveryError::Connectivity("refused".into()).category(),
            DeliveryFailure::Connectivity
        );
        assert_eq!(
            DeliveryError::InvalidPayload("no comma".into()).category(),
            DeliveryFailure::Payload
        );
        assert_eq!(
            DeliveryError::Api {
                status: 500,
                body: String::new()
            }
            .category(),
            DeliveryFailure::Other
        );
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            DeliveryError::MissingCredentials.user_message(),
            Message::DeliveryConfig
        );
        assert_eq!(
            DeliveryError::InvalidEmail("x".into()).user_message(),
            Message::InvalidEmail
        );
        assert_eq!(
            DeliveryError::MissingField("display name").user_message(),
            Message::MissingFields
        );
        assert_eq!(
            DeliveryError::MissingField("png").user_message(),
            Message::NothingToSend
        );
        assert_eq!(
            DeliveryError::Api {
                status: 502,
                body: "bad gateway".into()
            }
            .user_message(),
            Message::DeliveryGeneric
        );
    }
}
