//! Errors returned by the event-desk operations

use thiserror::Error;

/// Every failure is terminal for the action that triggered it: nothing is retried, and nothing is mutated.
#[derive(Debug, Error)]
pub enum DeskError {
    /// A required field is missing, or the requested action is not allowed in the current state.
    /// The message is meant to be shown inline to the user.
    #[error("{0}")]
    Validation(String),

    /// The persistence service failed. `message` is the backend-provided message, kept verbatim.
    #[error("{message}")]
    Remote { message: String },

    /// There is no record with this id
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl DeskError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::Remote { message: message.into() }
    }

    pub fn not_found<S: ToString>(kind: &'static str, id: S) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote{ .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound{ .. })
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote { message: err.to_string() }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Remote { message: format!("Unable to decode the service reply: {}", err) }
    }
}
