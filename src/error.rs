//! Error types for the onboarding dashboard.

use serde::{Deserialize, Serialize};

use crate::dashboard::state::ActionKind;

/// Structured error payload a backend may attach to a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
    /// Backend-specific error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Failure of one of the remote onboarding operations.
///
/// `Clone` because feed emissions carry it across a broadcast channel.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Backend rejected the request: {}", body.message)]
    Api { body: ErrorBody },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl ServiceError {
    /// Message to surface in a notification: the structured `body.message`
    /// when present, otherwise the stringified error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { body } => body.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Failure of a user-triggered action.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Another action is already in progress: {kind}")]
    AlreadyPending { kind: ActionKind },
}

impl ActionError {
    /// Message to surface in a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Top-level error type for the dashboard.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The subscribed data source emitted a failure instead of data.
    #[error("Data load failed: {0}")]
    DataLoad(ServiceError),

    /// A user-triggered action failed.
    #[error("Action failed: {0}")]
    Action(#[from] ActionError),
}

/// Result type alias for the dashboard.
pub type Result<T> = std::result::Result<T, Error>;
