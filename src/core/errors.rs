use crate::services::StoreError;
use thiserror::Error;

/// Failures surfaced by the matching engine
///
/// Messages are safe to show to callers; store internals are logged where
/// the failure is classified and never carried here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("A study partner profile with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("A partner request from {sender_email} to {receiver_id} is already open")]
    DuplicateRequest {
        sender_email: String,
        receiver_id: String,
    },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{field} is not a valid identifier: {value}")]
    InvalidId { field: &'static str, value: String },

    #[error("Receiver profile {0} does not exist")]
    ReceiverNotFound(String),

    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("The data store is temporarily unavailable, try again later")]
    StoreUnavailable,

    #[error("Unexpected data store failure")]
    Internal,
}

impl EngineError {
    /// Stable machine-readable code
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::DuplicateEmail { .. } => "duplicate_email",
            EngineError::DuplicateRequest { .. } => "duplicate_request",
            EngineError::NotFound { .. } => "not_found",
            EngineError::InvalidId { .. } => "invalid_id",
            EngineError::ReceiverNotFound(_) => "receiver_not_found",
            EngineError::Validation { .. } => "validation_failed",
            EngineError::StoreUnavailable => "store_unavailable",
            EngineError::Internal => "internal_error",
        }
    }

    /// Offending request field, where one applies
    pub fn field(&self) -> Option<&'static str> {
        match self {
            EngineError::DuplicateEmail { .. } => Some("email"),
            EngineError::DuplicateRequest { .. } | EngineError::ReceiverNotFound(_) => {
                Some("receiverId")
            }
            EngineError::InvalidId { field, .. } | EngineError::Validation { field } => Some(*field),
            _ => None,
        }
    }

    /// Classify a store failure, logging the driver detail
    pub(crate) fn from_store(operation: &str, err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(detail) => {
                tracing::error!("{} failed, store unavailable: {}", operation, detail);
                EngineError::StoreUnavailable
            }
            other => {
                tracing::error!("{} failed: {}", operation, other);
                EngineError::Internal
            }
        }
    }
}
