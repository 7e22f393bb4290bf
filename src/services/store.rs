use crate::models::{NewPartnerRequest, NewProfile, PartnerRequest, Profile, ProfileFilter};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Unique constraint on profile emails
pub const PROFILE_EMAIL_UNIQUE: &str = "study_partners_email_key";

/// Partial unique constraint on open (pending/accepted) requests per sender/receiver pair
pub const ACTIVE_REQUEST_UNIQUE: &str = "partner_requests_active_pair_idx";

/// Errors raised by store backends
///
/// Driver details stay inside this type; the engine logs them and hands a
/// sanitized error to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Constraint violated: {constraint}")]
    Conflict { constraint: String },

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn conflict(constraint: &str) -> Self {
        StoreError::Conflict {
            constraint: constraint.to_string(),
        }
    }

    /// True when the error reports a violation of the named constraint
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, StoreError::Conflict { constraint } if constraint == name)
    }
}

/// Persistence for study-partner profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a profile, assigning its identifier.
    ///
    /// Fails with a conflict on [`PROFILE_EMAIL_UNIQUE`] when the email is taken.
    async fn insert(&self, profile: NewProfile) -> Result<Profile, StoreError>;

    /// Profiles matching the filter, fully materialized
    async fn list(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;

    /// Up to `limit` profiles by rating descending, ties in creation order
    async fn top_rated(&self, limit: usize) -> Result<Vec<Profile>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Persistence for partner requests
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// The open (pending or accepted) request for a sender/receiver pair, if any
    async fn find_active(
        &self,
        sender_email: &str,
        receiver_id: Uuid,
    ) -> Result<Option<PartnerRequest>, StoreError>;

    /// Bump the receiver's partner count and insert the request as one unit.
    ///
    /// Returns `Ok(None)` without writing anything when the receiver does not
    /// exist. Fails with a conflict on [`ACTIVE_REQUEST_UNIQUE`] when an open
    /// request for the pair already exists.
    async fn insert_for_receiver(
        &self,
        request: NewPartnerRequest,
    ) -> Result<Option<PartnerRequest>, StoreError>;

    /// Overwrite the message of the open request for a pair
    async fn update_active_message(
        &self,
        sender_email: &str,
        receiver_id: Uuid,
        message: &str,
    ) -> Result<Option<PartnerRequest>, StoreError>;

    /// Remove a request; returns whether a record was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Every request sent by the email, oldest first
    async fn list_by_sender(&self, sender_email: &str) -> Result<Vec<PartnerRequest>, StoreError>;
}
