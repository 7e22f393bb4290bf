use crate::core::errors::EngineError;
use crate::models::{NewPartnerRequest, NewProfile, PartnerRequest, Profile, ProfileFilter};
use crate::services::store::{ProfileStore, RequestStore, ACTIVE_REQUEST_UNIQUE, PROFILE_EMAIL_UNIQUE};
use std::sync::Arc;
use uuid::Uuid;

/// Partner-matching workflow engine
///
/// Owns the rules for profile uniqueness, the partner request lifecycle,
/// duplicate suppression and popularity ranking. All state lives behind the
/// injected store handles; cloning the engine shares them.
#[derive(Clone)]
pub struct MatchingEngine {
    profiles: Arc<dyn ProfileStore>,
    requests: Arc<dyn RequestStore>,
    top_limit: usize,
}

impl MatchingEngine {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        requests: Arc<dyn RequestStore>,
        top_limit: usize,
    ) -> Self {
        Self {
            profiles,
            requests,
            top_limit,
        }
    }

    /// Build an engine on a backend that serves both profiles and requests
    pub fn from_store<S>(store: Arc<S>, top_limit: usize) -> Self
    where
        S: ProfileStore + RequestStore + 'static,
    {
        Self::new(store.clone(), store, top_limit)
    }

    /// Publish a new profile and return its identifier
    pub async fn create_profile(&self, profile: NewProfile) -> Result<Uuid, EngineError> {
        require("email", &profile.email)?;

        let existing = self
            .profiles
            .find_by_email(&profile.email)
            .await
            .map_err(|e| EngineError::from_store("create_profile", e))?;

        if existing.is_some() {
            tracing::info!("Rejected profile with duplicate email {}", profile.email);
            return Err(EngineError::DuplicateEmail { email: profile.email });
        }

        let email = profile.email.clone();
        match self.profiles.insert(profile).await {
            Ok(created) => {
                tracing::info!("Created profile {} for {}", created.id, created.email);
                Ok(created.id)
            }
            // Lost a race with a concurrent submission of the same email
            Err(e) if e.is_conflict_on(PROFILE_EMAIL_UNIQUE) => {
                Err(EngineError::DuplicateEmail { email })
            }
            Err(e) => Err(EngineError::from_store("create_profile", e)),
        }
    }

    /// Profiles matching the filter, fully materialized
    pub async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, EngineError> {
        let profiles = self
            .profiles
            .list(filter)
            .await
            .map_err(|e| EngineError::from_store("list_profiles", e))?;

        tracing::debug!("Listing {} profiles for {:?}", profiles.len(), filter);

        Ok(profiles)
    }

    /// Look a profile up by its identifier
    pub async fn get_profile(&self, id: &str) -> Result<Profile, EngineError> {
        let id = parse_id("id", id)?;

        self.profiles
            .find_by_id(id)
            .await
            .map_err(|e| EngineError::from_store("get_profile", e))?
            .ok_or(EngineError::NotFound { entity: "Study partner profile" })
    }

    /// The profile registered under `email`, if any
    pub async fn check_email_exists(&self, email: &str) -> Result<Option<Profile>, EngineError> {
        self.profiles
            .find_by_email(email)
            .await
            .map_err(|e| EngineError::from_store("check_email_exists", e))
    }

    /// Highest rated profiles; `n` defaults to the configured limit
    pub async fn top_profiles(&self, n: Option<usize>) -> Result<Vec<Profile>, EngineError> {
        let limit = n.unwrap_or(self.top_limit);
        if limit == 0 {
            return Ok(Vec::new());
        }

        self.profiles
            .top_rated(limit)
            .await
            .map_err(|e| EngineError::from_store("top_profiles", e))
    }

    /// Send a partner request and return its identifier
    ///
    /// Rejects a second open request for the same pair and requests to
    /// receivers that do not exist. The receiver's partner count and the new
    /// request are written together or not at all.
    pub async fn send_partner_request(
        &self,
        sender_email: &str,
        receiver_id: &str,
        message: Option<String>,
    ) -> Result<Uuid, EngineError> {
        require("senderEmail", sender_email)?;
        require("receiverId", receiver_id)?;
        let receiver = parse_id("receiverId", receiver_id)?;

        let duplicate = || EngineError::DuplicateRequest {
            sender_email: sender_email.to_string(),
            receiver_id: receiver.to_string(),
        };

        let open = self
            .requests
            .find_active(sender_email, receiver)
            .await
            .map_err(|e| EngineError::from_store("send_partner_request", e))?;
        if open.is_some() {
            tracing::info!("Duplicate partner request {} -> {}", sender_email, receiver);
            return Err(duplicate());
        }

        let exists = self
            .profiles
            .find_by_id(receiver)
            .await
            .map_err(|e| EngineError::from_store("send_partner_request", e))?
            .is_some();
        if !exists {
            return Err(EngineError::ReceiverNotFound(receiver.to_string()));
        }

        let new_request = NewPartnerRequest {
            sender_email: sender_email.to_string(),
            receiver_id: receiver,
            message,
        };

        match self.requests.insert_for_receiver(new_request).await {
            Ok(Some(request)) => {
                tracing::info!(
                    "Partner request {} sent: {} -> {}",
                    request.id,
                    request.sender_email,
                    request.receiver_id
                );
                Ok(request.id)
            }
            Ok(None) => Err(EngineError::ReceiverNotFound(receiver.to_string())),
            Err(e) if e.is_conflict_on(ACTIVE_REQUEST_UNIQUE) => Err(duplicate()),
            Err(e) => Err(EngineError::from_store("send_partner_request", e)),
        }
    }

    /// Overwrite the message of the open request between sender and receiver
    ///
    /// Only pending or accepted requests match; rejected ones are left alone.
    pub async fn update_partner_request_message(
        &self,
        sender_email: &str,
        receiver_id: &str,
        message: &str,
    ) -> Result<PartnerRequest, EngineError> {
        require("senderEmail", sender_email)?;
        require("receiverId", receiver_id)?;
        let receiver = parse_id("receiverId", receiver_id)?;

        let updated = self
            .requests
            .update_active_message(sender_email, receiver, message)
            .await
            .map_err(|e| EngineError::from_store("update_partner_request_message", e))?
            .ok_or(EngineError::NotFound { entity: "Partner request" })?;

        tracing::debug!("Updated message on partner request {}", updated.id);

        Ok(updated)
    }

    /// Delete a request by identifier; missing requests are not an error
    pub async fn delete_partner_request(&self, request_id: &str) -> Result<(), EngineError> {
        let id = parse_id("requestId", request_id)?;

        let removed = self
            .requests
            .delete(id)
            .await
            .map_err(|e| EngineError::from_store("delete_partner_request", e))?;

        tracing::debug!("Delete partner request {} (removed: {})", id, removed);

        Ok(())
    }

    /// Every request sent by `sender_email`, oldest first; empty when none exist
    pub async fn list_sent_requests(
        &self,
        sender_email: &str,
    ) -> Result<Vec<PartnerRequest>, EngineError> {
        self.requests
            .list_by_sender(sender_email)
            .await
            .map_err(|e| EngineError::from_store("list_sent_requests", e))
    }

    /// Whether the backing store answers
    pub async fn is_healthy(&self) -> bool {
        match self.profiles.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation { field });
    }
    Ok(())
}

fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, EngineError> {
    Uuid::parse_str(raw.trim()).map_err(|_| EngineError::InvalidId {
        field,
        value: raw.to_string(),
    })
}
