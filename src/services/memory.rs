use crate::core::{filters::apply_filter, ranking::top_by_rating};
use crate::models::{NewPartnerRequest, NewProfile, PartnerRequest, Profile, ProfileFilter};
use crate::services::store::{
    ProfileStore, RequestStore, StoreError, ACTIVE_REQUEST_UNIQUE, PROFILE_EMAIL_UNIQUE,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Collections {
    // Both kept in insertion order
    profiles: Vec<Profile>,
    requests: Vec<PartnerRequest>,
}

/// In-process store backing both profiles and requests
///
/// Every operation runs under a single lock scope, so the uniqueness checks
/// and the combined receiver update are atomic with respect to each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests
    pub fn request_count(&self) -> usize {
        self.inner.read().requests.len()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn insert(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let mut inner = self.inner.write();

        if inner.profiles.iter().any(|p| p.email == profile.email) {
            return Err(StoreError::conflict(PROFILE_EMAIL_UNIQUE));
        }

        let profile = profile.into_profile(Uuid::new_v4(), Utc::now());
        inner.profiles.push(profile.clone());

        Ok(profile)
    }

    async fn list(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.read();
        Ok(apply_filter(&inner.profiles, filter))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.profiles.iter().find(|p| p.email == email).cloned())
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.read();
        Ok(top_by_rating(&inner.profiles, limit))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn find_active(
        &self,
        sender_email: &str,
        receiver_id: Uuid,
    ) -> Result<Option<PartnerRequest>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .requests
            .iter()
            .find(|r| {
                r.sender_email == sender_email && r.receiver_id == receiver_id && r.status.is_active()
            })
            .cloned())
    }

    async fn insert_for_receiver(
        &self,
        request: NewPartnerRequest,
    ) -> Result<Option<PartnerRequest>, StoreError> {
        let mut inner = self.inner.write();
        let Collections { profiles, requests } = &mut *inner;

        let Some(receiver) = profiles.iter_mut().find(|p| p.id == request.receiver_id) else {
            return Ok(None);
        };

        let open = requests.iter().any(|r| {
            r.sender_email == request.sender_email
                && r.receiver_id == request.receiver_id
                && r.status.is_active()
        });
        if open {
            return Err(StoreError::conflict(ACTIVE_REQUEST_UNIQUE));
        }

        receiver.partner_count += 1;
        let request = request.into_request(Uuid::new_v4(), Utc::now());
        requests.push(request.clone());

        Ok(Some(request))
    }

    async fn update_active_message(
        &self,
        sender_email: &str,
        receiver_id: Uuid,
        message: &str,
    ) -> Result<Option<PartnerRequest>, StoreError> {
        let mut inner = self.inner.write();

        let updated = inner
            .requests
            .iter_mut()
            .find(|r| {
                r.sender_email == sender_email && r.receiver_id == receiver_id && r.status.is_active()
            })
            .map(|r| {
                r.message = Some(message.to_string());
                r.clone()
            });

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let before = inner.requests.len();
        inner.requests.retain(|r| r.id != id);
        Ok(inner.requests.len() < before)
    }

    async fn list_by_sender(&self, sender_email: &str) -> Result<Vec<PartnerRequest>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .requests
            .iter()
            .filter(|r| r.sender_email == sender_email)
            .cloned()
            .collect())
    }
}
