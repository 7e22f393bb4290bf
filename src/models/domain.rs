use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Study-partner profile as persisted by the profile store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "profileImage", default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "studyMode", default)]
    pub study_mode: String,
    #[serde(rename = "availabilityTime", default)]
    pub availability_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "experienceLevel", default)]
    pub experience_level: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "xpLevel", default)]
    pub xp_level: f64,
    #[serde(rename = "partnerCount", default)]
    pub partner_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Profile fields supplied on submission; the store assigns id and timestamps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProfile {
    pub email: String,
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub subject: String,
    pub study_mode: String,
    pub availability_time: String,
    pub location: String,
    pub experience_level: String,
    pub rating: f64,
    pub xp_level: f64,
}

impl NewProfile {
    /// Materialize a stored profile with a fresh identifier and zero partners
    pub fn into_profile(self, id: Uuid, created_at: DateTime<Utc>) -> Profile {
        Profile {
            id,
            email: self.email,
            name: self.name,
            profile_image: self.profile_image,
            subject: self.subject,
            study_mode: self.study_mode,
            availability_time: self.availability_time,
            location: self.location,
            experience_level: self.experience_level,
            rating: self.rating,
            xp_level: self.xp_level,
            partner_count: 0,
            created_at,
        }
    }
}

/// Sort direction for the xp level listing option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Listing options recognized by `ListProfiles`
///
/// An empty filter returns every profile in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    /// Case-insensitive substring matched against `subject`
    pub subject_pattern: Option<String>,
    pub sort_by_xp_level: Option<SortOrder>,
}

impl ProfileFilter {
    pub fn subject(mut self, pattern: impl Into<String>) -> Self {
        self.subject_pattern = Some(pattern.into());
        self
    }

    pub fn sort_by_xp(mut self, order: SortOrder) -> Self {
        self.sort_by_xp_level = Some(order);
        self
    }

    /// The subject pattern, ignoring blank values
    pub fn effective_subject(&self) -> Option<&str> {
        self.subject_pattern
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Lifecycle state of a partner request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Pending and accepted requests block a second request for the same pair
    pub fn is_active(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Accepted)
    }
}

/// Partner request from a sender (by email) to a receiver profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerRequest {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "senderEmail")]
    pub sender_email: String,
    #[serde(rename = "receiverId")]
    pub receiver_id: Uuid,
    #[serde(default)]
    pub message: Option<String>,
    pub status: RequestStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Request fields supplied by the sender
#[derive(Debug, Clone, PartialEq)]
pub struct NewPartnerRequest {
    pub sender_email: String,
    pub receiver_id: Uuid,
    pub message: Option<String>,
}

impl NewPartnerRequest {
    /// Every new request starts out pending
    pub fn into_request(self, id: Uuid, created_at: DateTime<Utc>) -> PartnerRequest {
        PartnerRequest {
            id,
            sender_email: self.sender_email,
            receiver_id: self.receiver_id,
            message: self.message,
            status: RequestStatus::Pending,
            created_at,
        }
    }
}
