use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{NewProfile, ProfileFilter, SortOrder};

/// Request to publish a study-partner profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "profileimage", rename = "profileImage", default)]
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
}

impl From<CreateProfileRequest> for NewProfile {
    fn from(req: CreateProfileRequest) -> Self {
        NewProfile {
            email: req.email,
            name: req.name,
            profile_image: req.profile_image,
            subject: req.subject,
            study_mode: req.study_mode,
            availability_time: req.availability_time,
            location: req.location,
            experience_level: req.experience_level,
            rating: req.rating,
            xp_level: req.xp_level,
        }
    }
}

/// Query parameters for profile listing
///
/// GET /study-partners?subject=math&sortXp=desc
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProfilesQuery {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(rename = "sortXp", default)]
    pub sort_xp: Option<SortOrder>,
}

impl From<ListProfilesQuery> for ProfileFilter {
    fn from(query: ListProfilesQuery) -> Self {
        ProfileFilter {
            subject_pattern: query.subject,
            sort_by_xp_level: query.sort_xp,
        }
    }
}

/// Request to send a partner request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendPartnerRequestBody {
    #[validate(length(min = 1))]
    #[serde(alias = "sender_email", rename = "senderEmail")]
    pub sender_email: String,
    #[validate(length(min = 1))]
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request to overwrite the message of an open partner request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRequestMessageBody {
    #[validate(length(min = 1))]
    #[serde(alias = "sender_email", rename = "senderEmail")]
    pub sender_email: String,
    #[validate(length(min = 1))]
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: String,
    pub message: String,
}
