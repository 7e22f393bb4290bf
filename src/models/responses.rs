use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response for profile creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileResponse {
    pub message: String,
    #[serde(rename = "partnerId")]
    pub partner_id: Uuid,
}

/// Response for a sent partner request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequestResponse {
    pub message: String,
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
}
