use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use crate::core::EngineError;
use crate::models::ErrorResponse;

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::DuplicateEmail { .. } | EngineError::DuplicateRequest { .. } => {
                StatusCode::CONFLICT
            }
            EngineError::NotFound { .. } | EngineError::ReceiverNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidId { .. } | EngineError::Validation { .. } => StatusCode::BAD_REQUEST,
            EngineError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
            field: self.field().map(str::to_string),
        })
    }
}

/// JSON error for malformed request payloads
#[derive(Debug)]
pub struct PayloadError {
    pub error: &'static str,
    pub message: String,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for PayloadError {}

impl ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: self.error.to_string(),
            message: self.message.clone(),
            status_code: 400,
            field: None,
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    PayloadError {
        error: "invalid_json",
        message: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    PayloadError {
        error: "invalid_query",
        message: format!("Invalid query: {}", err),
    }
    .into()
}

/// 400 response for presence-check failures
pub fn validation_failed(errors: &validator::ValidationErrors) -> HttpResponse {
    let field = errors.field_errors().keys().next().map(|k| k.to_string());

    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
        field,
    })
}
