use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::EngineError;
use crate::models::{MessageResponse, SendPartnerRequestBody, SendRequestResponse, UpdateRequestMessageBody};
use crate::routes::{errors::validation_failed, AppState};

/// Configure partner request routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/partner-requests")
            .route("", web::post().to(send_request))
            .route("", web::patch().to(update_message))
            .route("/sent/{sender_email}", web::get().to(list_sent))
            .route("/{request_id}", web::delete().to(delete_request)),
    );
}

/// Send partner request endpoint
///
/// POST /partner-requests
///
/// Request body:
/// ```json
/// {
///   "senderEmail": "string",
///   "receiverId": "string",
///   "message": "string"
/// }
/// ```
async fn send_request(
    state: web::Data<AppState>,
    req: web::Json<SendPartnerRequestBody>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for send_request: {:?}", errors);
        return Ok(validation_failed(&errors));
    }

    let body = req.into_inner();
    let request_id = state
        .engine
        .send_partner_request(&body.sender_email, &body.receiver_id, body.message)
        .await?;

    Ok(HttpResponse::Created().json(SendRequestResponse {
        message: "Partner request sent successfully".to_string(),
        request_id,
    }))
}

/// Update request message endpoint
///
/// PATCH /partner-requests
async fn update_message(
    state: web::Data<AppState>,
    req: web::Json<UpdateRequestMessageBody>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(&errors));
    }

    let updated = state
        .engine
        .update_partner_request_message(&req.sender_email, &req.receiver_id, &req.message)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /partner-requests/{request_id}
async fn delete_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    state.engine.delete_partner_request(&path).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Partner request deleted".to_string(),
    }))
}

/// Requests sent by an email
///
/// GET /partner-requests/sent/{sender_email}
///
/// An unknown sender yields an empty array.
async fn list_sent(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let requests = state.engine.list_sent_requests(&path).await?;
    Ok(HttpResponse::Ok().json(requests))
}
