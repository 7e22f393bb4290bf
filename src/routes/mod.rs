// Route exports
pub mod errors;
pub mod partner_requests;
pub mod profiles;

use actix_web::{web, HttpResponse, Responder};
use crate::core::MatchingEngine;
use crate::models::HealthResponse;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: MatchingEngine,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health_check))
        .configure(profiles::configure)
        .configure(partner_requests::configure);
}

async fn root() -> impl Responder {
    HttpResponse::Ok().body("StudyMate server is running")
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.engine.is_healthy().await { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
