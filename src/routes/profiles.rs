use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::EngineError;
use crate::models::{CreateProfileRequest, CreateProfileResponse, ListProfilesQuery, ProfileFilter};
use crate::routes::{errors::validation_failed, AppState};

/// Configure study-partner profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/study-partners")
            .route("", web::post().to(create_profile))
            .route("", web::get().to(list_profiles))
            .route("/top", web::get().to(top_profiles))
            .route("/find/{id}", web::get().to(get_profile))
            .route("/check/{email}", web::get().to(check_email)),
    );
}

/// Create profile endpoint
///
/// POST /study-partners
///
/// Request body:
/// ```json
/// {
///   "email": "string",
///   "name": "string",
///   "subject": "string",
///   "studyMode": "string",
///   "availabilityTime": "string",
///   "location": "string",
///   "experienceLevel": "string",
///   "rating": 4.5,
///   "xpLevel": 10
/// }
/// ```
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, EngineError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_profile request: {:?}", errors);
        return Ok(validation_failed(&errors));
    }

    let partner_id = state.engine.create_profile(req.into_inner().into()).await?;

    Ok(HttpResponse::Created().json(CreateProfileResponse {
        message: "Study partner profile created successfully".to_string(),
        partner_id,
    }))
}

/// List profiles endpoint
///
/// GET /study-partners?subject={pattern}&sortXp={asc|desc}
async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<ListProfilesQuery>,
) -> Result<HttpResponse, EngineError> {
    let filter = ProfileFilter::from(query.into_inner());
    let profiles = state.engine.list_profiles(&filter).await?;

    Ok(HttpResponse::Ok().json(profiles))
}

/// Highest rated profiles
///
/// GET /study-partners/top
async fn top_profiles(state: web::Data<AppState>) -> Result<HttpResponse, EngineError> {
    let profiles = state.engine.top_profiles(None).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

/// GET /study-partners/find/{id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let profile = state.engine.get_profile(&path).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Email existence check
///
/// GET /study-partners/check/{email}
///
/// Responds with the profile when the email is registered, `false` otherwise.
async fn check_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, EngineError> {
    let found = state.engine.check_email_exists(&path).await?;

    Ok(match found {
        Some(profile) => HttpResponse::Ok().json(profile),
        None => HttpResponse::Ok().json(false),
    })
}
