// Integration tests for the StudyMate HTTP surface

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use studymate::models::{CreateProfileResponse, ErrorResponse, SendRequestResponse};
use studymate::routes::{self, errors, AppState};
use studymate::{MatchingEngine, MemoryStore, PartnerRequest, Profile, RequestStatus};

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    engine: MatchingEngine::from_store(Arc::new(MemoryStore::new()), 3),
                }))
                .app_data(web::JsonConfig::default().error_handler(errors::handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(errors::handle_query_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn profile_body(email: &str, subject: &str, rating: f64, xp_level: f64) -> Value {
    json!({
        "email": email,
        "name": format!("Student {}", email),
        "subject": subject,
        "studyMode": "online",
        "availabilityTime": "evenings",
        "location": "Dhaka",
        "experienceLevel": "intermediate",
        "rating": rating,
        "xpLevel": xp_level,
    })
}

#[actix_web::test]
async fn test_root_and_health() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, web::Bytes::from_static(b"StudyMate server is running"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "healthy");
}

#[actix_web::test]
async fn test_create_profile_and_reject_duplicate_email() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(profile_body("a@x.com", "Math", 4.0, 1.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: CreateProfileResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(profile_body("a@x.com", "History", 1.0, 1.0))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "duplicate_email");
    assert_eq!(error.field.as_deref(), Some("email"));
    assert!(error.message.contains("a@x.com"));

    let req = test::TestRequest::get().uri("/study-partners").to_request();
    let all: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, created.partner_id);
    assert_eq!(all[0].subject, "Math");
}

#[actix_web::test]
async fn test_create_profile_requires_email() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(json!({ "email": "", "subject": "Math" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "invalid_json");
}

#[actix_web::test]
async fn test_list_profiles_filter_and_sort() {
    let app = test_app!();

    for (email, subject, xp) in [
        ("a@x.com", "Mathematics", 3.0),
        ("b@x.com", "Math", 7.0),
        ("c@x.com", "History", 5.0),
    ] {
        let req = test::TestRequest::post()
            .uri("/study-partners")
            .set_json(profile_body(email, subject, 3.0, xp))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/study-partners?subject=math")
        .to_request();
    let math: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(math.len(), 2);
    assert!(math.iter().all(|p| p.subject.to_lowercase().contains("math")));

    let req = test::TestRequest::get()
        .uri("/study-partners?sortXp=desc")
        .to_request();
    let sorted: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    let xp: Vec<f64> = sorted.iter().map(|p| p.xp_level).collect();
    assert_eq!(xp, vec![7.0, 5.0, 3.0]);

    let req = test::TestRequest::get()
        .uri("/study-partners?subject=MATH&sortXp=asc")
        .to_request();
    let both: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    let emails: Vec<&str> = both.iter().map(|p| p.email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com"]);

    let req = test::TestRequest::get()
        .uri("/study-partners?sortXp=sideways")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_profile_by_id() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(profile_body("a@x.com", "Math", 4.0, 1.0))
        .to_request();
    let created: CreateProfileResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/study-partners/find/{}", created.partner_id))
        .to_request();
    let profile: Profile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile.email, "a@x.com");
    assert_eq!(profile.partner_count, 0);

    let req = test::TestRequest::get()
        .uri("/study-partners/find/not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "invalid_id");

    let req = test::TestRequest::get()
        .uri("/study-partners/find/6f1c2a3e-9a57-4c1b-8d2e-0b8f9a1d2c3e")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_check_email() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(profile_body("a@x.com", "Math", 4.0, 1.0))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/study-partners/check/a@x.com")
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["email"], "a@x.com");

    let req = test::TestRequest::get()
        .uri("/study-partners/check/nobody@x.com")
        .to_request();
    let missing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(missing, json!(false));
}

#[actix_web::test]
async fn test_top_profiles() {
    let app = test_app!();

    for (i, rating) in [5.0, 3.0, 4.0, 1.0, 5.0].iter().enumerate() {
        let req = test::TestRequest::post()
            .uri("/study-partners")
            .set_json(profile_body(&format!("{}@x.com", i), "Math", *rating, 1.0))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/study-partners/top").to_request();
    let top: Vec<Profile> = test::call_and_read_body_json(&app, req).await;
    let ratings: Vec<f64> = top.iter().map(|p| p.rating).collect();
    assert_eq!(ratings, vec![5.0, 5.0, 4.0]);
}

#[actix_web::test]
async fn test_partner_request_lifecycle() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(profile_body("a@x.com", "Math", 4.0, 1.0))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/study-partners")
        .set_json(profile_body("b@x.com", "Math", 2.0, 1.0))
        .to_request();
    let b: CreateProfileResponse = test::call_and_read_body_json(&app, req).await;

    // Send
    let req = test::TestRequest::post()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "c@x.com", "receiverId": b.partner_id, "message": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sent: SendRequestResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/study-partners/find/{}", b.partner_id))
        .to_request();
    let receiver: Profile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(receiver.partner_count, 1);

    // Duplicate while pending
    let req = test::TestRequest::post()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "c@x.com", "receiverId": b.partner_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "duplicate_request");

    // Update message
    let req = test::TestRequest::patch()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "c@x.com", "receiverId": b.partner_id, "message": "library at 6?" }))
        .to_request();
    let updated: PartnerRequest = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.id, sent.request_id);
    assert_eq!(updated.message.as_deref(), Some("library at 6?"));
    assert_eq!(updated.status, RequestStatus::Pending);

    // Listing
    let req = test::TestRequest::get()
        .uri("/partner-requests/sent/c@x.com")
        .to_request();
    let requests: Vec<PartnerRequest> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].receiver_id, b.partner_id);

    // Delete twice
    for _ in 0..2 {
        let req = test::TestRequest::delete()
            .uri(&format!("/partner-requests/{}", sent.request_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/partner-requests/sent/c@x.com")
        .to_request();
    let requests: Vec<PartnerRequest> = test::call_and_read_body_json(&app, req).await;
    assert!(requests.is_empty());

    // Counter is not decremented by delete
    let req = test::TestRequest::get()
        .uri(&format!("/study-partners/find/{}", b.partner_id))
        .to_request();
    let receiver: Profile = test::call_and_read_body_json(&app, req).await;
    assert_eq!(receiver.partner_count, 1);
}

#[actix_web::test]
async fn test_partner_request_failures() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "c@x.com", "receiverId": "6f1c2a3e-9a57-4c1b-8d2e-0b8f9a1d2c3e" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(error.error, "receiver_not_found");

    let req = test::TestRequest::post()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "c@x.com", "receiverId": "nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "", "receiverId": "6f1c2a3e-9a57-4c1b-8d2e-0b8f9a1d2c3e" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri("/partner-requests")
        .set_json(json!({ "senderEmail": "c@x.com", "receiverId": "6f1c2a3e-9a57-4c1b-8d2e-0b8f9a1d2c3e", "message": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/partner-requests/not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/partner-requests/sent/nobody@x.com")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let requests: Vec<PartnerRequest> = test::read_body_json(resp).await;
    assert!(requests.is_empty());
}
