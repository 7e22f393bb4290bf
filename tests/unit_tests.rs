// Engine and core tests for StudyMate

use std::sync::Arc;
use studymate::core::{apply_filter, escape_like, top_by_rating};
use studymate::{
    EngineError, MatchingEngine, MemoryStore, NewProfile, ProfileFilter, RequestStatus, SortOrder,
};
use uuid::Uuid;

fn new_profile(email: &str, subject: &str, rating: f64, xp_level: f64) -> NewProfile {
    NewProfile {
        email: email.to_string(),
        subject: subject.to_string(),
        rating,
        xp_level,
        ..Default::default()
    }
}

fn engine() -> MatchingEngine {
    MatchingEngine::from_store(Arc::new(MemoryStore::new()), 3)
}

#[test]
fn test_filter_subject_pattern_case_insensitive() {
    let profiles: Vec<_> = ["Mathematics", "Math", "History"]
        .iter()
        .enumerate()
        .map(|(i, s)| {
            new_profile(&format!("{}@x.com", i), s, 1.0, 1.0)
                .into_profile(Uuid::new_v4(), chrono::Utc::now())
        })
        .collect();

    let result = apply_filter(&profiles, &ProfileFilter::default().subject("MATH"));
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|p| p.subject != "History"));
}

#[test]
fn test_top_by_rating_handles_fewer_profiles() {
    let profiles = vec![
        new_profile("a@x.com", "Math", 2.0, 1.0).into_profile(Uuid::new_v4(), chrono::Utc::now()),
        new_profile("b@x.com", "Math", 4.0, 1.0).into_profile(Uuid::new_v4(), chrono::Utc::now()),
    ];

    let top = top_by_rating(&profiles, 3);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].email, "b@x.com");
}

#[test]
fn test_escape_like_keeps_plain_text() {
    assert_eq!(escape_like("Organic Chemistry"), "Organic Chemistry");
    assert_eq!(escape_like("C_"), "C\\_");
}

#[tokio::test]
async fn test_scenario_request_bumps_receiver() {
    let engine = engine();
    let a = engine.create_profile(new_profile("a@x.com", "Math", 4.0, 1.0)).await.unwrap();
    let b = engine.create_profile(new_profile("b@x.com", "Math", 2.0, 1.0)).await.unwrap();

    engine
        .send_partner_request("c@x.com", &b.to_string(), None)
        .await
        .unwrap();

    assert_eq!(engine.get_profile(&b.to_string()).await.unwrap().partner_count, 1);
    assert_eq!(engine.get_profile(&a.to_string()).await.unwrap().partner_count, 0);

    let requests = engine.list_sent_requests("c@x.com").await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].status, RequestStatus::Pending);
    assert_eq!(requests[0].receiver_id, b);
}

#[tokio::test]
async fn test_same_sender_can_request_different_receivers() {
    let engine = engine();
    let a = engine.create_profile(new_profile("a@x.com", "Math", 4.0, 1.0)).await.unwrap();
    let b = engine.create_profile(new_profile("b@x.com", "Math", 2.0, 1.0)).await.unwrap();

    engine.send_partner_request("c@x.com", &a.to_string(), None).await.unwrap();
    engine.send_partner_request("c@x.com", &b.to_string(), None).await.unwrap();
    engine.send_partner_request("d@x.com", &b.to_string(), None).await.unwrap();

    assert_eq!(engine.list_sent_requests("c@x.com").await.unwrap().len(), 2);
    assert_eq!(engine.get_profile(&b.to_string()).await.unwrap().partner_count, 2);
}

#[tokio::test]
async fn test_concurrent_duplicate_requests_admit_one() {
    let engine = engine();
    let b = engine.create_profile(new_profile("b@x.com", "Math", 2.0, 1.0)).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = engine.clone();
            let receiver = b.to_string();
            tokio::spawn(async move {
                engine.send_partner_request("c@x.com", &receiver, None).await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(EngineError::DuplicateRequest { .. }) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(engine.get_profile(&b.to_string()).await.unwrap().partner_count, 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_emails_admit_one() {
    let engine = engine();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .create_profile(new_profile("a@x.com", "Math", 1.0, i as f64))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(EngineError::DuplicateEmail { email }) => assert_eq!(email, "a@x.com"),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(engine.list_profiles(&ProfileFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_profiles_sorted_by_xp() {
    let engine = engine();
    engine.create_profile(new_profile("a@x.com", "Math", 1.0, 10.0)).await.unwrap();
    engine.create_profile(new_profile("b@x.com", "Math", 1.0, 30.0)).await.unwrap();
    engine.create_profile(new_profile("c@x.com", "Math", 1.0, 20.0)).await.unwrap();

    let desc = engine
        .list_profiles(&ProfileFilter::default().sort_by_xp(SortOrder::Desc))
        .await
        .unwrap();
    let emails: Vec<&str> = desc.iter().map(|p| p.email.as_str()).collect();
    assert_eq!(emails, vec!["b@x.com", "c@x.com", "a@x.com"]);
}

#[tokio::test]
async fn test_delete_unknown_request_succeeds() {
    let engine = engine();
    assert!(engine.delete_partner_request(&Uuid::new_v4().to_string()).await.is_ok());

    let err = engine.delete_partner_request("42").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidId { field: "requestId", .. }));
}
