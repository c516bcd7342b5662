//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deals_client::models::{Profile, VerificationStatus};
use deals_client::session::InMemorySessionBackend;
use deals_client::{ApiClient, DealsApp, Session, SessionStore};

pub const TOKEN: &str = "test-token";

pub fn api_for(server: &MockServer) -> ApiClient {
    let url = Url::parse(&server.uri()).unwrap();
    ApiClient::new(&url, None).unwrap()
}

pub fn signed_in_session(status: VerificationStatus) -> Session {
    Session::new(
        TOKEN,
        Some(Profile {
            id: Some("u1".to_string()),
            email: "user@example.com".to_string(),
            verification_status: status,
        }),
    )
}

/// App backed by the mock server and an in-memory session slot
pub fn app_with(
    server: &MockServer,
    session: Option<Session>,
) -> (DealsApp, Arc<InMemorySessionBackend>) {
    let backend = Arc::new(match session {
        Some(session) => InMemorySessionBackend::with_session(session),
        None => InMemorySessionBackend::default(),
    });
    let store = SessionStore::new(backend.clone());
    (DealsApp::new(api_for(server), store), backend)
}

pub fn deal_json(id: &str, is_locked: bool) -> Value {
    json!({
        "_id": id,
        "title": "Half off annual plan",
        "description": "50% off for the first year",
        "category": "software",
        "isLocked": is_locked
    })
}

pub async fn mount_deal(server: &MockServer, id: &str, is_locked: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/deals/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(deal_json(id, is_locked)))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, status: &str) {
    Mock::given(method("GET"))
        .and(path("/verification/status"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "verificationStatus": status })),
        )
        .mount(server)
        .await;
}

pub async fn mount_login(server: &MockServer, status: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TOKEN,
            "user": { "id": "u1", "email": "user@example.com", "verificationStatus": status }
        })))
        .mount(server)
        .await;
}
