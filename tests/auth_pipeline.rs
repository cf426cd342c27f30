// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end requests through the router and auth gate.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Request, StatusCode},
    response::Response,
    Router,
};
use contact_server::{
    api::router,
    auth::{JwtVerifier, TokenClaims, USERNAME_FIELD, USER_COLLECTION},
    state::AppState,
    storage::{Document, DocumentStore, MemoryDocumentStore, RedbDocumentStore},
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &[u8] = b"pipeline-secret";

fn user_doc(id: &str, username: &str, password: &str) -> Document {
    let hash = bcrypt::hash(password, 4).unwrap();
    match json!({"_id": id, "username": username, "password": hash}) {
        Value::Object(doc) => doc,
        _ => unreachable!(),
    }
}

fn seeded(store: impl DocumentStore + 'static) -> Router {
    store
        .insert_one(USER_COLLECTION, user_doc("alice-id", "alice", "wonderland"))
        .unwrap();
    router(AppState::new(
        Arc::new(store),
        Arc::new(JwtVerifier::hs256(SECRET)),
    ))
}

fn memory_app() -> Router {
    seeded(MemoryDocumentStore::new().with_unique_index(USER_COLLECTION, USERNAME_FIELD))
}

fn token_for(username: &str, ttl_secs: i64) -> String {
    let claims = TokenClaims {
        username: username.to_string(),
        exp: (chrono::Utc::now().timestamp() + ttl_secs) as u64,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn graphql(query: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/query")
        .header("content-type", "application/json");
    if let Some(value) = auth {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn me(app: Router, auth: Option<&str>) -> (StatusCode, Value) {
    let response = app
        .oneshot(graphql("{ me { id username } }", auth))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await["data"]["me"].clone())
}

#[tokio::test]
async fn known_user_is_attached() {
    let (status, me) = me(memory_app(), Some(&token_for("alice", 600))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, json!({"id": "alice-id", "username": "alice"}));
}

#[tokio::test]
async fn missing_header_is_anonymous() {
    let (status, me) = me(memory_app(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, Value::Null);
}

#[tokio::test]
async fn valid_token_for_unknown_user_is_anonymous() {
    let (status, me) = me(memory_app(), Some(&token_for("ghost", 600))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, Value::Null);
}

#[tokio::test]
async fn garbage_token_is_rejected_before_graphql() {
    let response = memory_app()
        .oneshot(graphql("{ me { id } }", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Invalid token");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let response = memory_app()
        .oneshot(graphql("{ me { id } }", Some(&token_for("alice", -3600))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bearer_prefixed_header_is_not_stripped() {
    let header = format!("Bearer {}", token_for("alice", 600));
    let response = memory_app()
        .oneshot(graphql("{ me { id } }", Some(&header)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn get_transport_resolves_identity() {
    let request = Request::builder()
        .uri("/query?query=%7B%20me%20%7B%20username%20%7D%20%7D")
        .header(AUTHORIZATION, token_for("alice", 600))
        .body(Body::empty())
        .unwrap();
    let response = memory_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["me"]["username"], "alice");
}

#[tokio::test]
async fn stored_credentials_check_out() {
    let response = memory_app()
        .oneshot(graphql(
            r#"mutation { checkCredentials(username: "alice", password: "wonderland") }"#,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["checkCredentials"], true);
}

#[tokio::test]
async fn redb_backed_pipeline_resolves_identity() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = RedbDocumentStore::open(&dir.path().join("contact.redb"))
        .unwrap()
        .with_unique_index(USER_COLLECTION, USERNAME_FIELD);
    let app = seeded(store);

    let (status, me) = me(app, Some(&token_for("alice", 600))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, json!({"id": "alice-id", "username": "alice"}));
}
