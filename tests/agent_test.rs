//! Integration tests for the agent control API.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use common::{test_db, TestDb};
use induktr_bot::storage::{get_connection, languages, leads};
use induktr_bot::telegram::agent::{create_agent_router, AgentState};

const SECRET: &str = "test-secret";

fn router(db: &TestDb) -> Router {
    create_agent_router(AgentState {
        bot: teloxide::Bot::new("12345:TEST"),
        db_pool: Arc::clone(&db.pool),
        secret: SECRET.to_string(),
        started_at: std::time::Instant::now(),
    })
}

fn request(secret: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/agent/command")
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-agent-secret", secret);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(Some("wrong"), serde_json::json!({ "command": "status" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized agent access");
}

#[tokio::test]
async fn missing_secret_is_rejected() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(None, serde_json::json!({ "command": "status" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_command_is_a_bad_request() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(Some(SECRET), serde_json::json!({ "command": "frobnicate" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Unknown command: frobnicate");
}

#[tokio::test]
async fn lead_command_persists_and_returns_access_code() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(
            Some(SECRET),
            serde_json::json!({
                "command": "lead",
                "params": {
                    "name": "Bob Buyer",
                    "contact": "bob@example.com",
                    "projectType": "template",
                    "budget": "490",
                    "orderType": "template",
                    "templateId": "shop-starter",
                },
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let lead_id = body["leadId"].as_i64().unwrap();
    let code = body["accessCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);

    let conn = get_connection(&db.pool).unwrap();
    let stored = leads::get_lead_by_access_code(&conn, code).unwrap().unwrap();
    assert_eq!(stored.id, lead_id);
    assert_eq!(stored.name, "Bob Buyer");
    assert_eq!(stored.order_type, "template");
    assert_eq!(stored.template_id.as_deref(), Some("shop-starter"));
}

#[tokio::test]
async fn lead_command_rejects_incomplete_payload() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(
            Some(SECRET),
            serde_json::json!({
                "command": "lead",
                "params": { "name": "No Contact" },
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let conn = get_connection(&db.pool).unwrap();
    assert_eq!(leads::count_leads(&conn).unwrap(), 0);
}

#[tokio::test]
async fn notify_requires_chat_id_and_message() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(
            Some(SECRET),
            serde_json::json!({ "command": "notify", "params": { "chatId": 1 } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Missing chatId or message");
}

#[tokio::test]
async fn broadcast_with_no_known_chats_reports_zero() {
    let db = test_db();
    let response = router(&db)
        .oneshot(request(
            Some(SECRET),
            serde_json::json!({ "command": "broadcast", "params": { "message": "hi" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Broadcast sent. Successful: 0/0");
}

#[tokio::test]
async fn status_reports_lead_and_chat_counts() {
    let db = test_db();
    {
        let conn = get_connection(&db.pool).unwrap();
        leads::create_lead(&conn, &common::sample_lead()).unwrap();
        languages::set_user_language(&conn, 42, "en").unwrap();
    }

    let response = router(&db)
        .oneshot(request(Some(SECRET), serde_json::json!({ "command": "status" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["leads"], 1);
    assert_eq!(body["data"]["activeBotUsers"], 1);
}
