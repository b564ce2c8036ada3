//! Agent control API.
//!
//! A small HTTP surface for automation: a trusted agent can register a new
//! lead, push notifications, broadcast to every known chat, or read bot
//! status. The single route is guarded by a shared secret in the
//! `x-agent-secret` header.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::storage::db::{get_connection, DbPool};
use crate::storage::leads::NewLead;
use crate::storage::{languages, leads};
use crate::telegram::notifications::{send_lead_alert, send_notification};
use teloxide::Bot;

/// Shared state for the agent API.
#[derive(Clone)]
pub struct AgentState {
    pub bot: Bot,
    pub db_pool: Arc<DbPool>,
    pub secret: String,
    pub started_at: std::time::Instant,
}

#[derive(Debug, Deserialize)]
struct AgentRequest {
    command: String,
    #[serde(default)]
    params: serde_json::Value,
}

fn reply(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

fn err(status: StatusCode, message: &str) -> Response {
    reply(status, serde_json::json!({ "success": false, "message": message }))
}

/// Creates the agent API router.
pub fn create_agent_router(state: AgentState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/agent/command", post(handle_command))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Runs the agent API server.
pub async fn run_agent_server(state: AgentState, port: u16) -> anyhow::Result<()> {
    let app = create_agent_router(state);

    let addr = format!("0.0.0.0:{}", port);
    log::info!("🤖 Starting agent API server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_command(
    State(state): State<Arc<AgentState>>,
    headers: HeaderMap,
    Json(req): Json<AgentRequest>,
) -> Response {
    let presented = headers
        .get("x-agent-secret")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != state.secret {
        return err(StatusCode::UNAUTHORIZED, "Unauthorized agent access");
    }

    match req.command.as_str() {
        "lead" => handle_lead(&state, req.params).await,
        "notify" => handle_notify(&state, &req.params).await,
        "broadcast" => handle_broadcast(&state, &req.params).await,
        "status" => handle_status(&state).await,
        other => err(StatusCode::BAD_REQUEST, &format!("Unknown command: {other}")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeadParams {
    name: String,
    contact: String,
    project_type: String,
    budget: String,
    deadline: Option<String>,
    description: Option<String>,
    payment_method: Option<String>,
    #[serde(default)]
    order_type: Option<String>,
    template_id: Option<String>,
}

/// Registers a lead and alerts the admin chat with the action buttons.
async fn handle_lead(state: &AgentState, params: serde_json::Value) -> Response {
    let params: LeadParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => return err(StatusCode::BAD_REQUEST, &format!("Invalid lead payload: {e}")),
    };
    let new = NewLead {
        name: params.name,
        contact: params.contact,
        project_type: params.project_type,
        budget: params.budget,
        deadline: params.deadline,
        description: params.description,
        payment_method: params.payment_method,
        order_type: params.order_type.unwrap_or_else(|| "custom".to_string()),
        template_id: params.template_id,
    };

    let lead = {
        let conn = match get_connection(&state.db_pool) {
            Ok(conn) => conn,
            Err(e) => return err(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        };
        match leads::create_lead(&conn, &new) {
            Ok(lead) => lead,
            Err(e) => return err(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    };

    send_lead_alert(&state.bot, &lead).await;

    reply(
        StatusCode::OK,
        serde_json::json!({
            "success": true,
            "leadId": lead.id,
            "accessCode": lead.access_code,
        }),
    )
}

fn param_chat_id(params: &serde_json::Value) -> Option<i64> {
    let value = params.get("chatId")?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

async fn handle_notify(state: &AgentState, params: &serde_json::Value) -> Response {
    let message = params.get("message").and_then(|v| v.as_str());
    let (Some(chat_id), Some(message)) = (param_chat_id(params), message) else {
        return err(StatusCode::BAD_REQUEST, "Missing chatId or message");
    };

    send_notification(&state.bot, chat_id, message).await;
    reply(
        StatusCode::OK,
        serde_json::json!({
            "success": true,
            "message": format!("Notification sent to {chat_id}"),
        }),
    )
}

async fn handle_broadcast(state: &AgentState, params: &serde_json::Value) -> Response {
    let Some(message) = params.get("message").and_then(|v| v.as_str()) else {
        return err(StatusCode::BAD_REQUEST, "Missing message");
    };

    let chat_ids = match get_connection(&state.db_pool) {
        Ok(conn) => match languages::get_all_chat_ids(&conn) {
            Ok(ids) => ids,
            Err(e) => return err(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        },
        Err(e) => return err(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };

    let mut delivered = 0usize;
    for chat_id in &chat_ids {
        if send_notification(&state.bot, *chat_id, message).await {
            delivered += 1;
        }
    }

    reply(
        StatusCode::OK,
        serde_json::json!({
            "success": true,
            "message": format!("Broadcast sent. Successful: {delivered}/{}", chat_ids.len()),
        }),
    )
}

async fn handle_status(state: &AgentState) -> Response {
    let conn = match get_connection(&state.db_pool) {
        Ok(conn) => conn,
        Err(e) => return err(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let lead_count = leads::count_leads(&conn).unwrap_or(0);
    let active_chats = languages::get_all_chat_ids(&conn).map(|v| v.len()).unwrap_or(0);

    reply(
        StatusCode::OK,
        serde_json::json!({
            "success": true,
            "data": {
                "leads": lead_count,
                "activeBotUsers": active_chats,
                "uptimeSeconds": state.started_at.elapsed().as_secs(),
            },
        }),
    )
}
