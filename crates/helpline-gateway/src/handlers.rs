// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the relay surface.
//!
//! The chat pipeline runs enrich -> gate -> persist -> broadcast. The
//! enrichment stage never rejects a request, and its user-record write is
//! eventually consistent with message insertion: a failure there is logged
//! and the request continues.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use helpline_core::{AnalyticsSnapshot, HelplineError, LoggedMessage};
use helpline_relay::{gate_check, Access};
use helpline_tree::DecisionOption;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Canned acknowledgment returned for manual submissions.
const MANUAL_ACK: &str = "Thank you for your query. We'll get back to you shortly.";

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Decision-tree step id for guided conversations.
    #[serde(default)]
    pub step: Option<String>,
    /// Free-text submission; takes precedence over the guided path.
    #[serde(default)]
    pub manual_query: Option<String>,
    /// Conversation identity.
    pub identity: String,
}

/// Guided response: the decision node for the requested step.
#[derive(Debug, Serialize)]
pub struct GuidedResponse {
    pub question: &'static str,
    pub options: &'static [DecisionOption],
}

/// Manual response: the canned acknowledgment.
#[derive(Debug, Serialize)]
pub struct ManualResponse {
    pub response: &'static str,
}

/// Response body for the admin mutation endpoints.
#[derive(Debug, Serialize)]
pub struct AdminActionResponse {
    pub success: bool,
    pub message: String,
}

/// POST /chat
///
/// Enriches the session, gates on the block flag, then either persists and
/// broadcasts a manual submission or answers with the requested decision
/// node (no side effects on the guided path).
pub async fn post_chat(
    State(state): State<GatewayState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if body.identity.trim().is_empty() {
        return Err(HelplineError::Validation(
            "identity must not be empty".to_string(),
        )
        .into());
    }

    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let visitor_info = state
        .enrich
        .enrich(forwarded_for, Some(addr.ip()), agent)
        .await;

    // Eventually consistent with the message append; a failed write here
    // must not reject the request.
    if let Err(e) = state
        .store
        .record_visitor_info(&body.identity, &visitor_info)
        .await
    {
        warn!(identity = %body.identity, error = %e, "visitor info write failed");
    }

    if let Access::Deny = gate_check(state.store.as_ref(), &body.identity).await? {
        return Err(HelplineError::AccessDenied {
            identity: body.identity,
        }
        .into());
    }

    if let Some(query) = body
        .manual_query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
    {
        let message = state.store.append_user(&body.identity, query).await?;
        state.router.broadcast_user_message(&message).await;
        return Ok(Json(ManualResponse {
            response: MANUAL_ACK,
        })
        .into_response());
    }

    let node = helpline_tree::lookup(body.step.as_deref().unwrap_or(""));
    Ok(Json(GuidedResponse {
        question: node.prompt,
        options: node.options,
    })
    .into_response())
}

/// GET /admin/messages
///
/// The full message log in creation order, joined with visitor metadata.
pub async fn get_messages(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<LoggedMessage>>, ApiError> {
    Ok(Json(state.store.list_all().await?))
}

/// GET /admin/analytics
pub async fn get_analytics(
    State(state): State<GatewayState>,
) -> Result<Json<AnalyticsSnapshot>, ApiError> {
    Ok(Json(state.store.analytics().await?))
}

/// DELETE /admin/delete-chat/{identity}
///
/// Bulk delete of one conversation. Idempotent; reports the true deleted
/// count.
pub async fn delete_chat(
    State(state): State<GatewayState>,
    Path(identity): Path<String>,
) -> Result<Json<AdminActionResponse>, ApiError> {
    let deleted = state.store.clear(&identity).await?;
    Ok(Json(AdminActionResponse {
        success: true,
        message: format!(
            "Chat for user {identity} has been deleted ({deleted} messages removed)."
        ),
    }))
}

/// POST /admin/block-user/{identity}
pub async fn block_user(
    State(state): State<GatewayState>,
    Path(identity): Path<String>,
) -> Result<Json<AdminActionResponse>, ApiError> {
    state.store.set_blocked(&identity, true).await?;
    Ok(Json(AdminActionResponse {
        success: true,
        message: format!("User {identity} has been blocked."),
    }))
}

/// POST /admin/resolve-issue/{identity}
pub async fn resolve_issue(
    State(state): State<GatewayState>,
    Path(identity): Path<String>,
) -> Result<Json<AdminActionResponse>, ApiError> {
    state.store.set_resolved(&identity, true).await?;
    Ok(Json(AdminActionResponse {
        success: true,
        message: format!("Issue for user {identity} has been resolved."),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use helpline_enrich::EnrichmentPipeline;
    use helpline_relay::{RoomRegistry, SessionRouter};
    use helpline_test_utils::{MockChatStore, MockGeoLookup};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::server::router;

    const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    struct Fixture {
        store: Arc<MockChatStore>,
        router: Arc<SessionRouter>,
        state: GatewayState,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MockChatStore::new());
        let session_router = Arc::new(SessionRouter::new(
            store.clone(),
            Arc::new(RoomRegistry::new()),
        ));
        let geo = MockGeoLookup::answering(helpline_core::GeoInfo {
            city: Some("Berlin".to_string()),
            region: Some("Berlin".to_string()),
            country: Some("DE".to_string()),
            timezone: Some("Europe/Berlin".to_string()),
        });
        let state = GatewayState {
            store: store.clone(),
            router: session_router.clone(),
            enrich: Arc::new(EnrichmentPipeline::new(Arc::new(geo))),
        };
        Fixture {
            store,
            router: session_router,
            state,
        }
    }

    fn chat_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .header("user-agent", CHROME_DESKTOP)
            .header("x-forwarded-for", "203.0.113.7")
            .extension(ConnectInfo(SocketAddr::from(([10, 0, 0, 5], 4000))))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn admin_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(
        state: GatewayState,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn start_step_returns_the_greeting_and_four_options() {
        let f = fixture();
        let (status, body) = send(
            f.state,
            chat_request(serde_json::json!({"step": "start", "identity": "u1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "Hello! How can I assist you today?");
        let ids: Vec<&str> = body["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["billing", "tech_support", "product", "other"]);

        // The guided path has no message side effects.
        assert_eq!(f.store.message_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_step_returns_the_fallback_node() {
        let f = fixture();
        let (status, body) = send(
            f.state,
            chat_request(serde_json::json!({"step": "warp_drive", "identity": "u1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["question"],
            "Sorry, I didn't understand that. Could you rephrase?"
        );
        assert!(body["options"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn manual_query_is_persisted_acknowledged_and_broadcast() {
        let f = fixture();
        let (tx, mut rx) = mpsc::channel(16);
        f.router.connect_operator("op-1", tx);

        let (status, body) = send(
            f.state,
            chat_request(
                serde_json::json!({"manualQuery": "my bill is wrong", "identity": "u1"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            "Thank you for your query. We'll get back to you shortly."
        );

        let persisted = f.store.messages_for("u1").await;
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].body, "my bill is wrong");

        let event: serde_json::Value =
            serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(event["event"], "message");
        assert_eq!(event["data"]["identity"], "u1");
        assert_eq!(event["data"]["origin"], "user");
    }

    #[tokio::test]
    async fn blocked_identity_is_denied_with_no_side_effects() {
        let f = fixture();
        f.store.set_blocked("u2", true).await.unwrap();

        let (status, body) = send(
            f.state,
            chat_request(serde_json::json!({"manualQuery": "let me in", "identity": "u2"})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "User is blocked.");
        assert!(f.store.messages_for("u2").await.is_empty());
    }

    #[tokio::test]
    async fn empty_identity_is_a_validation_error() {
        let f = fixture();
        let (status, _) = send(
            f.state,
            chat_request(serde_json::json!({"manualQuery": "hello", "identity": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(f.store.message_count().await, 0);
    }

    #[tokio::test]
    async fn append_failure_surfaces_as_internal_error() {
        let f = fixture();
        f.store.fail_appends(true);
        let (status, body) = send(
            f.state,
            chat_request(serde_json::json!({"manualQuery": "hello", "identity": "u1"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn chat_records_visitor_info_for_the_identity() {
        let f = fixture();
        send(
            f.state,
            chat_request(serde_json::json!({"step": "start", "identity": "u1"})),
        )
        .await;

        let user = f.store.find_user("u1").await.unwrap().unwrap();
        let info = user.visitor_info.unwrap();
        assert_eq!(info.network_origin, "203.0.113.7");
        assert_eq!(info.city, "Berlin");
        assert_eq!(info.browser_name, "Chrome");
    }

    #[tokio::test]
    async fn enrichment_lookup_failure_still_writes_the_default_record() {
        let store = Arc::new(MockChatStore::new());
        let state = GatewayState {
            store: store.clone(),
            router: Arc::new(SessionRouter::new(
                store.clone(),
                Arc::new(RoomRegistry::new()),
            )),
            enrich: Arc::new(EnrichmentPipeline::new(Arc::new(MockGeoLookup::failing()))),
        };

        let (status, body) = send(
            state,
            chat_request(serde_json::json!({"step": "start", "identity": "u1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], "Hello! How can I assist you today?");

        // The degraded all-Unknown record was still written.
        let user = store.find_user("u1").await.unwrap().unwrap();
        assert_eq!(user.visitor_info.unwrap().city, "Unknown");
    }

    #[tokio::test]
    async fn visitor_info_write_failure_does_not_reject_the_request() {
        let f = fixture();
        f.store.fail_visitor_writes(true);

        let (status, body) = send(
            f.state,
            chat_request(serde_json::json!({"manualQuery": "still works", "identity": "u1"})),
        )
        .await;

        // The enrichment write is eventually consistent; its failure is
        // logged, not surfaced.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            "Thank you for your query. We'll get back to you shortly."
        );
        assert_eq!(f.store.messages_for("u1").await.len(), 1);
    }

    #[tokio::test]
    async fn delete_chat_reports_the_true_count_and_is_idempotent() {
        let f = fixture();
        f.store.append_user("u1", "one").await.unwrap();
        f.store.append_user("u1", "two").await.unwrap();
        f.store.append_user("u9", "keep").await.unwrap();

        let (status, body) = send(
            f.state.clone(),
            admin_request("DELETE", "/admin/delete-chat/u1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["message"].as_str().unwrap().contains("2 messages"));

        let (status, body) =
            send(f.state, admin_request("DELETE", "/admin/delete-chat/u1")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("0 messages"));

        // Other identities are untouched.
        assert_eq!(f.store.messages_for("u9").await.len(), 1);
    }

    #[tokio::test]
    async fn block_and_resolve_upsert_the_flags() {
        let f = fixture();

        let (status, body) =
            send(f.state.clone(), admin_request("POST", "/admin/block-user/u5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User u5 has been blocked.");

        let (status, body) = send(
            f.state.clone(),
            admin_request("POST", "/admin/resolve-issue/u5"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Issue for user u5 has been resolved.");

        let user = f.store.find_user("u5").await.unwrap().unwrap();
        assert!(user.is_blocked);
        assert!(user.is_resolved);
    }

    #[tokio::test]
    async fn messages_endpoint_replays_the_joined_log() {
        let f = fixture();
        f.store.append_user("u1", "hello").await.unwrap();
        f.store.append_operator("u1", "hi there").await.unwrap();
        f.store
            .record_visitor_info("u1", &helpline_core::VisitorInfo::default())
            .await
            .unwrap();

        let (status, body) = send(f.state, admin_request("GET", "/admin/messages")).await;
        assert_eq!(status, StatusCode::OK);
        let log = body.as_array().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0]["origin"], "user");
        assert_eq!(log[1]["origin"], "operator");
        assert_eq!(log[0]["visitorInfo"]["city"], "Unknown");
    }

    #[tokio::test]
    async fn analytics_endpoint_returns_the_three_counts() {
        let f = fixture();
        f.store.append_user("u1", "hello").await.unwrap();
        f.store.set_blocked("u2", true).await.unwrap();
        f.store.set_resolved("u3", true).await.unwrap();

        let (status, body) = send(f.state, admin_request("GET", "/admin/analytics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalMessages"], 1);
        assert_eq!(body["activeUsers"], 1);
        assert_eq!(body["resolvedIssues"], 1);
    }
}
