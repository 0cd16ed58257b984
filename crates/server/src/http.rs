//! HTTP endpoints

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use leadbot_agent::LeadAgent;
use leadbot_core::{ChatSummary, ConversationStage, ExpectedReply, LeadQualification};
use leadbot_llm::{AugmentRequest, AugmentedReply};
use leadbot_session::{record_visit, snapshot_of, submit_on_close};

use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(delete_session))
        .route("/api/sessions/:id/close", post(close_session))
        // Chat turn endpoint
        .route("/api/chat/:session_id", post(chat))
        // Ingestion endpoints
        .route("/api/chat/summary", post(ingest_summary))
        .route("/api/chat/context", post(save_context))
        .route("/api/chat/context/:session_id", get(get_context))
        // Augmented reply endpoint
        .route("/api/chat/llm-response", post(llm_response))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins.
///
/// - cors disabled: permissive (development only)
/// - no origins configured: localhost-only
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(%origin, "invalid CORS origin");
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("no CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!(origins = parsed.len(), "CORS configured");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

fn build_agent(state: &AppState, id: &str) -> LeadAgent {
    match &state.augmentor {
        Some(augmentor) => {
            LeadAgent::with_augmentor(id, state.agent_config.clone(), augmentor.clone())
        }
        None => LeadAgent::new(id, state.agent_config.clone()),
    }
}

/// Create a chat session.
///
/// A prior snapshot marks a returning visitor; loading it also applies the
/// retention window and bumps the visit counter.
async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let snapshot = record_visit(state.snapshot_store.as_ref()).await;

    let session = {
        let state_ref = &state;
        state
            .sessions
            .create(|id| build_agent(state_ref, id))
            .map_err(StatusCode::from)?
    };

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "stage": session.agent.stage().display_name(),
        "returning_visitor": snapshot.is_some(),
        "visit_count": snapshot.map(|s| s.visit_count).unwrap_or(1),
    })))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let agent_state = session.agent.state();

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "active": session.is_active(),
        "stage": agent_state.stage,
        "expecting": agent_state.expecting,
        "qualification": agent_state.qualification(),
        "message_count": session.agent.message_count(),
    })))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Close a session, submitting its summary, and remove it
async fn close_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    finish_session(&state, &id)
}

/// Delete behaves like close: the summary threshold decides whether a
/// summary goes out
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    finish_session(&state, &id)
}

fn finish_session(state: &AppState, id: &str) -> StatusCode {
    let Some(session) = state.sessions.get(id) else {
        return StatusCode::NOT_FOUND;
    };

    session.close();
    let final_state = session.agent.state();

    if let Some(sink) = &state.summary_sink {
        submit_on_close(
            sink.clone(),
            &final_state,
            &session.agent.transcript(),
            state.settings.session.min_messages_for_summary,
        );
    }

    // Persist the cross-visit snapshot, best-effort
    let store = state.snapshot_store.clone();
    tokio::spawn(async move {
        let visit_count = match store.load().await {
            Ok(Some(prior)) => prior.visit_count,
            _ => 1,
        };
        if let Err(e) = store.save(&snapshot_of(&final_state, visit_count)).await {
            tracing::warn!(error = %e, "session snapshot save failed");
        }
    });

    state.sessions.remove(id);

    StatusCode::NO_CONTENT
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

/// Chat response
#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    stage: ConversationStage,
    expecting: ExpectedReply,
    qualification: LeadQualification,
}

/// Process one chat turn
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let session = state.sessions.get(&session_id).ok_or(StatusCode::NOT_FOUND)?;
    if !session.is_active() {
        return Err(StatusCode::GONE);
    }

    session.touch();

    let reply = session.agent.process(&request.message).await;
    session.schedule_delivery(reply.text.clone());
    metrics::counter!("leadbot_turns_total").increment(1);

    Ok(Json(ChatResponse {
        response: reply.text,
        stage: reply.stage,
        expecting: reply.expecting,
        qualification: reply.qualification,
    }))
}

/// Ingest a chat summary
async fn ingest_summary(
    State(state): State<AppState>,
    Json(summary): Json<ChatSummary>,
) -> Json<serde_json::Value> {
    let id = uuid::Uuid::new_v4().to_string();
    state.summaries.write().insert(id.clone(), summary);
    metrics::counter!("leadbot_summaries_ingested_total").increment(1);

    Json(serde_json::json!({
        "success": true,
        "id": id,
    }))
}

/// Context persistence request
#[derive(Debug, Deserialize)]
struct ContextRequest {
    session_id: String,
    context: serde_json::Value,
}

/// Persist session context
async fn save_context(
    State(state): State<AppState>,
    Json(request): Json<ContextRequest>,
) -> Json<serde_json::Value> {
    state
        .contexts
        .write()
        .insert(request.session_id, request.context);
    Json(serde_json::json!({ "success": true }))
}

/// Fetch persisted session context
async fn get_context(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state
        .contexts
        .read()
        .get(&session_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Augmented-reply request
#[derive(Debug, Deserialize)]
struct LlmRequest {
    prompt: String,
    #[serde(default)]
    context: String,
}

/// Produce an enhanced reply, falling back to the canned shape when no
/// upstream model is configured or the attempt fails
async fn llm_response(
    State(state): State<AppState>,
    Json(request): Json<LlmRequest>,
) -> Json<AugmentedReply> {
    if let Some(augmentor) = &state.augmentor {
        match augmentor
            .augment(AugmentRequest {
                prompt: request.prompt.clone(),
                context: request.context.clone(),
            })
            .await
        {
            Ok(reply) => return Json(reply),
            Err(e) => {
                tracing::warn!(error = %e, "llm-response upstream failed");
            }
        }
    }

    metrics::counter!("leadbot_augment_fallbacks_total").increment(1);
    Json(AugmentedReply {
        response: state.agent_config.templates.generic_question_answer.clone(),
        confidence: None,
        reasoning: Some("rule-based fallback".to_string()),
        suggested_actions: Vec::new(),
        fallback_used: true,
    })
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "sessions": state.sessions.count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leadbot_config::Settings;
    use leadbot_core::ContactInfo;
    use std::collections::BTreeSet;

    fn app_state() -> AppState {
        AppState::new(Settings::default())
    }

    #[test]
    fn test_router_creation() {
        let _ = create_router(app_state());
    }

    fn sample_summary() -> ChatSummary {
        ChatSummary {
            interaction_date: Utc::now(),
            contact_info: ContactInfo::default(),
            chat_summary: "Visitor discussed: chatbots".to_string(),
            services_discussed: BTreeSet::new(),
            key_pain_points: BTreeSet::new(),
            call_to_action_offered: false,
            next_step: "Nurture".to_string(),
            lead_qualification: LeadQualification::Cold,
        }
    }

    #[tokio::test]
    async fn test_ingest_summary_returns_id() {
        let state = app_state();
        let Json(body) = ingest_summary(State(state.clone()), Json(sample_summary())).await;

        assert_eq!(body["success"], true);
        let id = body["id"].as_str().unwrap();
        assert!(state.summaries.read().contains_key(id));
    }

    #[tokio::test]
    async fn test_context_round_trip() {
        let state = app_state();

        let _ = save_context(
            State(state.clone()),
            Json(ContextRequest {
                session_id: "abc".to_string(),
                context: serde_json::json!({ "returning": true }),
            }),
        )
        .await;

        let Json(context) = get_context(State(state.clone()), Path("abc".to_string()))
            .await
            .unwrap();
        assert_eq!(context["returning"], true);

        let missing = get_context(State(state), Path("missing".to_string())).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_llm_response_fallback_shape() {
        // Default settings carry no augmentor, so the fallback shape comes back
        let state = app_state();
        let Json(reply) = llm_response(
            State(state),
            Json(LlmRequest {
                prompt: "how does this work?".to_string(),
                context: String::new(),
            }),
        )
        .await;

        assert!(reply.fallback_used);
        assert!(!reply.response.is_empty());
    }

    #[tokio::test]
    async fn test_chat_flow_through_handlers() {
        let state = app_state();
        let Json(created) = create_session(State(state.clone())).await.unwrap();
        let session_id = created["session_id"].as_str().unwrap().to_string();

        let Json(reply) = chat(
            State(state.clone()),
            Path(session_id.clone()),
            Json(ChatRequest {
                message: "Hi".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(!reply.response.is_empty());
        assert_eq!(reply.expecting, ExpectedReply::General);

        let status = close_session(State(state.clone()), Path(session_id.clone())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.get(&session_id).is_none());
    }
}
