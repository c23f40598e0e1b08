//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod proposals;
mod schemes;
mod stats;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Scheme catalog
        .route("/api/schemes", get(schemes::list_schemes))
        .route("/api/schemes/{id}", get(schemes::get_scheme))

        // Proposal workflow
        .route(
            "/api/proposals",
            get(proposals::list_proposals).post(proposals::create_proposal),
        )
        .route("/api/proposals/{id}", get(proposals::get_proposal))
        .route("/api/proposals/{id}/advance", post(proposals::advance_stage))
        .route("/api/proposals/{id}/skip", post(proposals::skip_to_stage))
        .route("/api/proposals/{id}/comments", post(proposals::add_comment))
        .route("/api/proposals/{id}/insights", get(proposals::get_insights))
        .route(
            "/api/active-proposal",
            get(proposals::get_active_proposal).put(proposals::set_active_proposal),
        )

        // Dashboard statistics
        .route("/api/stats", get(stats::get_stats))

        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    layer
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::workflow::{ProposalStore, SchemeCatalog};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = Arc::new(AppState::new(ProposalStore::new(SchemeCatalog::builtin().unwrap())));
        create_router(state, &Settings::default())
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, scheme_id: &str) -> String {
        let (status, body) = call(
            app,
            "POST",
            "/api/proposals",
            Some(json!({"title": "Coastal Radar", "description": "Upgrade", "schemeId": scheme_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_list_and_get_schemes() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/schemes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["schemes"].as_array().unwrap().len(), 6);

        let (status, body) = call(&app, "GET", "/api/schemes/idex", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["stages"].as_array().unwrap().len(), 6);

        let (status, body) = call(&app, "GET", "/api/schemes/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_with_unknown_scheme() {
        let (status, body) = call(
            &app(),
            "POST",
            "/api/proposals",
            Some(json!({"title": "x", "description": "y", "schemeId": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "UNKNOWN_SCHEME");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let (status, body) = call(
            &app(),
            "POST",
            "/api/proposals",
            Some(json!({"title": "", "description": "y", "schemeId": "tdf"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_advance_and_skip_flow() {
        let app = app();
        let id = create(&app, "tdf").await;

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/proposals/{id}/advance"),
            Some(json!({"comment": "ok", "approved": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["currentStageIndex"], 1);
        assert_eq!(body["data"]["stages"][0]["status"], "completed");
        assert_eq!(body["data"]["progressPercent"], 25);

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/proposals/{id}/skip"),
            Some(json!({"targetStageIndex": 1, "comment": "back"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INVALID_TRANSITION");

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/proposals/{id}/skip"),
            Some(json!({"targetStageIndex": 3, "comment": "urgent"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["currentStageIndex"], 3);
        assert_eq!(body["data"]["stages"][2]["comments"][0]["text"], "Skipped");
    }

    #[tokio::test]
    async fn test_comment_and_reply() {
        let app = app();
        let id = create(&app, "make-i").await;
        let uri = format!("/api/proposals/{id}/comments");

        let (status, body) = call(&app, "POST", &uri, Some(json!({"text": "Cost?"}))).await;
        assert_eq!(status, StatusCode::OK);
        let parent = body["data"]["commentId"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &uri,
            Some(json!({"stageId": "make-i-stage-1", "text": "Fine", "parentCommentId": parent})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reply = body["data"]["commentId"].as_str().unwrap();
        let comments = &body["data"]["proposal"]["stages"][0]["comments"];
        assert_eq!(comments[0]["replies"][0], reply);
        assert_eq!(comments[1]["parentId"], parent.as_str());

        let (status, body) = call(
            &app,
            "POST",
            &uri,
            Some(json!({"text": "Orphan", "parentCommentId": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_PARENT");
    }

    #[tokio::test]
    async fn test_active_proposal_and_stats() {
        let app = app();
        let id = create(&app, "revenue").await;

        let (status, body) = call(&app, "GET", "/api/active-proposal", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["proposal"].is_null());

        let (status, _) = call(&app, "PUT", "/api/active-proposal", Some(json!({"proposalId": id}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, "GET", "/api/active-proposal", None).await;
        assert_eq!(body["data"]["proposal"]["id"], id.as_str());

        let (status, body) = call(&app, "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalProposals"], 1);
        assert_eq!(body["data"]["stageStatus"]["active"], 1);
        assert_eq!(body["data"]["stageStatus"]["pending"], 6);
        assert_eq!(body["data"]["completionRate"], 0);
        assert_eq!(body["data"]["activeRate"], 14);
    }

    #[tokio::test]
    async fn test_search_and_insights() {
        let app = app();
        let id = create(&app, "idex").await;

        let (_, body) = call(&app, "GET", "/api/proposals?q=radar", None).await;
        assert_eq!(body["data"]["proposals"].as_array().unwrap().len(), 1);
        let (_, body) = call(&app, "GET", "/api/proposals?q=sonar", None).await;
        assert_eq!(body["data"]["proposals"].as_array().unwrap().len(), 0);

        let (status, body) = call(&app, "GET", &format!("/api/proposals/{id}/insights"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["vendors"].as_array().unwrap().len(), 5);
        assert!(body["data"]["recommendation"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_unknown_proposal() {
        let uri = format!("/api/proposals/{}", uuid::Uuid::new_v4());
        let (status, body) = call(&app(), "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PROPOSAL_NOT_FOUND");
    }
}
