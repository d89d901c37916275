pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

/// Upper bound for uploaded CVs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/settings",
            put(handlers::handle_update_settings),
        )
        // CV
        .route("/api/v1/sessions/:id/cv", post(handlers::handle_upload_cv))
        .route(
            "/api/v1/sessions/:id/cv/analyze",
            post(handlers::handle_analyze_cv),
        )
        // Job posting
        .route(
            "/api/v1/sessions/:id/job/scrape",
            post(handlers::handle_scrape_job),
        )
        .route("/api/v1/sessions/:id/job/text", post(handlers::handle_job_text))
        .route(
            "/api/v1/sessions/:id/job/analyze",
            post(handlers::handle_analyze_job),
        )
        // Suggestions
        .route(
            "/api/v1/sessions/:id/suggestions",
            post(handlers::handle_generate_suggestions).get(handlers::handle_get_suggestions),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::scrape::JobFetcher;
    use crate::session::store::SessionStore;

    fn app(generator: ScriptedGenerator) -> Router {
        build_router(AppState {
            config: Config::default(),
            llm: Arc::new(generator),
            fetcher: JobFetcher::new().unwrap(),
            sessions: SessionStore::default(),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/sessions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = app(ScriptedGenerator::default());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "scripted");
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let app = app(ScriptedGenerator::default());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_session_returns_json_404() {
        let app = app(ScriptedGenerator::default());
        let request = Request::builder()
            .uri("/api/v1/sessions/5f0c4a38-3f1e-4a47-9e55-1f2d3c4b5a69")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_pasted_job_text_is_analyzed_and_stored() {
        let app = app(ScriptedGenerator::new([r#"{"job_title": "Rust Engineer"}"#]));
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/job/text"),
                json!({"text": "Job Description: write Rust"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"job_title": "Rust Engineer"}));

        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, snapshot) = send(&app, request).await;
        assert_eq!(snapshot["job_description"], "Job Description: write Rust");
        assert_eq!(snapshot["job_analysis"]["job_title"], "Rust Engineer");
        assert_eq!(snapshot["cv_analysis"], Value::Null);
    }

    #[tokio::test]
    async fn test_suggestions_before_analyses_is_bad_request() {
        let app = app(ScriptedGenerator::default());
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(&format!("/api/v1/sessions/{id}/suggestions"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_as_bad_gateway() {
        let app = app(ScriptedGenerator::failing(
            crate::llm_client::LlmError::EmptyContent,
        ));
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/job/text"),
                json!({"text": "Requirements: Rust"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_delete_session_then_lookup_is_not_found() {
        let app = app(ScriptedGenerator::default());
        let id = create_session(&app).await;

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
