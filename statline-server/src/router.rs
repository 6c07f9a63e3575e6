use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::router())
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/metrics", get(api::metrics::get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::build_router;
    use crate::test_helpers::test_app_state;

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).expect("request");
        build_router(test_app_state()).oneshot(request).await.expect("infallible").status()
    }

    #[tokio::test]
    async fn test_routes() {
        assert_eq!(status_of("GET", "/healthz").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/api/status").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/api/report").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("GET", "/api/leagues/mlb").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/api/health/mlb/backup").await, StatusCode::OK);
        assert_eq!(status_of("GET", "/api/no-such-route").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("GET", "/metrics").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_manual_sync_returns_report() {
        let request =
            Request::builder().method("POST").uri("/api/sync").body(Body::empty()).expect("request");
        let response = build_router(test_app_state()).oneshot(request).await.expect("infallible");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let report: serde_json::Value = serde_json::from_slice(&body).expect("json report");
        assert_eq!(report["success_count"], 1);
        assert_eq!(report["failure_count"], 1);
    }
}
