//! Bodega Digital Storefront library.
//!
//! This crate provides the storefront functionality as a library, allowing
//! the router to be exercised in tests and reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod gemini;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use error::ErrorResponse;
use state::AppState;

/// Build the full application router.
///
/// Everything except the Sentry tower layers, which the binary adds on the
/// outside so tests don't need a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .method_not_allowed_fallback(method_not_allowed)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::create_session_layer())
        .layer(TraceLayer::new_for_http())
        // The browser storefront is served from a separate origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Known path, wrong verb. The wire contract promises a JSON `{error}`
/// body even for 405s, so the default empty fallback is replaced.
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("method not allowed")),
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use tower::util::ServiceExt;

    use crate::catalog::Catalog;
    use crate::config::StorefrontConfig;
    use crate::state::AppState;

    use super::*;

    fn test_state() -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("ip"),
            port: 0,
            catalog_path: PathBuf::new(),
            whatsapp_number: "584121234567".to_string(),
            gemini: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let catalog = Catalog::from_json(r#"{ "products": [], "combos": [] }"#).expect("catalog");
        AppState::new(config, catalog)
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_gateway_get_is_405_with_error_body() {
        let response = app(test_state())
            .oneshot(
                Request::get("/api/gateway")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_gateway_bogus_action_is_400() {
        let response = app(test_state())
            .oneshot(
                Request::post("/api/gateway")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "action": "bogus", "payload": {} }"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert!(
            body["error"]
                .as_str()
                .expect("error string")
                .contains("bogus")
        );
    }
}
