//! AI gateway route handler.
//!
//! The single `/api/gateway` endpoint. All the interesting work happens in
//! `services::gateway`; this module does HTTP: extract the request, run the
//! dispatch, and map errors onto status codes with the shared `{error}`
//! body. Upstream failure details are logged by the service and never
//! reach the client.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ErrorResponse;
use crate::services::{GatewayError, GatewayReply, GatewayRequest, GatewayService};
use crate::state::AppState;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidAction(_) | Self::InvalidPayload { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI features are not configured".to_string(),
            ),
            Self::NoImageReturned => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The edit did not return an image".to_string(),
            ),
            // Opaque on purpose: the upstream error was already logged with
            // the action name by the dispatch.
            Self::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The assistant could not complete the request".to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Dispatch one gateway action.
///
/// POST /api/gateway
pub async fn handle(
    State(state): State<AppState>,
    Json(request): Json<GatewayRequest>,
) -> Result<Json<GatewayReply>, GatewayError> {
    let service = GatewayService::new(state.gemini(), state.catalog());
    let reply = service.dispatch(request).await?;
    Ok(Json(reply))
}
