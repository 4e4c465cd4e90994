//! HTTP handlers for the PCBuilderAI server

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::types::{ErrorResponse, GraphInfo, InvokeRequest, InvokeResponse};
use pcbuilder::{ExperienceLevel, Graph, PcBuilderError};

/// Shared server state
pub struct AppState {
    pub graph: Graph,
    pub model: String,
}

/// Map a failed run to an HTTP status and error type
fn error_status(e: &PcBuilderError) -> (StatusCode, &'static str) {
    if e.is_provider() {
        (StatusCode::BAD_GATEWAY, "provider_error")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
    }
}

/// Handler for POST /invoke
pub async fn invoke(State(state): State<Arc<AppState>>, Json(req): Json<InvokeRequest>) -> Response {
    let run_id = format!("run-{}", Uuid::new_v4());

    match state.graph.invoke(&req.input, &req.config).await {
        Ok(output) => (StatusCode::OK, Json(InvokeResponse { run_id, output })).into_response(),
        Err(e) => {
            let (status, error_type) = error_status(&e);
            tracing::warn!(%run_id, error = %e, "invocation failed");
            (status, Json(ErrorResponse::new(e.to_string(), error_type))).into_response()
        }
    }
}

/// Handler for GET /info
pub async fn info(State(state): State<Arc<AppState>>) -> Json<GraphInfo> {
    Json(GraphInfo {
        name: state.graph.name().to_string(),
        nodes: state.graph.nodes().iter().map(|n| n.to_string()).collect(),
        model: state.model.clone(),
        experience_levels: ExperienceLevel::ALL
            .iter()
            .map(|l| l.as_str().to_string())
            .collect(),
        default_experience: ExperienceLevel::default().as_str().to_string(),
    })
}
