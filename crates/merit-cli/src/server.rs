//! HTTP surface for production plans.
//!
//! - `POST /productionplan`: request payload in, `[{"name", "power"}]` out;
//!   400 with `{"error": ...}` for undecodable or rejected requests
//! - `GET /health`: `{"ok": true}`

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    serve, Json, Router,
};
use merit_algo::DispatchPlanner;
use merit_io::{decode_request, plan_lines, ErrorBody};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Shared, read-only server state
#[derive(Debug, Clone)]
pub struct AppState {
    pub planner: DispatchPlanner,
}

impl AppState {
    pub fn new(planner: DispatchPlanner) -> Self {
        Self { planner }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/productionplan", post(production_plan))
        .route("/health", get(health))
        .layer(Extension(state))
}

/// Bind `addr` and serve until the process is stopped
pub async fn run(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "serving production plans");
    serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn production_plan(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let request = match decode_request(&body) {
        Ok(request) => request,
        Err(err) => {
            error!(error = %err, "rejected payload");
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(&err))).into_response();
        }
    };

    match state.planner.plan(&request) {
        Ok(solution) => {
            info!(
                units = solution.entries.len(),
                converged = solution.converged(),
                "production plan served"
            );
            (StatusCode::OK, Json(plan_lines(&solution.entries))).into_response()
        }
        Err(err) => {
            error!(error = %err, "production plan failed");
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(&err))).into_response()
        }
    }
}
