//! HTTP server implementation using axum.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, put};
use axum::Router;
use jfmon_core::{DashboardView, DisplayControls};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::state::DashboardState;
use crate::types::{ContrastRequest, DashboardSnapshot, ToggleRequest};

/// Create the axum router.
pub fn create_router(state: DashboardState, config: &DashboardConfig) -> Router {
    let router = Router::new()
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/view", get(get_view))
        .route("/api/controls/contrast", put(put_contrast))
        .route("/api/controls/logarithmic", put(put_logarithmic))
        .route("/api/controls/expert_mode", put(put_expert_mode))
        .route("/api/command/initialize", put(put_initialize))
        .route("/metrics", get(get_metrics))
        .with_state(state);

    if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Get current state snapshot as JSON.
async fn get_snapshot(State(state): State<DashboardState>) -> Json<DashboardSnapshot> {
    Json(state.collect_snapshot())
}

async fn get_view(State(state): State<DashboardState>) -> Json<DashboardView> {
    Json(state.view())
}

async fn put_contrast(
    State(state): State<DashboardState>,
    Json(request): Json<ContrastRequest>,
) -> Result<Json<DisplayControls>, Response> {
    state
        .set_contrast(request.contrast)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())
}

async fn put_logarithmic(
    State(state): State<DashboardState>,
    Json(request): Json<ToggleRequest>,
) -> Json<DisplayControls> {
    debug!(enabled = request.enabled, "Logarithmic preview toggled");
    Json(state.set_logarithmic(request.enabled))
}

async fn put_expert_mode(
    State(state): State<DashboardState>,
    Json(request): Json<ToggleRequest>,
) -> Json<DisplayControls> {
    debug!(enabled = request.enabled, "Expert mode toggled");
    Json(state.set_expert_mode(request.enabled))
}

/// Fire-and-forget: accepted before the instrument has answered.
async fn put_initialize(State(state): State<DashboardState>) -> StatusCode {
    state.trigger_initialize();
    StatusCode::ACCEPTED
}

async fn get_metrics() -> Response {
    match jfmon_telemetry::encode_metrics() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Run the dashboard HTTP server until `shutdown` is cancelled.
pub async fn run_server(
    state: DashboardState,
    config: DashboardConfig,
    shutdown: CancellationToken,
) -> DashboardResult<()> {
    let app = create_router(state, &config);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| DashboardError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(addr = %addr, "Starting dashboard server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}
