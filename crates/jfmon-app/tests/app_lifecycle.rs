//! Application lifecycle against an in-process mock instrument.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use jfmon_app::{AppConfig, AppError, Application};
use jfmon_client::MockInstrumentApi;
use jfmon_sync::ViewStateHandle;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::{sleep, timeout};

async fn start_instrument(up: Arc<AtomicBool>) -> SocketAddr {
    let router = Router::new()
        .route(
            "/jf/",
            get(move || {
                let up = up.clone();
                async move {
                    if up.load(Ordering::SeqCst) {
                        Json(json!({"state": "Idle", "frame_time": 0.002})).into_response()
                    } else {
                        StatusCode::SERVICE_UNAVAILABLE.into_response()
                    }
                }
            }),
        )
        .route("/jf/spot/sequence", get(|| async { Json(json!({"sequence": 3})) }))
        .route("/jf/spot/per_angle", get(|| async { Json(json!({"count": [2, 4]})) }))
        .route(
            "/jf/spot/resolution",
            get(|| async { Json(json!({"one_over_d2": [0.05], "log_meanI": [1.5]})) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn fast_config(base_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.instrument.base_url = base_url;
    config.instrument.request_timeout_ms = Some(1_000);
    config.sync.status_interval_ms = 20;
    config.sync.sequence_interval_ms = 20;
    config.sync.image_interval_ms = 20;
    config.dashboard.enabled = false;
    config
}

async fn wait_for(state: &ViewStateHandle, what: &str, check: impl Fn(&ViewStateHandle) -> bool) {
    let reached = timeout(Duration::from_secs(3), async {
        while !check(state) {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "Timed out waiting for {what}");
}

#[tokio::test]
async fn test_connects_once_instrument_comes_up() {
    let up = Arc::new(AtomicBool::new(false));
    let addr = start_instrument(up.clone()).await;

    let app = Application::new(fast_config(format!("http://{addr}/jf"))).unwrap();
    let state = app.state();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let running = tokio::spawn(app.run_until(async {
        let _ = stop_rx.await;
    }));

    wait_for(&state, "diagnostics", |s| {
        s.read(|v| v.diagnostics().resolution_series.len() == 1)
    })
    .await;
    assert!(!state.is_connected());

    up.store(true, Ordering::SeqCst);
    wait_for(&state, "connection", |s| s.is_connected()).await;
    assert_eq!(state.read(|s| s.daq_state().to_string()), "Idle");
    assert_eq!(
        state.snapshot().diagnostics().spots_per_angle,
        vec![2.0, 4.0]
    );

    up.store(false, Ordering::SeqCst);
    wait_for(&state, "link loss", |s| !s.is_connected()).await;
    assert_eq!(state.read(|s| s.daq_state().to_string()), "Idle");

    stop_tx.send(()).unwrap();
    let result = timeout(Duration::from_secs(2), running).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_dashboard_bind_failure_stops_application() {
    let mut config = fast_config("http://127.0.0.1:9/jf".to_string());
    config.dashboard.enabled = true;
    config.dashboard.bind_address = "256.0.0.1".to_string();

    let app = Application::with_api(config, Arc::new(MockInstrumentApi::new())).unwrap();
    let result = timeout(
        Duration::from_secs(2),
        app.run_until(std::future::pending::<()>()),
    )
    .await
    .expect("application should stop when the dashboard cannot bind");

    assert!(matches!(result, Err(AppError::Dashboard(_))));
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let mut config = fast_config("http://127.0.0.1:9/jf".to_string());
    config.sync.status_interval_ms = 0;

    let result = Application::with_api(config, Arc::new(MockInstrumentApi::new()));
    assert!(matches!(result, Err(AppError::Sync(_))));
}
