//! Main application orchestration.
//!
//! Coordinates all components:
//! - Instrument HTTP client
//! - Status, diagnostics and preview-frame synchronization
//! - Dashboard HTTP server

use std::future::Future;
use std::sync::Arc;

use jfmon_client::{HttpInstrumentClient, InstrumentApi};
use jfmon_core::PreviewEndpoint;
use jfmon_dashboard::{run_server, DashboardResult, DashboardState};
use jfmon_sync::{SyncSupervisor, ViewStateHandle};
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

type ServerHandle = JoinHandle<DashboardResult<()>>;

/// Main application.
pub struct Application {
    config: AppConfig,
    api: Arc<dyn InstrumentApi>,
    state: ViewStateHandle,
}

impl Application {
    /// Create a new application talking to the configured instrument.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = HttpInstrumentClient::new(&config.instrument)?;
        info!(status_url = %client.status_url(), "Instrument client ready");
        Self::with_api(config, Arc::new(client))
    }

    /// Create an application against any instrument implementation.
    pub fn with_api(config: AppConfig, api: Arc<dyn InstrumentApi>) -> AppResult<Self> {
        config.validate()?;
        let state = ViewStateHandle::new(config.sync.initial_state()?);
        Ok(Self { config, api, state })
    }

    /// Handle to the shared view state.
    pub fn state(&self) -> ViewStateHandle {
        self.state.clone()
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Run until `shutdown` completes or the dashboard server fails.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> AppResult<()> {
        info!(base_url = %self.config.instrument.base_url, "Starting application");

        let supervisor = SyncSupervisor::spawn(self.api.clone(), self.state.clone(), &self.config.sync);
        let cancel = supervisor.cancellation_token();

        let mut server = if self.config.dashboard.enabled {
            let dashboard = DashboardState::new(
                self.state.clone(),
                self.api.clone(),
                PreviewEndpoint::new(self.config.instrument.preview_base_url.clone()),
                self.config.instrument.title.clone(),
            );
            Some(tokio::spawn(run_server(
                dashboard,
                self.config.dashboard.clone(),
                cancel.clone(),
            )))
        } else {
            info!("Dashboard server disabled");
            None
        };

        let server_exit = tokio::select! {
            _ = shutdown => {
                info!("Shutdown signal received");
                None
            }
            Some(joined) = wait_server(server.as_mut()) => Some(joined),
        };

        supervisor.shutdown().await;

        let joined = match server_exit {
            Some(joined) => Some(joined),
            None => match server {
                Some(handle) => Some(handle.await),
                None => None,
            },
        };

        if let Some(joined) = joined {
            joined.map_err(|e| AppError::Task(e.to_string()))??;
        }

        info!("Shutdown complete");
        Ok(())
    }
}

async fn wait_server(handle: Option<&mut ServerHandle>) -> Option<Result<DashboardResult<()>, JoinError>> {
    match handle {
        Some(handle) => Some(handle.await),
        None => None,
    }
}
