//! Runs the three drivers on their own schedules and tears them down together.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use jfmon_client::InstrumentApi;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::diagnostics_poller::DiagnosticsPoller;
use crate::error::SyncResult;
use crate::image_driver::ImageCycleDriver;
use crate::state::ViewStateHandle;
use crate::status_poller::StatusPoller;

/// Owner of the running synchronization tasks.
pub struct SyncSupervisor {
    state: ViewStateHandle,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl SyncSupervisor {
    /// Validate `config`, build the initial view state and start all tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(api: Arc<dyn InstrumentApi>, config: &SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let state = ViewStateHandle::new(config.initial_state()?);
        Ok(Self::spawn(api, state, config))
    }

    /// Start all tasks against an existing state handle.
    pub fn spawn(api: Arc<dyn InstrumentApi>, state: ViewStateHandle, config: &SyncConfig) -> Self {
        let cancel = CancellationToken::new();

        let status = StatusPoller::new(api.clone(), state.clone());
        let diagnostics = DiagnosticsPoller::new(api, state.clone());
        let images = ImageCycleDriver::new(state.clone());

        info!(
            status_ms = config.status_interval_ms,
            sequence_ms = config.sequence_interval_ms,
            image_ms = config.image_interval_ms,
            "Starting synchronization tasks"
        );

        let handles = vec![
            tokio::spawn(run_requests(
                "status",
                config.status_interval(),
                cancel.clone(),
                move || {
                    let status = status.clone();
                    async move {
                        status.poll_once().await;
                    }
                },
            )),
            tokio::spawn(run_requests(
                "diagnostics",
                config.sequence_interval(),
                cancel.clone(),
                move || {
                    let diagnostics = diagnostics.clone();
                    async move {
                        diagnostics.check_once().await;
                    }
                },
            )),
            tokio::spawn(run_image_cycle(
                config.image_interval(),
                cancel.clone(),
                images,
            )),
        ];

        Self {
            state,
            cancel,
            handles,
        }
    }

    pub fn state(&self) -> &ViewStateHandle {
        &self.state
    }

    /// Token that stops every task when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancel all tasks, including in-flight requests, and wait for the
    /// schedulers to exit.
    pub async fn shutdown(mut self) {
        info!("Stopping synchronization tasks");
        self.cancel.cancel();
        for handle in std::mem::take(&mut self.handles) {
            let _ = handle.await;
        }
    }
}

impl Drop for SyncSupervisor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Fire `request` on every tick without waiting for earlier ones.
///
/// Requests run as their own tasks so a hung call never delays the
/// schedule; they are dropped at their next await once `cancel` fires.
async fn run_requests<F, Fut>(
    task: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut request: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(task, "Scheduler stopped");
                break;
            }
            _ = ticker.tick() => {
                let in_flight = request();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = in_flight => {}
                    }
                });
            }
        }
    }
}

/// Advance the preview frame once per period, starting one period in.
async fn run_image_cycle(period: Duration, cancel: CancellationToken, driver: ImageCycleDriver) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(task = "image", "Scheduler stopped");
                break;
            }
            _ = ticker.tick() => {
                driver.tick();
            }
        }
    }
}
