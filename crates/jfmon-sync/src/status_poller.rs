//! Instrument status polling and link state.

use std::sync::Arc;

use chrono::Utc;
use jfmon_client::InstrumentApi;
use jfmon_core::{InstrumentStatus, LinkChange};
use jfmon_telemetry::{Metrics, PollOutcome, PollTask};
use tracing::{debug, info, warn};

use crate::state::ViewStateHandle;

/// Fetches the status document and owns the connected/disconnected link.
///
/// Transport and protocol failures are treated alike: the link goes down
/// and the last known status stays in place as stale.
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn InstrumentApi>,
    state: ViewStateHandle,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn InstrumentApi>, state: ViewStateHandle) -> Self {
        Self { api, state }
    }

    /// Issue one status request and apply its outcome.
    pub async fn poll_once(&self) -> LinkChange {
        let result = self.api.fetch_status().await;
        Metrics::poll(PollTask::Status, PollOutcome::from_ok(result.is_ok()));

        match result {
            Ok(payload) => {
                let status = InstrumentStatus::from_payload(&payload, Utc::now());
                let daq_state = status.daq_state.clone();
                let change = self.state.apply_status(status);
                if change == LinkChange::Established {
                    info!(daq_state = %daq_state, "Instrument connected");
                    Metrics::link_established();
                }
                change
            }
            Err(e) => {
                let change = self.state.apply_status_failure();
                if change == LinkChange::Lost {
                    warn!(error = %e, protocol = e.is_protocol(), "Instrument link lost");
                    Metrics::link_lost();
                } else {
                    debug!(error = %e, protocol = e.is_protocol(), "Status poll failed");
                }
                change
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jfmon_client::MockInstrumentApi;
    use jfmon_core::{StatusPayload, NOT_CONNECTED};
    use jfmon_telemetry::metrics::POLL_TOTAL;
    use serde_json::json;
    use tokio_test::block_on;

    fn payload(state: &str, frame_time: f64) -> StatusPayload {
        StatusPayload {
            state: Some(json!(state)),
            frame_time: Some(json!(frame_time)),
            pedestal_g0_mean: Some(json!([0, 1.5, 2, 3, 4, 5, 6, 7])),
            ..StatusPayload::default()
        }
    }

    fn setup() -> (Arc<MockInstrumentApi>, ViewStateHandle, StatusPoller) {
        let mock = Arc::new(MockInstrumentApi::new());
        let state = ViewStateHandle::default();
        let poller = StatusPoller::new(mock.clone(), state.clone());
        (mock, state, poller)
    }

    fn row(state: &ViewStateHandle, label: &str) -> Option<String> {
        state.read(|s| {
            s.parameters()
                .iter()
                .find(|r| r.label == label)
                .map(|r| r.value.clone())
        })
    }

    #[tokio::test]
    async fn test_unreachable_stays_disconnected() {
        let (_mock, state, poller) = setup();

        assert_eq!(poller.poll_once().await, LinkChange::Unchanged);
        assert!(!state.is_connected());
        assert_eq!(state.read(|s| s.daq_state().to_string()), NOT_CONNECTED);
    }

    #[tokio::test]
    async fn test_success_connects_and_replaces_rows() {
        let (mock, state, poller) = setup();

        mock.set_status(Some(payload("Idle", 0.0005)));
        assert_eq!(poller.poll_once().await, LinkChange::Established);
        assert_eq!(row(&state, "Frame time").as_deref(), Some("500 us"));

        mock.set_status(Some(payload("Measuring", 0.002)));
        assert_eq!(poller.poll_once().await, LinkChange::Unchanged);
        assert_eq!(state.read(|s| s.daq_state().to_string()), "Measuring");
        assert_eq!(row(&state, "Frame time").as_deref(), Some("2.00 ms"));
    }

    #[tokio::test]
    async fn test_failure_retains_last_known_values() {
        let (mock, state, poller) = setup();

        mock.set_status(Some(payload("Idle", 0.002)));
        poller.poll_once().await;
        let before = state.snapshot();

        mock.set_status(None);
        assert_eq!(poller.poll_once().await, LinkChange::Lost);
        assert!(!state.is_connected());

        let after = state.snapshot();
        assert_eq!(after.daq_state(), before.daq_state());
        assert_eq!(after.parameters(), before.parameters());
        assert_eq!(after.modules(), before.modules());

        // Further failures are not transitions.
        assert_eq!(poller.poll_once().await, LinkChange::Unchanged);
        assert_eq!(state.snapshot().parameters(), before.parameters());
    }

    #[tokio::test]
    async fn test_reconnect_after_loss() {
        let (mock, state, poller) = setup();

        mock.set_status(Some(payload("Idle", 0.002)));
        poller.poll_once().await;
        mock.set_status(None);
        poller.poll_once().await;

        mock.set_status(Some(payload("Pedestal", 0.001)));
        assert_eq!(poller.poll_once().await, LinkChange::Established);
        assert!(state.is_connected());
        assert_eq!(row(&state, "Frame time").as_deref(), Some("1.00 ms"));
    }

    #[test]
    fn test_each_poll_is_counted_by_outcome() {
        let (mock, _state, poller) = setup();
        let count = |outcome: &str| POLL_TOTAL.with_label_values(&["status", outcome]).get();

        let failures = count("failure");
        block_on(poller.poll_once());
        assert!(count("failure") - failures >= 1.0);

        let successes = count("success");
        mock.set_status(Some(payload("Idle", 0.002)));
        assert_eq!(block_on(poller.poll_once()), LinkChange::Established);
        assert!(count("success") - successes >= 1.0);
    }
}
