//! Sequence-gated spot-finding diagnostics.
//!
//! The server bumps a sequence counter whenever it recomputes its spot
//! statistics. Each tick fetches only that counter; the two larger series
//! are fetched when the counter differs from the last observed value.

use std::sync::Arc;

use jfmon_client::{ClientResult, InstrumentApi};
use jfmon_telemetry::{Metrics, PollOutcome, PollTask};
use tracing::{debug, trace};

use crate::state::ViewStateHandle;

const SERIES_PER_ANGLE: &str = "per_angle";
const SERIES_RESOLUTION: &str = "resolution";

/// What one diagnostics tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsOutcome {
    /// The sequence check failed; nothing was touched.
    SequenceUnavailable,
    /// Same sequence as last time; no series fetched.
    Unchanged { sequence: i64 },
    /// Sequence changed; each flag is whether that series was replaced.
    Refreshed {
        sequence: i64,
        spots_per_angle: bool,
        resolution: bool,
    },
}

#[derive(Clone)]
pub struct DiagnosticsPoller {
    api: Arc<dyn InstrumentApi>,
    state: ViewStateHandle,
}

impl DiagnosticsPoller {
    pub fn new(api: Arc<dyn InstrumentApi>, state: ViewStateHandle) -> Self {
        Self { api, state }
    }

    /// Check the sequence and refetch both series if it changed.
    ///
    /// The two series fetches run concurrently and are applied
    /// independently; a failed one stays stale until the next change.
    pub async fn check_once(&self) -> DiagnosticsOutcome {
        let sequence = match self.api.fetch_spot_sequence().await {
            Ok(s) => s.sequence,
            Err(e) => {
                debug!(error = %e, protocol = e.is_protocol(), "Spot sequence check failed");
                Metrics::poll(PollTask::Sequence, PollOutcome::Failure);
                return DiagnosticsOutcome::SequenceUnavailable;
            }
        };
        Metrics::poll(PollTask::Sequence, PollOutcome::Success);

        if !self.state.observe_sequence(sequence) {
            trace!(sequence, "Spot sequence unchanged");
            return DiagnosticsOutcome::Unchanged { sequence };
        }

        debug!(sequence, "Spot sequence changed, refreshing diagnostics");
        Metrics::sequence_changed();

        let (spots_per_angle, resolution) =
            tokio::join!(self.refresh_spots_per_angle(), self.refresh_resolution());

        DiagnosticsOutcome::Refreshed {
            sequence,
            spots_per_angle,
            resolution,
        }
    }

    async fn refresh_spots_per_angle(&self) -> bool {
        let result = self.api.fetch_spots_per_angle().await;
        self.apply(SERIES_PER_ANGLE, result, |state, spots| {
            state.replace_spots_per_angle(spots.count);
            Ok(())
        })
    }

    async fn refresh_resolution(&self) -> bool {
        let result = self.api.fetch_resolution().await;
        self.apply(SERIES_RESOLUTION, result, |state, profile| {
            state.replace_resolution_series(profile.into_points()?);
            Ok(())
        })
    }

    fn apply<T>(
        &self,
        series: &'static str,
        result: ClientResult<T>,
        replace: impl FnOnce(&ViewStateHandle, T) -> ClientResult<()>,
    ) -> bool {
        let applied = result.and_then(|value| replace(&self.state, value));
        Metrics::diagnostics_fetch(series, PollOutcome::from_ok(applied.is_ok()));

        if let Err(e) = &applied {
            debug!(
                series,
                error = %e,
                protocol = e.is_protocol(),
                "Diagnostics fetch failed, keeping previous series"
            );
        }
        applied.is_ok()
    }
}
