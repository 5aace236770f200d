//! Prometheus metrics for the status dashboard.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on duplicate
//! metric names, which is a programming error caught at first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_int_counter, register_int_gauge, CounterVec,
    Encoder, Gauge, IntCounter, IntGauge, TextEncoder,
};

use crate::error::TelemetryResult;

/// Instrument link state (1 = connected, 0 = disconnected).
pub static INSTRUMENT_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "jfmon_instrument_connected",
        "Instrument status endpoint reachable (1=connected)"
    )
    .unwrap()
});

/// Poll attempts by task and outcome.
pub static POLL_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "jfmon_poll_total",
        "Total poll attempts",
        &["task", "outcome"]
    )
    .unwrap()
});

/// Diagnostics series fetches by series and outcome.
pub static DIAGNOSTICS_FETCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "jfmon_diagnostics_fetch_total",
        "Total diagnostics series fetches",
        &["series", "outcome"]
    )
    .unwrap()
});

/// Observed spot sequence changes.
pub static SEQUENCE_CHANGES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "jfmon_sequence_changes_total",
        "Spot sequence changes that triggered a diagnostics refetch"
    )
    .unwrap()
});

/// Link transitions by target state.
pub static LINK_TRANSITIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "jfmon_link_transitions_total",
        "Instrument link state transitions",
        &["to"]
    )
    .unwrap()
});

/// Current preview frame index.
pub static FRAME_INDEX: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("jfmon_frame_index", "Current preview frame index").unwrap()
});

/// Initialize commands sent, by outcome.
pub static INITIALIZE_COMMANDS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "jfmon_initialize_commands_total",
        "Instrument initialize commands sent",
        &["outcome"]
    )
    .unwrap()
});

/// Periodic task issuing network requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTask {
    Status,
    Sequence,
}

impl PollTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollTask::Status => "status",
            PollTask::Sequence => "sequence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Success,
    Failure,
}

impl PollOutcome {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            PollOutcome::Success
        } else {
            PollOutcome::Failure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Success => "success",
            PollOutcome::Failure => "failure",
        }
    }
}

/// Metrics helper.
pub struct Metrics;

impl Metrics {
    pub fn poll(task: PollTask, outcome: PollOutcome) {
        POLL_TOTAL
            .with_label_values(&[task.as_str(), outcome.as_str()])
            .inc();
    }

    /// Record the link becoming reachable.
    pub fn link_established() {
        INSTRUMENT_CONNECTED.set(1.0);
        LINK_TRANSITIONS_TOTAL.with_label_values(&["connected"]).inc();
    }

    /// Record the link being lost.
    pub fn link_lost() {
        INSTRUMENT_CONNECTED.set(0.0);
        LINK_TRANSITIONS_TOTAL
            .with_label_values(&["disconnected"])
            .inc();
    }

    pub fn sequence_changed() {
        SEQUENCE_CHANGES_TOTAL.inc();
    }

    /// Record a diagnostics series fetch (`series` = "per_angle" | "resolution").
    pub fn diagnostics_fetch(series: &str, outcome: PollOutcome) {
        DIAGNOSTICS_FETCH_TOTAL
            .with_label_values(&[series, outcome.as_str()])
            .inc();
    }

    pub fn frame_index(index: u64) {
        FRAME_INDEX.set(i64::try_from(index).unwrap_or(i64::MAX));
    }

    pub fn initialize_command(outcome: PollOutcome) {
        INITIALIZE_COMMANDS_TOTAL
            .with_label_values(&[outcome.as_str()])
            .inc();
    }
}

/// Render all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> TelemetryResult<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
