//! Mock instrument for testing.
//!
//! Each endpoint returns a scripted value; `None` makes the call fail the
//! way an unreachable server would. Every call is counted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use jfmon_core::{ResolutionProfile, SpotSequence, SpotsPerAngle, StatusPayload};
use parking_lot::Mutex;

use crate::api::{BoxFuture, InstrumentApi};
use crate::error::{ClientError, ClientResult};

/// Number of calls made to each endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockCallCounts {
    pub status: usize,
    pub spot_sequence: usize,
    pub spots_per_angle: usize,
    pub resolution: usize,
    pub initialize: usize,
}

#[derive(Debug, Default)]
struct Counters {
    status: AtomicUsize,
    spot_sequence: AtomicUsize,
    spots_per_angle: AtomicUsize,
    resolution: AtomicUsize,
    initialize: AtomicUsize,
}

/// Scripted in-memory instrument.
#[derive(Debug, Default)]
pub struct MockInstrumentApi {
    status: Mutex<Option<StatusPayload>>,
    status_delay: Mutex<Option<Duration>>,
    sequence: Mutex<Option<i64>>,
    spots_per_angle: Mutex<Option<SpotsPerAngle>>,
    resolution: Mutex<Option<ResolutionProfile>>,
    initialize_ok: Mutex<bool>,
    counters: Counters,
}

impl MockInstrumentApi {
    /// Create a mock where every endpoint fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status payload (`None` = unreachable).
    pub fn set_status(&self, payload: Option<StatusPayload>) {
        *self.status.lock() = payload;
    }

    /// Delay every status response by `delay`.
    pub fn set_status_delay(&self, delay: Option<Duration>) {
        *self.status_delay.lock() = delay;
    }

    /// Set the spot sequence (`None` = unreachable).
    pub fn set_sequence(&self, sequence: Option<i64>) {
        *self.sequence.lock() = sequence;
    }

    pub fn set_spots_per_angle(&self, spots: Option<SpotsPerAngle>) {
        *self.spots_per_angle.lock() = spots;
    }

    pub fn set_resolution(&self, profile: Option<ResolutionProfile>) {
        *self.resolution.lock() = profile;
    }

    pub fn set_initialize_ok(&self, ok: bool) {
        *self.initialize_ok.lock() = ok;
    }

    /// Snapshot of call counts.
    pub fn calls(&self) -> MockCallCounts {
        MockCallCounts {
            status: self.counters.status.load(Ordering::SeqCst),
            spot_sequence: self.counters.spot_sequence.load(Ordering::SeqCst),
            spots_per_angle: self.counters.spots_per_angle.load(Ordering::SeqCst),
            resolution: self.counters.resolution.load(Ordering::SeqCst),
            initialize: self.counters.initialize.load(Ordering::SeqCst),
        }
    }
}

fn scripted<T: Clone>(slot: &Mutex<Option<T>>, endpoint: &str) -> ClientResult<T> {
    slot.lock()
        .clone()
        .ok_or_else(|| ClientError::Mock(format!("{endpoint} unavailable")))
}

impl InstrumentApi for MockInstrumentApi {
    fn fetch_status(&self) -> BoxFuture<'_, ClientResult<StatusPayload>> {
        Box::pin(async move {
            self.counters.status.fetch_add(1, Ordering::SeqCst);
            let delay = *self.status_delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            scripted(&self.status, "status")
        })
    }

    fn fetch_spot_sequence(&self) -> BoxFuture<'_, ClientResult<SpotSequence>> {
        Box::pin(async move {
            self.counters.spot_sequence.fetch_add(1, Ordering::SeqCst);
            scripted(&self.sequence, "spot sequence").map(|sequence| SpotSequence { sequence })
        })
    }

    fn fetch_spots_per_angle(&self) -> BoxFuture<'_, ClientResult<SpotsPerAngle>> {
        Box::pin(async move {
            self.counters.spots_per_angle.fetch_add(1, Ordering::SeqCst);
            scripted(&self.spots_per_angle, "spots per angle")
        })
    }

    fn fetch_resolution(&self) -> BoxFuture<'_, ClientResult<ResolutionProfile>> {
        Box::pin(async move {
            self.counters.resolution.fetch_add(1, Ordering::SeqCst);
            scripted(&self.resolution, "resolution")
        })
    }

    fn send_initialize(&self) -> BoxFuture<'_, ClientResult<()>> {
        Box::pin(async move {
            self.counters.initialize.fetch_add(1, Ordering::SeqCst);
            if *self.initialize_ok.lock() {
                Ok(())
            } else {
                Err(ClientError::Mock("initialize rejected".to_string()))
            }
        })
    }
}
