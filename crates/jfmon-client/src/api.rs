//! Instrument API abstraction.

use std::pin::Pin;

use jfmon_core::{ResolutionProfile, SpotSequence, SpotsPerAngle, StatusPayload};

use crate::error::ClientResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Operations the dashboard performs against the instrument.
///
/// Implementations must be shareable across the polling tasks.
pub trait InstrumentApi: Send + Sync {
    /// GET the status document.
    fn fetch_status(&self) -> BoxFuture<'_, ClientResult<StatusPayload>>;

    /// GET the spot-finding sequence counter.
    fn fetch_spot_sequence(&self) -> BoxFuture<'_, ClientResult<SpotSequence>>;

    /// GET the per-angle spot counts.
    fn fetch_spots_per_angle(&self) -> BoxFuture<'_, ClientResult<SpotsPerAngle>>;

    /// GET the resolution-vs-intensity profile.
    fn fetch_resolution(&self) -> BoxFuture<'_, ClientResult<ResolutionProfile>>;

    /// PUT the re-initialization command. No response body is read.
    fn send_initialize(&self) -> BoxFuture<'_, ClientResult<()>>;
}
