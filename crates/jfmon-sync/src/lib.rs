//! Synchronization drivers for the JUNGFRAU status dashboard.
//!
//! Three independently scheduled tasks keep one shared [`ViewStateHandle`]
//! up to date:
//!
//! - [`StatusPoller`]: instrument status and the connected/disconnected link
//! - [`DiagnosticsPoller`]: spot-finding series, refetched only when the
//!   server sequence counter changes
//! - [`ImageCycleDriver`]: wrapping preview frame counter
//!
//! [`SyncSupervisor`] runs all three and cancels them together.
//!
//! # Architecture
//!
//! ```text
//!  status tick ──────► StatusPoller ───────┐
//!  sequence tick ────► DiagnosticsPoller ──┼──► ViewStateHandle ──► presentation
//!  image tick ───────► ImageCycleDriver ───┘     (RwLock<ViewState>)
//! ```
//!
//! Network ticks spawn their request without waiting for the previous one;
//! a slow response simply lands later and the last write wins.

pub mod config;
pub mod diagnostics_poller;
pub mod error;
pub mod image_driver;
pub mod state;
pub mod status_poller;
pub mod supervisor;

pub use config::SyncConfig;
pub use diagnostics_poller::{DiagnosticsOutcome, DiagnosticsPoller};
pub use error::{SyncError, SyncResult};
pub use image_driver::ImageCycleDriver;
pub use state::ViewStateHandle;
pub use status_poller::StatusPoller;
pub use supervisor::SyncSupervisor;
