//! Client for the JUNGFRAU instrument HTTP API.
//!
//! The synchronization drivers talk to the instrument through the
//! [`InstrumentApi`] trait:
//! - `HttpInstrumentClient`: reqwest-backed implementation
//! - `MockInstrumentApi`: scripted responses and call counters for tests

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use api::{BoxFuture, InstrumentApi};
pub use config::InstrumentConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpInstrumentClient;
pub use mock::{MockCallCounts, MockInstrumentApi};
