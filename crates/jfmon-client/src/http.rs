//! reqwest-backed instrument client.

use std::time::Duration;

use jfmon_core::{ResolutionProfile, SpotSequence, SpotsPerAngle, StatusPayload};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, trace};

use crate::api::{BoxFuture, InstrumentApi};
use crate::config::InstrumentConfig;
use crate::error::{ClientError, ClientResult};

/// Client for the instrument HTTP API.
#[derive(Debug, Clone)]
pub struct HttpInstrumentClient {
    client: Client,
    status_url: String,
    initialize_url: String,
    spot_sequence_url: String,
    spot_per_angle_url: String,
    spot_resolution_url: String,
}

impl HttpInstrumentClient {
    /// Create a new client from endpoint configuration.
    pub fn new(config: &InstrumentConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            status_url: config.url(&config.status_path),
            initialize_url: config.url(&config.initialize_path),
            spot_sequence_url: config.url(&config.spot_sequence_path),
            spot_per_angle_url: config.url(&config.spot_per_angle_path),
            spot_resolution_url: config.url(&config.spot_resolution_path),
        })
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    /// GET `url` and decode the JSON body.
    ///
    /// Non-2xx responses and undecodable bodies are errors.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        trace!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("GET {url}: {e}")))
    }
}

impl InstrumentApi for HttpInstrumentClient {
    fn fetch_status(&self) -> BoxFuture<'_, ClientResult<StatusPayload>> {
        Box::pin(async move { self.get_json(&self.status_url).await })
    }

    fn fetch_spot_sequence(&self) -> BoxFuture<'_, ClientResult<SpotSequence>> {
        Box::pin(async move { self.get_json(&self.spot_sequence_url).await })
    }

    fn fetch_spots_per_angle(&self) -> BoxFuture<'_, ClientResult<SpotsPerAngle>> {
        Box::pin(async move { self.get_json(&self.spot_per_angle_url).await })
    }

    fn fetch_resolution(&self) -> BoxFuture<'_, ClientResult<ResolutionProfile>> {
        Box::pin(async move { self.get_json(&self.spot_resolution_url).await })
    }

    fn send_initialize(&self) -> BoxFuture<'_, ClientResult<()>> {
        Box::pin(async move {
            info!(url = %self.initialize_url, "Sending initialize command");

            let response = self
                .client
                .put(&self.initialize_url)
                .send()
                .await
                .map_err(|e| ClientError::Transport(format!("PUT {}: {e}", self.initialize_url)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    body: String::new(),
                });
            }

            debug!(status = status.as_u16(), "Initialize command accepted");
            Ok(())
        })
    }
}
