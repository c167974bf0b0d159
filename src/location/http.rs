use crate::error::{GeolocationError, Result};
use crate::location::traits::LocationProvider;
use crate::location::types::PositionOptions;
use crate::models::{DeviceLocation, LatLng};
use anyhow::Context as _;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Body returned by a network location endpoint
#[derive(Debug, Deserialize)]
struct PositionResponse {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
    #[serde(default)]
    accuracy: Option<f64>,
}

/// Location provider backed by an HTTP endpoint answering with JSON coordinates
pub struct HttpLocationProvider {
    client: Client,
    endpoint: String,
    last_fix: Mutex<Option<DeviceLocation>>,
}

impl HttpLocationProvider {
    /// Create a provider for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("housing-radar/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            last_fix: Mutex::new(None),
        })
    }

    /// Cached fix still within `maximum_age`, if reuse is allowed
    async fn cached_fix(&self, options: &PositionOptions) -> Option<DeviceLocation> {
        if options.maximum_age().is_zero() {
            return None;
        }
        let last = *self.last_fix.lock().await;
        match chrono::Duration::from_std(options.maximum_age()) {
            Ok(max_age) => last.filter(|fix| Utc::now() - fix.timestamp <= max_age),
            // past chrono's range: every cached fix is young enough
            Err(_) => last,
        }
    }

    fn classify(&self, err: reqwest::Error, options: &PositionOptions) -> GeolocationError {
        if err.is_timeout() {
            return GeolocationError::Timeout(options.timeout());
        }
        match err.status() {
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => GeolocationError::Denied,
            _ => GeolocationError::Unavailable(err.to_string()),
        }
    }
}

#[async_trait]
impl LocationProvider for HttpLocationProvider {
    async fn current_position(&self, options: &PositionOptions) -> Result<DeviceLocation> {
        if let Some(fix) = self.cached_fix(options).await {
            debug!("Reusing cached fix from {}", fix.timestamp);
            return Ok(fix);
        }

        info!("Requesting position from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("high_accuracy", options.enable_high_accuracy)])
            .timeout(options.timeout())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.classify(e, options))?;

        let body: PositionResponse = response
            .json()
            .await
            .map_err(|e| self.classify(e, options))?;

        let position = LatLng::new(body.latitude, body.longitude);
        if !position.is_finite() {
            warn!("Endpoint returned a non-finite position");
            return Err(GeolocationError::Unavailable(
                "endpoint returned a non-finite position".to_string(),
            ));
        }

        let fix = DeviceLocation {
            position,
            accuracy_m: body.accuracy,
            timestamp: Utc::now(),
        };
        *self.last_fix.lock().await = Some(fix);

        Ok(fix)
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}
