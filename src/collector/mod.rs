pub mod rf;

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::artifact::{self, Artifact};
use crate::config::ControllerConfig;
use crate::error::CollectError;

/// Length of the trailing window for the hourly historical report, in seconds.
const HISTORY_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

/// An authenticated session against one UniFi controller site.
///
/// Created once per collection run by [`Collector::connect`]. The underlying
/// client carries the controller's session cookie and is used read-only by
/// every fetch; the whole run is sequential, one request at a time.
#[derive(Debug)]
pub struct Collector {
    client: reqwest::Client,
    base_url: String,
    site: String,
}

impl Collector {
    /// Open a session and log in to the controller.
    ///
    /// Fails with [`CollectError::Authentication`] on any transport error or
    /// non-success login status. Nothing is written to disk before this
    /// succeeds.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, CollectError> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for the controller connection");
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(CollectError::Authentication)?;

        let base_url = format!("https://{}", config.url);
        let login = serde_json::json!({
            "username": config.username,
            "password": config.password,
        });

        debug!(url = %base_url, site = %config.site, "Connecting to UniFi controller");
        client
            .post(format!("{}/api/auth/login", base_url))
            .json(&login)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| {
                error!(error = %e, "Controller login failed");
                CollectError::Authentication(e)
            })?;
        debug!("Controller login succeeded");

        Ok(Self {
            client,
            base_url,
            site: config.site.clone(),
        })
    }

    /// Site-scoped API URL for `path` (relative, no leading slash).
    fn site_url(&self, path: &str) -> String {
        format!("{}/proxy/network/api/s/{}/{}", self.base_url, self.site, path)
    }

    /// Fetch one site-scoped resource and return its `data` payload.
    ///
    /// Transport failures and non-success statuses are [`CollectError::Fetch`];
    /// a body that is not JSON or lacks the `data` envelope is
    /// [`CollectError::MalformedResponse`].
    async fn fetch(
        &self,
        resource: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, CollectError> {
        debug!(resource, path, "Fetching resource");

        let resp = self
            .client
            .get(self.site_url(path))
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| {
                error!(resource, status = ?source.status(), error = %source, "Resource fetch failed");
                CollectError::Fetch { resource, source }
            })?;

        let text = resp.text().await.map_err(|source| {
            error!(resource, error = %source, "Failed to read response body");
            CollectError::Fetch { resource, source }
        })?;

        decode_body(resource, &text)
    }

    /// Run one full collection pass, writing all seven artifacts to `out_dir`.
    ///
    /// Every fetch except the per-AP spectrum scans is all-or-nothing: the
    /// first failure aborts the run and propagates to the caller.
    pub async fn collect_all(&self, out_dir: &Path) -> Result<()> {
        info!("Starting data collection");

        // The device list is fetched once and reused for the RF step so
        // device_config.json and rf_environment.json reflect the same snapshot.
        let devices = self.fetch("devices", "stat/device", &[]).await?;
        artifact::write(out_dir, Artifact::DeviceConfig, &devices).await?;

        let performance = self
            .fetch("daily site stats", "stat/report/daily.site", &[])
            .await?;
        artifact::write(out_dir, Artifact::PerformanceData, &performance).await?;

        let wlans = self.fetch("WLAN configuration", "rest/wlanconf", &[]).await?;
        artifact::write(out_dir, Artifact::WifiScans, &wlans).await?;

        let clients = self.fetch("client devices", "stat/sta", &[]).await?;
        artifact::write(out_dir, Artifact::ClientDevices, &clients).await?;

        let health = self.fetch("site health", "stat/health", &[]).await?;
        artifact::write(out_dir, Artifact::ChannelUtilization, &health).await?;

        let rf_map = self.rf_environment(&devices).await?;
        artifact::write(out_dir, Artifact::RfEnvironment, &Value::Object(rf_map)).await?;

        let (start, end) = history_window(Utc::now().timestamp());
        let history = self
            .fetch(
                "hourly site stats",
                "stat/report/hourly.site",
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await?;
        artifact::write(out_dir, Artifact::HistoricalData, &history).await?;

        info!("Data collection completed");
        Ok(())
    }
}

/// Decode a controller response body and pull out its `data` payload.
/// Anything that is not JSON carrying a `data` field is malformed.
fn decode_body(resource: &'static str, text: &str) -> Result<Value, CollectError> {
    let body: Value = serde_json::from_str(text).map_err(|e| {
        error!(resource, error = %e, "Response body is not valid JSON");
        CollectError::MalformedResponse { resource }
    })?;

    extract_data(resource, body)
}

/// Pull the `data` field out of a controller response envelope.
fn extract_data(resource: &'static str, mut body: Value) -> Result<Value, CollectError> {
    match body.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => {
            error!(resource, "Response body has no `data` field");
            Err(CollectError::MalformedResponse { resource })
        }
    }
}

/// Trailing 7-day window ending at `end` (epoch seconds).
fn history_window(end: i64) -> (i64, i64) {
    (end - HISTORY_WINDOW_SECS, end)
}
