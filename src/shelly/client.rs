//! Shelly HTTP RPC Client
//!
//! Issues `GET http://{host}/rpc/Shelly.GetStatus` against a device and decodes the
//! primary switch into a [`TelemetrySnapshot`].
//!
//! # Example
//!
//! ```no_run
//! use shelly_exporter::config::Device;
//! use shelly_exporter::shelly::ShellyClient;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ShellyClient::new(Duration::from_secs(5))?;
//! let device = Device::new("desk", "10.0.0.5").with_credentials("admin", "secret");
//! let snapshot = client.fetch_status(&device).await?;
//! println!("{} W", snapshot.power_watts);
//! # Ok(())
//! # }
//! ```

use crate::config::Device;
use crate::error::{FetchError, Result};
use crate::shelly::types::{ShellyStatus, TelemetrySnapshot};
use std::time::Duration;

const STATUS_PATH: &str = "/rpc/Shelly.GetStatus";

/// Client for the Shelly Gen2 RPC API
///
/// Wraps a pooled `reqwest::Client` with the request timeout baked in. Cloning is cheap
/// and every clone shares the same connection pool, so one instance is handed to all
/// fetch tasks.
#[derive(Debug, Clone)]
pub struct ShellyClient {
    http: reqwest::Client,
}

impl ShellyClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        // Plugs live on the local network; never route them through a system proxy
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .user_agent(concat!("shelly-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }

    /// Perform one status round trip against `device`
    ///
    /// Basic auth is attached only when both username and password are non-empty.
    /// The whole exchange, body included, is bounded by the client timeout.
    pub async fn fetch_status(
        &self,
        device: &Device,
    ) -> std::result::Result<TelemetrySnapshot, FetchError> {
        let mut request = self.http.get(status_url(&device.host));

        if let Some((username, password)) = device.credentials() {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }

        let body = response.bytes().await?;
        decode_status(&body)
    }
}

/// Status endpoint for a device host (`address`, `address:port` or hostname)
pub fn status_url(host: &str) -> String {
    format!("http://{}{}", host, STATUS_PATH)
}

/// Decode a raw `Shelly.GetStatus` body
pub fn decode_status(body: &[u8]) -> std::result::Result<TelemetrySnapshot, FetchError> {
    let status: ShellyStatus = serde_json::from_slice(body).map_err(FetchError::Decode)?;
    Ok(status.into())
}
