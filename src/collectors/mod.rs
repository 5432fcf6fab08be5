//! Metrics Collectors
//!
//! One collection is one device's fetch-and-apply for one tick: query the device, then
//! either write its gauges or log the failure.
//!
//! # Error Handling
//!
//! Failures never leave this module. They are logged with the device name, host and
//! cause, and reported as [`CollectionStatus::Failed`]. The gauges of a failed device keep
//! their previous values.

use crate::config::Device;
use crate::metrics::MetricsCollector;
use crate::shelly::ShellyClient;
use tracing::{debug, warn};

pub mod plug;

pub use plug::collect_plug_metrics;

/// Shared context passed to collectors
///
/// All fields are immutable references, so no invariants can be violated.
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Shelly RPC client for querying devices
    pub client: &'a ShellyClient,
    /// Metrics collector for updating Prometheus metrics
    pub metrics: &'a MetricsCollector,
}

/// Status of a metrics collection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Metrics were successfully collected and updated
    Success,
    /// Collection failed (already logged as warning)
    Failed,
}

/// Run a device query and route its outcome
///
/// - On success: processes data, returns `CollectionStatus::Success`
/// - On error: logs a warning tagged with device and host, returns `CollectionStatus::Failed`
///
/// `process` is not called on failure.
///
/// # Examples
///
/// ```no_run
/// # use shelly_exporter::collectors::*;
/// # use shelly_exporter::config::Device;
/// async fn example(ctx: &CollectionContext<'_>, device: &Device) -> CollectionStatus {
///     collect_with_handler(device, ctx.client.fetch_status(device), |snapshot| {
///         ctx.metrics.set_metrics(&device.name, &device.host, &snapshot);
///     })
///     .await
/// }
/// ```
pub async fn collect_with_handler<T, F, P, E>(
    device: &Device,
    query_future: F,
    process: P,
) -> CollectionStatus
where
    F: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T),
{
    match query_future.await {
        Ok(data) => {
            process(data);
            debug!(device = %device.name, host = %device.host, "Updated device metrics");
            CollectionStatus::Success
        }
        Err(e) => {
            warn!(
                device = %device.name,
                host = %device.host,
                error = %e,
                "Failed to get power data"
            );
            CollectionStatus::Failed
        }
    }
}
