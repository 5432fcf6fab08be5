//! Plug Metrics Collector
//!
//! Collects electrical telemetry from a single Shelly plug.
//!
//! # Metrics Produced
//! - `plug_power_watts`, `plug_frequency_hertz`, `plug_voltage_volts`,
//!   `plug_current_amperes`, `plug_temperature_celsius`, `plug_output`
//!   - Labels: device, host
//!
//! All six are written together from one decoded response, or none are.

use super::{collect_with_handler, CollectionContext, CollectionStatus};
use crate::config::Device;

/// Fetch one device's status and update its gauges
///
/// # Returns
///
/// * `CollectionStatus::Success` - All six gauges now hold this response's values
/// * `CollectionStatus::Failed` - Fetch failed; gauges untouched, warning logged
pub async fn collect_plug_metrics(
    ctx: &CollectionContext<'_>,
    device: &Device,
) -> CollectionStatus {
    collect_with_handler(device, ctx.client.fetch_status(device), |snapshot| {
        ctx.metrics.set_metrics(&device.name, &device.host, &snapshot);
    })
    .await
}
