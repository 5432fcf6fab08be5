//! Prometheus Metrics Definitions
//!
//! This module defines the gauges exposed by the Shelly exporter. Every gauge is labeled
//! by `device` (configured name) and `host` (configured address).
//!
//! # Metrics
//!
//! - `plug_power_watts` - Instantaneous active power
//! - `plug_frequency_hertz` - Mains frequency
//! - `plug_voltage_volts` - Mains voltage
//! - `plug_current_amperes` - Current drawn
//! - `plug_temperature_celsius` - Device temperature
//! - `plug_output` - Relay state (1=on, 0=off)
//!
//! Series appear on the first successful fetch for a device and are never removed. A
//! device that stops answering keeps exposing its last values.

use crate::error::Result;
use crate::shelly::TelemetrySnapshot;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

const NAMESPACE: &str = "plug";
const LABELS: &[&str] = &["device", "host"];

/// The six per-device gauges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Power,
    Frequency,
    Voltage,
    Current,
    Temperature,
    Output,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Power,
        MetricKind::Frequency,
        MetricKind::Voltage,
        MetricKind::Current,
        MetricKind::Temperature,
        MetricKind::Output,
    ];

    /// Exposed metric name, namespace included
    pub fn metric_name(&self) -> &'static str {
        match self {
            MetricKind::Power => "plug_power_watts",
            MetricKind::Frequency => "plug_frequency_hertz",
            MetricKind::Voltage => "plug_voltage_volts",
            MetricKind::Current => "plug_current_amperes",
            MetricKind::Temperature => "plug_temperature_celsius",
            MetricKind::Output => "plug_output",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name())
    }
}

/// Metric registry shared by the poller and the `/metrics` handler
///
/// Cloning shares the underlying gauges. Each gauge child is an atomic, so writers for
/// different devices never contend and a scrape never sees a torn value.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    pub power_watts: Arc<GaugeVec>,
    pub frequency_hertz: Arc<GaugeVec>,
    pub voltage_volts: Arc<GaugeVec>,
    pub current_amperes: Arc<GaugeVec>,
    pub temperature_celsius: Arc<GaugeVec>,
    pub output: Arc<GaugeVec>,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let power_watts = GaugeVec::new(
            Opts::new("power_watts", "Current power consumption in watts").namespace(NAMESPACE),
            LABELS,
        )?;

        let frequency_hertz = GaugeVec::new(
            Opts::new("frequency_hertz", "Current frequency in hertz").namespace(NAMESPACE),
            LABELS,
        )?;

        let voltage_volts = GaugeVec::new(
            Opts::new("voltage_volts", "Current voltage in volts").namespace(NAMESPACE),
            LABELS,
        )?;

        let current_amperes = GaugeVec::new(
            Opts::new("current_amperes", "Current in amperes").namespace(NAMESPACE),
            LABELS,
        )?;

        let temperature_celsius = GaugeVec::new(
            Opts::new("temperature_celsius", "Device temperature in Celsius")
                .namespace(NAMESPACE),
            LABELS,
        )?;

        let output = GaugeVec::new(
            Opts::new("output", "Output status of the plug (1=on, 0=off)").namespace(NAMESPACE),
            LABELS,
        )?;

        registry.register(Box::new(power_watts.clone()))?;
        registry.register(Box::new(frequency_hertz.clone()))?;
        registry.register(Box::new(voltage_volts.clone()))?;
        registry.register(Box::new(current_amperes.clone()))?;
        registry.register(Box::new(temperature_celsius.clone()))?;
        registry.register(Box::new(output.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            power_watts: Arc::new(power_watts),
            frequency_hertz: Arc::new(frequency_hertz),
            voltage_volts: Arc::new(voltage_volts),
            current_amperes: Arc::new(current_amperes),
            temperature_celsius: Arc::new(temperature_celsius),
            output: Arc::new(output),
        })
    }

    /// Gauge family backing `kind`
    pub fn gauge(&self, kind: MetricKind) -> &GaugeVec {
        match kind {
            MetricKind::Power => &self.power_watts,
            MetricKind::Frequency => &self.frequency_hertz,
            MetricKind::Voltage => &self.voltage_volts,
            MetricKind::Current => &self.current_amperes,
            MetricKind::Temperature => &self.temperature_celsius,
            MetricKind::Output => &self.output,
        }
    }

    /// Set a single labeled gauge
    pub fn set_gauge(&self, kind: MetricKind, device: &str, host: &str, value: f64) {
        self.gauge(kind).with_label_values(&[device, host]).set(value);
    }

    /// Overwrite all six gauges of one device with `snapshot`
    pub fn set_metrics(&self, device: &str, host: &str, snapshot: &TelemetrySnapshot) {
        let output = if snapshot.output_on { 1.0 } else { 0.0 };

        self.set_gauge(MetricKind::Power, device, host, snapshot.power_watts);
        self.set_gauge(MetricKind::Frequency, device, host, snapshot.frequency_hz);
        self.set_gauge(MetricKind::Voltage, device, host, snapshot.voltage_v);
        self.set_gauge(MetricKind::Current, device, host, snapshot.current_a);
        self.set_gauge(MetricKind::Temperature, device, host, snapshot.temperature_c);
        self.set_gauge(MetricKind::Output, device, host, output);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics collector")
    }
}
