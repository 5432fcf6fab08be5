//! Shelly Gen2 RPC Type Definitions
//!
//! Only the parts of `Shelly.GetStatus` the exporter reads are modelled. Everything else in
//! the response (wifi, cloud, sys, ...) is ignored by serde.
//!
//! Fields of the primary switch are required: a firmware that omits `temperature` or
//! `voltage` produces a decode error rather than a zero reading.

use serde::Deserialize;

/// `Shelly.GetStatus` response, reduced to the primary switch
#[derive(Debug, Clone, Deserialize)]
pub struct ShellyStatus {
    #[serde(rename = "switch:0")]
    pub switch: SwitchStatus,
}

/// Status of one switch channel
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchStatus {
    #[serde(default)]
    pub id: u32,
    pub output: bool,
    pub apower: f64,
    pub freq: f64,
    pub voltage: f64,
    pub current: f64,
    pub temperature: Temperature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Temperature {
    #[serde(rename = "tC")]
    pub celsius: f64,
    #[serde(rename = "tF", default)]
    pub fahrenheit: Option<f64>,
}

/// Telemetry decoded from one successful status response
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySnapshot {
    pub output_on: bool,
    pub power_watts: f64,
    pub frequency_hz: f64,
    pub voltage_v: f64,
    pub current_a: f64,
    pub temperature_c: f64,
}

impl From<SwitchStatus> for TelemetrySnapshot {
    fn from(switch: SwitchStatus) -> Self {
        Self {
            output_on: switch.output,
            power_watts: switch.apower,
            frequency_hz: switch.freq,
            voltage_v: switch.voltage,
            current_a: switch.current,
            temperature_c: switch.temperature.celsius,
        }
    }
}

impl From<ShellyStatus> for TelemetrySnapshot {
    fn from(status: ShellyStatus) -> Self {
        status.switch.into()
    }
}
