//! Shelly Plug Prometheus Exporter
//!
//! Polls a fleet of Shelly Gen2 smart plugs over HTTP and republishes their electrical
//! telemetry as Prometheus gauges.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   GET /rpc/Shelly.GetStatus   ┌──────────────┐
//! │ Shelly plug │ ◄───────────────────────────  │   Exporter   │
//! └─────────────┘          (per tick)           │              │
//! ┌─────────────┐                               │  ┌────────┐  │      HTTP      ┌────────────┐
//! │ Shelly plug │ ◄───────────────────────────  │  │ Poller │  │ ◄────────────► │ Prometheus │
//! └─────────────┘                               │  └────────┘  │   /metrics     └────────────┘
//!                                               │  ┌────────┐  │
//!                                               │  │Metrics │  │
//!                                               │  └────────┘  │
//!                                               └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`shelly`] - Device RPC client and response types
//! - [`metrics`] - Prometheus metric definitions
//! - [`collectors`] - Per-device fetch-and-apply
//! - [`poller`] - Timer-driven fan-out over all devices
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use shelly_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod server;
pub mod shelly;
