pub mod client;
pub mod types;

pub use client::ShellyClient;
pub use types::TelemetrySnapshot;
