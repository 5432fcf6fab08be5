//! Poll Scheduler
//!
//! A single repeating timer drives all work. On every tick one task per configured device
//! is spawned onto the runtime and the scheduler goes straight back to waiting for the
//! next tick. Tasks are never awaited jointly:
//!
//! - a slow or hanging device only delays its own task, bounded by the client timeout
//! - a failing device never cancels its siblings
//! - a fetch still running when the next tick fires is left alone and overlaps with the
//!   new one
//!
//! There is no retry or backoff. Every device is tried fresh on every tick.

use crate::collectors::{collect_plug_metrics, CollectionContext, CollectionStatus};
use crate::config::{Config, Device};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::shelly::ShellyClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

pub struct Poller {
    devices: Arc<[Device]>,
    client: ShellyClient,
    metrics: MetricsCollector,
    interval: Duration,
}

impl Poller {
    /// `interval` must be non-zero
    pub fn new(
        devices: Vec<Device>,
        client: ShellyClient,
        metrics: MetricsCollector,
        interval: Duration,
    ) -> Self {
        Self {
            devices: devices.into(),
            client,
            metrics,
            interval,
        }
    }

    pub fn from_config(config: &Config, metrics: MetricsCollector) -> Result<Self> {
        let client = ShellyClient::new(config.timeout())?;
        Ok(Self::new(
            config.shelly_plugs.clone(),
            client,
            metrics,
            config.interval(),
        ))
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Spawn one fetch task per device and return without waiting for any of them
    ///
    /// Each task applies its own outcome. The returned handles are only for callers that
    /// want to observe completion; dropping them does not cancel the tasks.
    pub fn dispatch_tick(&self) -> Vec<JoinHandle<CollectionStatus>> {
        (0..self.devices.len())
            .map(|index| {
                let devices = Arc::clone(&self.devices);
                let client = self.client.clone();
                let metrics = self.metrics.clone();

                tokio::spawn(async move {
                    let ctx = CollectionContext {
                        client: &client,
                        metrics: &metrics,
                    };
                    collect_plug_metrics(&ctx, &devices[index]).await
                })
            })
            .collect()
    }

    /// Run the polling loop forever
    ///
    /// The first tick fires immediately. Ticks missed while the runtime was busy are
    /// skipped rather than bursted.
    pub async fn run(self) {
        info!(
            devices = self.devices.len(),
            interval_secs = self.interval.as_secs_f64(),
            "Starting device polling"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let dispatched = self.dispatch_tick().len();
            debug!(devices = dispatched, "Dispatched poll tick");
        }
    }
}
