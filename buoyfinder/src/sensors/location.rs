//! Location receiver - polls a location source for device fixes.
//!
//! The [`LocationSource`] trait abstracts over the positioning backend
//! (GPS hardware, a fixed observer position, scripted test sources). The
//! [`LocationReceiver`] polls it on a fixed cadence and forwards fixes
//! to the aggregator via a channel.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::navigator::device::DeviceFix;

/// Error type for the location receiver.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// The underlying source failed and cannot recover.
    #[error("Location source failed: {0}")]
    Source(String),
}

/// Source of device location fixes.
///
/// `Ok(None)` means no fix is available right now; the receiver keeps
/// polling. `Err` is reserved for unrecoverable failures - sources
/// handle their own transient retries.
pub trait LocationSource: Send {
    /// The current fix, if the source has one.
    fn current_fix(&mut self) -> impl Future<Output = Result<Option<DeviceFix>, LocationError>> + Send;
}

/// Location receiver configuration.
#[derive(Debug, Clone)]
pub struct LocationReceiverConfig {
    /// Minimum interval between fix updates.
    pub min_update_interval: Duration,
}

impl Default for LocationReceiverConfig {
    fn default() -> Self {
        Self {
            min_update_interval: Duration::from_secs(3),
        }
    }
}

/// Polls a [`LocationSource`] and forwards fixes to the aggregator.
pub struct LocationReceiver<S: LocationSource> {
    config: LocationReceiverConfig,
    source: S,
    fix_tx: mpsc::Sender<DeviceFix>,
}

impl<S: LocationSource + 'static> LocationReceiver<S> {
    /// Create a new location receiver.
    pub fn new(config: LocationReceiverConfig, source: S, fix_tx: mpsc::Sender<DeviceFix>) -> Self {
        Self {
            config,
            source,
            fix_tx,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(source: S, fix_tx: mpsc::Sender<DeviceFix>) -> Self {
        Self::new(LocationReceiverConfig::default(), source, fix_tx)
    }

    /// Start the receiver.
    ///
    /// Spawns an async task that polls the source until the downstream
    /// channel closes or the source fails fatally.
    pub fn start(self) -> tokio::task::JoinHandle<Result<(), LocationError>> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) -> Result<(), LocationError> {
        info!(
            interval_ms = self.config.min_update_interval.as_millis() as u64,
            "Location receiver started"
        );

        let mut fixes_sent: u64 = 0;
        loop {
            if self.fix_tx.is_closed() {
                debug!("Location channel closed, stopping receiver");
                break;
            }

            match self.source.current_fix().await {
                Ok(Some(fix)) => {
                    fixes_sent += 1;
                    if fixes_sent == 1 {
                        info!(
                            lat = format!("{:.4}", fix.latitude),
                            lon = format!("{:.4}", fix.longitude),
                            "First location fix"
                        );
                    }
                    if let Err(e) = self.fix_tx.try_send(fix) {
                        warn!(error = %e, "Failed to forward location fix");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Location source failed, stopping receiver");
                    return Err(e);
                }
            }

            tokio::time::sleep(self.config.min_update_interval).await;
        }

        info!(fixes_sent, "Location receiver stopped");
        Ok(())
    }
}

/// A stationary observer at a fixed position.
///
/// Stands in for live positioning when running without GPS hardware;
/// fixes carry zero speed, so the course-over-ground gate never opens.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    latitude: f64,
    longitude: f64,
    altitude_m: f64,
}

impl FixedLocation {
    /// Create a fixed location at sea level.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m: 0.0,
        }
    }
}

impl LocationSource for FixedLocation {
    async fn current_fix(&mut self) -> Result<Option<DeviceFix>, LocationError> {
        Ok(Some(DeviceFix {
            latitude: self.latitude,
            longitude: self.longitude,
            altitude_m: self.altitude_m,
            speed_mps: 0.0,
            bearing_degrees: None,
            timestamp: Utc::now(),
        }))
    }
}
