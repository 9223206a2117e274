//! Heading receiver - polls a compass source for raw azimuths.
//!
//! Mirrors the location receiver but for the magnetometer. A device
//! without the sensor is a source that always yields `Ok(None)`; the
//! navigator then keeps its "No Magnetometer" fallback forever.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Error type for the heading receiver.
#[derive(Debug, thiserror::Error)]
pub enum HeadingError {
    /// The underlying source failed and cannot recover.
    #[error("Heading source failed: {0}")]
    Source(String),
}

/// Source of raw compass azimuths in degrees clockwise from magnetic
/// north. Smoothing is the source's concern; the navigator consumes
/// values as delivered.
pub trait HeadingSource: Send {
    /// The current azimuth, if the sensor has one.
    fn current_azimuth(&mut self) -> impl Future<Output = Result<Option<f64>, HeadingError>> + Send;
}

/// Heading receiver configuration.
#[derive(Debug, Clone)]
pub struct HeadingReceiverConfig {
    /// Minimum interval between azimuth updates.
    pub min_update_interval: Duration,
}

impl Default for HeadingReceiverConfig {
    fn default() -> Self {
        Self {
            min_update_interval: Duration::from_millis(500),
        }
    }
}

/// Polls a [`HeadingSource`] and forwards azimuths to the aggregator.
pub struct HeadingReceiver<S: HeadingSource> {
    config: HeadingReceiverConfig,
    source: S,
    azimuth_tx: mpsc::Sender<f64>,
}

impl<S: HeadingSource + 'static> HeadingReceiver<S> {
    /// Create a new heading receiver.
    pub fn new(config: HeadingReceiverConfig, source: S, azimuth_tx: mpsc::Sender<f64>) -> Self {
        Self {
            config,
            source,
            azimuth_tx,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults(source: S, azimuth_tx: mpsc::Sender<f64>) -> Self {
        Self::new(HeadingReceiverConfig::default(), source, azimuth_tx)
    }

    /// Start the receiver.
    pub fn start(self) -> tokio::task::JoinHandle<Result<(), HeadingError>> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) -> Result<(), HeadingError> {
        info!(
            interval_ms = self.config.min_update_interval.as_millis() as u64,
            "Heading receiver started"
        );

        loop {
            if self.azimuth_tx.is_closed() {
                debug!("Heading channel closed, stopping receiver");
                break;
            }

            match self.source.current_azimuth().await {
                Ok(Some(azimuth)) => {
                    if let Err(e) = self.azimuth_tx.try_send(azimuth) {
                        warn!(error = %e, "Failed to forward heading");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Heading source failed, stopping receiver");
                    return Err(e);
                }
            }

            tokio::time::sleep(self.config.min_update_interval).await;
        }

        info!("Heading receiver stopped");
        Ok(())
    }
}

/// A source for devices without a magnetometer; never yields a value.
#[derive(Debug, Clone, Default)]
pub struct NoCompass;

impl HeadingSource for NoCompass {
    async fn current_azimuth(&mut self) -> Result<Option<f64>, HeadingError> {
        Ok(None)
    }
}
