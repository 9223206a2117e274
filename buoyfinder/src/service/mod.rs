//! Service orchestration for the navigation backend.
//!
//! This module provides [`NavigationService`], which coordinates the
//! startup, operation, and shutdown of the navigation backend.
//!
//! # Architecture
//!
//! The service owns and manages:
//! - **Feed task** - periodic SPOT feed fetches through the refresh gate
//! - **Sensor receivers** - device location and compass heading polling
//! - **Bridges** - tasks forwarding sensor channels into the aggregator
//! - **Aggregator** - the shared navigation state container
//!
//! # Startup Sequence
//!
//! 1. The feed client is built from the configured feed ID
//! 2. The aggregator starts in the `Loading` state
//! 3. The feed task fetches immediately, then on the refresh interval
//! 4. Sensor sources attach separately (headless deployments skip them)
//!
//! # Example
//!
//! ```ignore
//! use buoyfinder::config::ConfigFile;
//! use buoyfinder::service::{NavigationService, NavigationServiceConfig};
//!
//! let config = NavigationServiceConfig::from_config_file(&ConfigFile::load()?);
//! let service = NavigationService::start(config)?;
//!
//! // Watch snapshots
//! let mut updates = service.subscribe();
//!
//! // Graceful shutdown
//! service.shutdown();
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{ConfigFile, MIN_REFRESH_INTERVAL_SECS};
use crate::feed::{fetch_all_reports, FeedClient, FeedError, SpotFeedClient};
use crate::geo::GeoPoint;
use crate::navigator::{
    ComposerContext, NavigationAggregator, NavigationAggregatorConfig, NavigationSnapshot,
    NavigationUpdate, ReferencePoint,
};
use crate::sensors::{
    HeadingReceiver, HeadingReceiverConfig, HeadingSource, LocationReceiver,
    LocationReceiverConfig, LocationSource,
};

/// Minimum spacing between feed fetches. The periodic refresh and manual
/// refresh requests both pass through this gate.
const MIN_FETCH_INTERVAL: Duration = Duration::from_secs(MIN_REFRESH_INTERVAL_SECS);

/// Capacity of the sensor forwarding channels.
const SENSOR_CHANNEL_CAPACITY: usize = 32;

/// Errors from assembling the navigation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No feed ID configured.
    #[error("No feed ID configured (set feed_id in the [feed] section of config.ini)")]
    MissingFeedId,

    /// The feed client could not be constructed.
    #[error("Feed client error: {0}")]
    Feed(#[from] FeedError),
}

/// Configuration for assembling a [`NavigationService`].
#[derive(Debug, Clone)]
pub struct NavigationServiceConfig {
    /// SPOT shared feed ID.
    pub feed_id: String,
    /// Base URL of the SPOT public feed API.
    pub base_url: String,
    /// Interval between periodic feed fetches.
    pub refresh_interval: Duration,
    /// Timeout for feed HTTP requests.
    pub feed_timeout: Duration,
    /// Minimum interval between device position updates.
    pub location_update_interval: Duration,
    /// Snapshot composition context (reference point, timezone, unit).
    pub context: ComposerContext,
}

impl NavigationServiceConfig {
    /// Build service configuration from a loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let context = ComposerContext {
            reference: ReferencePoint {
                name: config.display.reference_name.clone(),
                position: GeoPoint {
                    latitude: config.display.reference_latitude,
                    longitude: config.display.reference_longitude,
                },
            },
            timezone: config.display.timezone,
            speed_unit: config.display.speed_unit,
            ..Default::default()
        };

        Self {
            feed_id: config.feed.feed_id.clone(),
            base_url: config.feed.base_url.clone(),
            refresh_interval: Duration::from_secs(config.feed.refresh_interval),
            feed_timeout: Duration::from_secs(config.feed.timeout),
            location_update_interval: Duration::from_secs(config.location.update_interval),
            context,
        }
    }
}

/// Coordinates the feed task, sensor receivers, and the aggregator.
///
/// This is the main entry point for the navigation backend. Consumers
/// subscribe to composed updates and forward user actions; everything
/// between the satellite feed and the snapshot happens here.
pub struct NavigationService {
    /// Shared navigation state container.
    aggregator: Arc<NavigationAggregator>,

    /// Manual refresh requests into the feed task.
    refresh_tx: mpsc::Sender<()>,

    /// Minimum interval between device position updates.
    location_update_interval: Duration,

    /// Master cancellation token.
    cancellation: CancellationToken,
}

impl NavigationService {
    /// Start the navigation service with the given configuration.
    ///
    /// Spawns the feed task, which fetches immediately and then on the
    /// refresh interval. Sensor sources are attached separately via
    /// [`attach_location_source`](Self::attach_location_source) and
    /// [`attach_heading_source`](Self::attach_heading_source) so headless
    /// deployments can run without device sensors.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: NavigationServiceConfig) -> Result<Self, ServiceError> {
        info!("Starting NavigationService");

        if config.feed_id.is_empty() {
            return Err(ServiceError::MissingFeedId);
        }
        let client = SpotFeedClient::new(&config.base_url, &config.feed_id, config.feed_timeout)?;

        let cancellation = CancellationToken::new();
        let (broadcast_tx, _broadcast_rx) = broadcast::channel(16);
        let aggregator = Arc::new(NavigationAggregator::with_config(
            broadcast_tx,
            NavigationAggregatorConfig {
                context: config.context.clone(),
                ..Default::default()
            },
        ));

        // Capacity 1: one pending manual refresh is enough, the gate
        // drops early requests anyway
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        tokio::spawn(run_feed_task(
            client,
            Arc::clone(&aggregator),
            config.refresh_interval,
            MIN_FETCH_INTERVAL,
            refresh_rx,
            cancellation.clone(),
        ));

        info!(
            refresh_interval_secs = config.refresh_interval.as_secs(),
            "NavigationService started"
        );

        Ok(Self {
            aggregator,
            refresh_tx,
            location_update_interval: config.location_update_interval,
            cancellation,
        })
    }

    /// Attach a device location source.
    ///
    /// Starts a [`LocationReceiver`] polling the source and a bridge task
    /// forwarding fixes into the aggregator. Both stop on shutdown.
    pub fn attach_location_source<S: LocationSource + 'static>(&self, source: S) {
        let (fix_tx, mut fix_rx) = mpsc::channel(SENSOR_CHANNEL_CAPACITY);
        let receiver = LocationReceiver::new(
            LocationReceiverConfig {
                min_update_interval: self.location_update_interval,
            },
            source,
            fix_tx,
        );

        let handle = receiver.start();
        let receiver_cancel = self.cancellation.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = handle => match result {
                    Ok(Ok(())) => tracing::debug!("Location receiver stopped"),
                    Ok(Err(e)) => tracing::warn!("Location receiver error: {}", e),
                    Err(e) => tracing::warn!("Location receiver task failed: {}", e),
                },
                _ = receiver_cancel.cancelled() => {
                    tracing::debug!("Location receiver cancelled");
                }
            }
        });

        // Bridge task: forward fixes to the aggregator. Dropping the
        // receiver half on cancellation closes the channel, which stops
        // the polling task at its next iteration.
        let aggregator = Arc::clone(&self.aggregator);
        let bridge_cancel = self.cancellation.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = bridge_cancel.cancelled() => {
                        tracing::debug!("Location bridge cancelled");
                        break;
                    }

                    fix = fix_rx.recv() => match fix {
                        Some(fix) => aggregator.receive_fix(fix),
                        None => {
                            tracing::debug!("Location channel closed");
                            break;
                        }
                    }
                }
            }
        });

        info!("Location source attached");
    }

    /// Attach a compass heading source.
    ///
    /// Starts a [`HeadingReceiver`] polling the source and a bridge task
    /// forwarding azimuths into the aggregator. Both stop on shutdown.
    pub fn attach_heading_source<S: HeadingSource + 'static>(&self, source: S) {
        let (azimuth_tx, mut azimuth_rx) = mpsc::channel(SENSOR_CHANNEL_CAPACITY);
        let receiver = HeadingReceiver::new(HeadingReceiverConfig::default(), source, azimuth_tx);

        let handle = receiver.start();
        let receiver_cancel = self.cancellation.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = handle => match result {
                    Ok(Ok(())) => tracing::debug!("Heading receiver stopped"),
                    Ok(Err(e)) => tracing::warn!("Heading receiver error: {}", e),
                    Err(e) => tracing::warn!("Heading receiver task failed: {}", e),
                },
                _ = receiver_cancel.cancelled() => {
                    tracing::debug!("Heading receiver cancelled");
                }
            }
        });

        let aggregator = Arc::clone(&self.aggregator);
        let bridge_cancel = self.cancellation.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = bridge_cancel.cancelled() => {
                        tracing::debug!("Heading bridge cancelled");
                        break;
                    }

                    azimuth = azimuth_rx.recv() => match azimuth {
                        Some(azimuth) => aggregator.receive_heading(azimuth),
                        None => {
                            tracing::debug!("Heading channel closed");
                            break;
                        }
                    }
                }
            }
        });

        info!("Heading source attached");
    }

    /// Request an immediate feed refresh.
    ///
    /// Subject to the same minimum-interval gate as the periodic refresh;
    /// early requests are dropped.
    pub fn request_refresh(&self) {
        if self.refresh_tx.try_send(()).is_err() {
            tracing::debug!("Refresh already pending");
        }
    }

    /// Select an asset by full messenger name.
    pub fn select_asset(&self, name: &str) {
        self.aggregator.select_asset(name);
    }

    /// The current composed snapshot.
    pub fn snapshot(&self) -> NavigationSnapshot {
        self.aggregator.snapshot()
    }

    /// Subscribe to navigation updates.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationUpdate> {
        self.aggregator.subscribe()
    }

    /// Get the shared aggregator for direct state access.
    pub fn aggregator(&self) -> Arc<NavigationAggregator> {
        Arc::clone(&self.aggregator)
    }

    /// Get the cancellation token (for coordinating shutdown).
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Gracefully shut down all service tasks.
    pub fn shutdown(self) {
        info!("Shutting down NavigationService");
        self.cancellation.cancel();
        info!("NavigationService shutdown complete");
    }
}

/// Feed refresh loop.
///
/// Fetches immediately on startup, then again whenever the periodic timer
/// fires or a manual refresh request arrives. Every attempt passes the
/// minimum-interval gate, so manual requests cannot drive the fetch rate
/// above the feed's rate limit.
async fn run_feed_task<C: FeedClient>(
    client: C,
    aggregator: Arc<NavigationAggregator>,
    refresh_interval: Duration,
    min_fetch_interval: Duration,
    mut refresh_rx: mpsc::Receiver<()>,
    cancellation: CancellationToken,
) {
    let mut last_fetch: Option<Instant> = None;

    loop {
        let due = match last_fetch {
            None => true,
            Some(at) => at.elapsed() >= min_fetch_interval,
        };

        if due {
            last_fetch = Some(Instant::now());
            aggregator.mark_feed_loading();
            match fetch_all_reports(&client).await {
                Ok(reports) => {
                    tracing::debug!(count = reports.len(), "Feed fetch complete");
                    aggregator.receive_reports(reports);
                }
                Err(error) => {
                    aggregator.receive_feed_error(error.to_string());
                }
            }
        } else {
            tracing::debug!("Refresh requested before the minimum interval elapsed, skipping");
        }

        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                tracing::debug!("Feed task cancelled");
                break;
            }

            Some(()) = refresh_rx.recv() => {}

            _ = tokio::time::sleep(refresh_interval) => {}
        }
    }
}
