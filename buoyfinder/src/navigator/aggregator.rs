//! Navigation state aggregator.
//!
//! The aggregator owns the four mutable input slots (report history,
//! selection, device fix, raw heading), each written by a single
//! producer:
//! - Feed fetch task (report batches, lifecycle status)
//! - Location receiver (device fixes)
//! - Heading receiver (raw compass azimuths)
//! - User commands (asset selection)
//!
//! Every delivery recomposes the snapshot and broadcasts it to
//! subscribers. Sensor-driven updates are rate limited to avoid flooding
//! consumers; user actions and feed lifecycle changes broadcast
//! immediately.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::feed::model::PositionReport;
use crate::feed::reducer;
use crate::navigator::composer::{compose, ComposerContext};
use crate::navigator::device::{DeviceFix, DeviceState};
use crate::navigator::snapshot::{FeedStatus, NavigationSnapshot, NavigationUpdate};

/// Configuration for the navigation aggregator.
#[derive(Debug, Clone)]
pub struct NavigationAggregatorConfig {
    /// Minimum interval between rate-limited broadcasts.
    pub min_broadcast_interval: Duration,

    /// Fixed composition context.
    pub context: ComposerContext,
}

impl Default for NavigationAggregatorConfig {
    fn default() -> Self {
        Self {
            min_broadcast_interval: Duration::from_secs(1),
            context: ComposerContext::default(),
        }
    }
}

/// Internal state for the aggregator.
struct AggregatorState {
    /// Arrival-ordered report history.
    reports: Vec<PositionReport>,

    /// Explicit asset selection, when the user has made one.
    selected_asset: Option<String>,

    /// Device input slots.
    device: DeviceState,

    /// Feed fetch lifecycle.
    feed_status: FeedStatus,

    /// Last broadcast time (for rate limiting).
    last_broadcast: Option<Instant>,
}

/// Navigation aggregator holding the state container.
pub struct NavigationAggregator {
    /// Internal state (thread-safe).
    state: Arc<RwLock<AggregatorState>>,

    /// Broadcast channel for navigation updates.
    broadcast_tx: broadcast::Sender<NavigationUpdate>,

    /// Configuration.
    config: NavigationAggregatorConfig,
}

impl NavigationAggregator {
    /// Create a new aggregator with default configuration.
    pub fn new(broadcast_tx: broadcast::Sender<NavigationUpdate>) -> Self {
        Self::with_config(broadcast_tx, NavigationAggregatorConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(
        broadcast_tx: broadcast::Sender<NavigationUpdate>,
        config: NavigationAggregatorConfig,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(AggregatorState {
                reports: Vec::new(),
                selected_asset: None,
                device: DeviceState::default(),
                feed_status: FeedStatus::Loading,
                last_broadcast: None,
            })),
            broadcast_tx,
            config,
        }
    }

    /// Merge a fetched report batch into the history.
    pub fn receive_reports(&self, batch: Vec<PositionReport>) {
        let mut state = self.state.write().unwrap();

        let added = reducer::merge_reports(&mut state.reports, batch);
        state.feed_status = FeedStatus::Success;

        tracing::debug!(
            added,
            total = state.reports.len(),
            "Report batch merged"
        );
        self.broadcast_now(&mut state);
    }

    /// Record a feed fetch failure.
    ///
    /// The history is left untouched; consumers keep seeing the last
    /// known data under the `Error` tag.
    pub fn receive_feed_error(&self, message: String) {
        let mut state = self.state.write().unwrap();
        tracing::warn!(error = %message, "Feed fetch failed, serving last known data");
        state.feed_status = FeedStatus::Error(message);
        self.broadcast_now(&mut state);
    }

    /// Mark a feed fetch as in flight.
    pub fn mark_feed_loading(&self) {
        let mut state = self.state.write().unwrap();
        state.feed_status = FeedStatus::Loading;
        self.broadcast_now(&mut state);
    }

    /// Receive a device location fix.
    pub fn receive_fix(&self, fix: DeviceFix) {
        let mut state = self.state.write().unwrap();
        state.device.apply_fix(fix);
        self.maybe_broadcast(&mut state);
    }

    /// Receive a raw compass azimuth in degrees.
    pub fn receive_heading(&self, azimuth_degrees: f64) {
        let mut state = self.state.write().unwrap();
        state.device.apply_heading(azimuth_degrees);
        self.maybe_broadcast(&mut state);
    }

    /// Select an asset by full messenger name.
    ///
    /// The selection persists across feed refreshes, even when the asset
    /// stops reporting. User actions bypass the broadcast rate limit.
    pub fn select_asset(&self, name: &str) {
        let mut state = self.state.write().unwrap();
        tracing::info!(asset = name, "Asset selected");
        state.selected_asset = Some(name.to_string());
        self.broadcast_now(&mut state);
    }

    /// The current composed snapshot.
    pub fn snapshot(&self) -> NavigationSnapshot {
        let state = self.state.read().unwrap();
        Self::compose_snapshot(&state, &self.config.context)
    }

    /// The current feed lifecycle status.
    pub fn feed_status(&self) -> FeedStatus {
        self.state.read().unwrap().feed_status.clone()
    }

    /// The current status plus snapshot as one update.
    pub fn update(&self) -> NavigationUpdate {
        let state = self.state.read().unwrap();
        NavigationUpdate {
            status: state.feed_status.clone(),
            snapshot: Self::compose_snapshot(&state, &self.config.context),
        }
    }

    /// A copy of the current report history, arrival-ordered.
    pub fn reports(&self) -> Vec<PositionReport> {
        self.state.read().unwrap().reports.clone()
    }

    /// Subscribe to navigation updates.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationUpdate> {
        self.broadcast_tx.subscribe()
    }

    fn compose_snapshot(state: &AggregatorState, context: &ComposerContext) -> NavigationSnapshot {
        compose(
            &state.reports,
            state.selected_asset.as_deref(),
            &state.device,
            context,
            Utc::now(),
        )
    }

    /// Broadcast the current state if the rate limit allows.
    fn maybe_broadcast(&self, state: &mut AggregatorState) {
        let should_broadcast = match state.last_broadcast {
            None => true,
            Some(last) => last.elapsed() >= self.config.min_broadcast_interval,
        };

        if should_broadcast {
            self.broadcast_now(state);
        }
    }

    /// Broadcast the current state unconditionally.
    fn broadcast_now(&self, state: &mut AggregatorState) {
        let update = NavigationUpdate {
            status: state.feed_status.clone(),
            snapshot: Self::compose_snapshot(state, &self.config.context),
        };
        let _ = self.broadcast_tx.send(update);
        state.last_broadcast = Some(Instant::now());
    }
}
