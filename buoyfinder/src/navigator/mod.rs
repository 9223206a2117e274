//! Navigation state derivation.
//!
//! The navigator turns raw inputs (feed reports, device fixes, compass
//! azimuths, user selection) into one immutable [`NavigationSnapshot`]:
//!
//! - `device`: the observer's input slots and the movement gate
//! - `snapshot`: the derived output type and feed lifecycle status
//! - `composer`: the pure composition function and its fixed context
//! - `aggregator`: the thread-safe state container that owns the slots,
//!   recomposes on every delivery, and broadcasts to subscribers

pub mod aggregator;
pub mod composer;
pub mod device;
pub mod snapshot;

pub use aggregator::{NavigationAggregator, NavigationAggregatorConfig};
pub use composer::{compose, ComposerContext, ReferencePoint};
pub use device::{DeviceFix, DeviceState, MIN_COURSE_SPEED_MPS};
pub use snapshot::{FeedStatus, NavigationSnapshot, NavigationUpdate};
