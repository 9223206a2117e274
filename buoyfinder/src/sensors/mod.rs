//! Device sensor receivers.
//!
//! Push-style producers for the navigator's device slots. Each receiver
//! polls a pluggable source on its own cadence and forwards values over
//! an mpsc channel; the service bridges those channels to the
//! aggregator. Receivers stop when their channel closes.

pub mod heading;
pub mod location;

pub use heading::{
    HeadingError, HeadingReceiver, HeadingReceiverConfig, HeadingSource, NoCompass,
};
pub use location::{
    FixedLocation, LocationError, LocationReceiver, LocationReceiverConfig, LocationSource,
};
