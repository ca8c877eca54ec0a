//! Location acquisition with a freshness guarantee.
//!
//! A [`GeoSource`] delivers fixes through two independent paths (a one-shot
//! request and a continuous watch). Both write into one shared
//! [`TrackerCell`]; [`LocationAcquirer::ensure_fresh_location`] waits until
//! that cell holds a fix recent and precise enough to recommend from.

pub mod acquirer;
pub mod clock;
pub mod error;
pub mod source;
pub mod tracker;

pub use acquirer::{AcquirerSettings, LocationAcquirer, WatchStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::GeoError;
pub use source::{FixedGeoSource, GeoReading, GeoSource, NoGeolocation, PositionOptions};
pub use tracker::{FreshnessPolicy, GeoFreshnessTracker, Position, TrackerCell};
