//! The geolocation capability consumed by the acquirer.

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use moodmap_core::{Coordinates, FixedPosition};

use crate::error::GeoError;

/// A single reading delivered by a [`GeoSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoReading {
    pub coordinates: Coordinates,
    pub accuracy_m: Option<f64>,
}

/// Request options passed through to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub maximum_age: Duration,
    pub timeout: Duration,
}

impl PositionOptions {
    /// High accuracy, no cached readings.
    #[must_use]
    pub fn high_accuracy(timeout: Duration) -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout,
        }
    }
}

/// A device geolocation capability.
///
/// Two independent modes: an awaitable one-shot request and a continuous
/// stream of readings. Implementations report every failure as a
/// [`GeoError`]; the stream keeps going after an error unless the platform
/// stops it.
pub trait GeoSource: Send + Sync + 'static {
    /// Whether the capability exists at all on this device.
    fn is_available(&self) -> bool;

    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<GeoReading, GeoError>> + Send;

    fn watch_position(
        &self,
        options: PositionOptions,
    ) -> BoxStream<'static, Result<GeoReading, GeoError>>;
}

/// A source that always reports one configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeoSource {
    reading: GeoReading,
}

impl FixedGeoSource {
    #[must_use]
    pub fn new(coordinates: Coordinates, accuracy_m: Option<f64>) -> Self {
        Self {
            reading: GeoReading {
                coordinates,
                accuracy_m,
            },
        }
    }
}

impl From<FixedPosition> for FixedGeoSource {
    fn from(fixed: FixedPosition) -> Self {
        Self::new(fixed.coordinates, fixed.accuracy_m)
    }
}

impl GeoSource for FixedGeoSource {
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(
        &self,
        _options: PositionOptions,
    ) -> impl Future<Output = Result<GeoReading, GeoError>> + Send {
        let reading = self.reading;
        async move { Ok(reading) }
    }

    fn watch_position(
        &self,
        _options: PositionOptions,
    ) -> BoxStream<'static, Result<GeoReading, GeoError>> {
        stream::once(futures::future::ready(Ok(self.reading))).boxed()
    }
}

/// A device without any geolocation capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl GeoSource for NoGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    fn current_position(
        &self,
        _options: PositionOptions,
    ) -> impl Future<Output = Result<GeoReading, GeoError>> + Send {
        futures::future::ready(Err(GeoError::Unsupported))
    }

    fn watch_position(
        &self,
        _options: PositionOptions,
    ) -> BoxStream<'static, Result<GeoReading, GeoError>> {
        stream::empty().boxed()
    }
}
