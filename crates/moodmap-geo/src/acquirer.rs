//! Orchestrates one-shot and continuous geolocation so a search only
//! proceeds with a fresh fix.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use moodmap_core::AppConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::clock::Clock;
use crate::error::GeoError;
use crate::source::{GeoSource, PositionOptions};
use crate::tracker::TrackerCell;

/// Timing knobs for the acquirer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquirerSettings {
    pub one_shot_timeout: Duration,
    pub watch_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for AcquirerSettings {
    fn default() -> Self {
        Self {
            one_shot_timeout: Duration::from_millis(12_000),
            watch_timeout: Duration::from_millis(15_000),
            poll_interval: Duration::from_millis(200),
        }
    }
}

impl AcquirerSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            one_shot_timeout: Duration::from_millis(config.one_shot_timeout_ms),
            watch_timeout: Duration::from_millis(config.watch_timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

/// Lifecycle of the continuous watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    /// Started, nothing delivered yet.
    Pending,
    /// At least one fix delivered.
    Receiving,
    /// The most recent watch event was an error.
    Failed,
    /// The device has no geolocation; the watch was never started.
    Unavailable,
}

pub struct LocationAcquirer<S> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    cell: TrackerCell,
    settings: AcquirerSettings,
    status: Arc<watch::Sender<WatchStatus>>,
}

impl<S: GeoSource> LocationAcquirer<S> {
    #[must_use]
    pub fn new(
        source: Arc<S>,
        clock: Arc<dyn Clock>,
        cell: TrackerCell,
        settings: AcquirerSettings,
    ) -> Self {
        let (status, _rx) = watch::channel(WatchStatus::Pending);
        Self {
            source,
            clock,
            cell,
            settings,
            status: Arc::new(status),
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &TrackerCell {
        &self.cell
    }

    #[must_use]
    pub fn watch_status(&self) -> WatchStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn subscribe_watch_status(&self) -> watch::Receiver<WatchStatus> {
        self.status.subscribe()
    }

    /// Starts the continuous watch on a background task.
    ///
    /// Every reading is recorded into the tracker as it arrives. Returns
    /// `None` without starting anything when the device has no geolocation.
    pub fn start_watch(&self) -> Option<JoinHandle<()>> {
        if !self.source.is_available() {
            tracing::info!("geolocation unavailable; continuous watch not started");
            self.status.send_replace(WatchStatus::Unavailable);
            return None;
        }

        let mut readings = self
            .source
            .watch_position(PositionOptions::high_accuracy(self.settings.watch_timeout));
        let cell = self.cell.clone();
        let clock = Arc::clone(&self.clock);
        let status = Arc::clone(&self.status);

        Some(tokio::spawn(async move {
            while let Some(event) = readings.next().await {
                match event {
                    Ok(reading) => {
                        cell.record_fix(reading.coordinates, reading.accuracy_m, clock.now_ms());
                        status.send_replace(WatchStatus::Receiving);
                        tracing::debug!(
                            latitude = reading.coordinates.latitude,
                            longitude = reading.coordinates.longitude,
                            accuracy_m = ?reading.accuracy_m,
                            "watch position"
                        );
                    }
                    Err(err) => {
                        status.send_replace(WatchStatus::Failed);
                        tracing::warn!(error = %err, "watch position error");
                    }
                }
            }
            tracing::debug!("continuous watch ended");
        }))
    }

    /// Issues a single high-accuracy request bounded by `timeout`.
    ///
    /// Records the fix and returns `true` on success. Denied permission,
    /// sensor errors, timeouts and a missing capability all return `false`.
    pub async fn force_get_location_once(&self, timeout: Duration) -> bool {
        if !self.source.is_available() {
            return false;
        }

        let request = self
            .source
            .current_position(PositionOptions::high_accuracy(timeout));
        let outcome = match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(GeoError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match outcome {
            Ok(reading) => {
                self.cell
                    .record_fix(reading.coordinates, reading.accuracy_m, self.clock.now_ms());
                tracing::debug!(
                    latitude = reading.coordinates.latitude,
                    longitude = reading.coordinates.longitude,
                    accuracy_m = ?reading.accuracy_m,
                    "one-shot position"
                );
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "one-shot position failed");
                false
            }
        }
    }

    /// Waits until the tracker holds a fresh fix or `max_wait` has elapsed.
    ///
    /// Returns immediately when the tracker is already fresh. Otherwise a
    /// one-shot request runs while freshness is re-checked every poll
    /// interval, so a fix delivered by the continuous watch is picked up
    /// even while the one-shot is still pending. Resolves `false` once
    /// `max_wait` has elapsed since the call.
    pub async fn ensure_fresh_location(&self, max_wait: Duration) -> bool {
        let started = Instant::now();

        if self.is_fresh() {
            return true;
        }

        let one_shot = self.force_get_location_once(self.settings.one_shot_timeout);
        tokio::pin!(one_shot);
        let mut one_shot_pending = true;

        loop {
            let remaining = max_wait.saturating_sub(started.elapsed());
            let tick = self.settings.poll_interval.min(remaining);

            tokio::select! {
                ok = &mut one_shot, if one_shot_pending => {
                    one_shot_pending = false;
                    if ok && self.is_fresh() {
                        return true;
                    }
                }
                () = tokio::time::sleep(tick) => {
                    if self.is_fresh() {
                        return true;
                    }
                    if started.elapsed() >= max_wait {
                        tracing::info!(
                            waited_ms = u64::try_from(max_wait.as_millis()).unwrap_or(u64::MAX),
                            last_fix_age_ms = ?self.cell.snapshot().age_ms(self.clock.now_ms()),
                            "no fresh location before deadline"
                        );
                        return false;
                    }
                }
            }
        }
    }

    fn is_fresh(&self) -> bool {
        self.cell.is_fresh(self.clock.now_ms())
    }
}
