//! Latest-known-position state and the freshness predicate.

use std::sync::Arc;

use moodmap_core::{AppConfig, Coordinates};
use tokio::sync::watch;

/// Bounds a fix must satisfy to be used for a recommendation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshnessPolicy {
    /// A fix older than this (strictly) is stale.
    pub max_age_ms: i64,
    /// A fix whose reported accuracy radius exceeds this (strictly) is too coarse.
    pub max_accuracy_m: f64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            max_age_ms: 20_000,
            max_accuracy_m: 5_000.0,
        }
    }
}

impl FreshnessPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_age_ms: config.fresh_max_age_ms,
            max_accuracy_m: config.fresh_max_accuracy_m,
        }
    }
}

/// One recorded fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinates: Coordinates,
    pub accuracy_m: Option<f64>,
    pub captured_at_ms: i64,
}

#[derive(Debug, Clone, Default)]
pub struct GeoFreshnessTracker {
    policy: FreshnessPolicy,
    last: Option<Position>,
}

impl GeoFreshnessTracker {
    #[must_use]
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self { policy, last: None }
    }

    /// Replaces the stored fix. No ordering check: the last writer wins.
    pub fn record_fix(
        &mut self,
        coordinates: Coordinates,
        accuracy_m: Option<f64>,
        captured_at_ms: i64,
    ) {
        self.last = Some(Position {
            coordinates,
            accuracy_m,
            captured_at_ms,
        });
    }

    /// Whether any fix was ever recorded.
    #[must_use]
    pub fn has_fix(&self) -> bool {
        self.last.is_some()
    }

    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.last
    }

    #[must_use]
    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// True iff a fix exists and both coordinates are finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.last.is_some_and(|p| p.coordinates.is_finite())
    }

    /// Milliseconds between the last fix and `now_ms`.
    #[must_use]
    pub fn age_ms(&self, now_ms: i64) -> Option<i64> {
        self.last.map(|p| now_ms.saturating_sub(p.captured_at_ms))
    }

    #[must_use]
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        let Some(position) = self.last.filter(|_| self.is_valid()) else {
            return false;
        };
        if now_ms.saturating_sub(position.captured_at_ms) > self.policy.max_age_ms {
            return false;
        }
        match position.accuracy_m {
            Some(acc) if acc.is_finite() => acc <= self.policy.max_accuracy_m,
            _ => true,
        }
    }
}

/// Shared, cloneable handle to the single tracker both acquisition paths write.
#[derive(Debug, Clone)]
pub struct TrackerCell {
    inner: Arc<watch::Sender<GeoFreshnessTracker>>,
}

impl TrackerCell {
    #[must_use]
    pub fn new(policy: FreshnessPolicy) -> Self {
        let (tx, _rx) = watch::channel(GeoFreshnessTracker::new(policy));
        Self {
            inner: Arc::new(tx),
        }
    }

    pub fn record_fix(&self, coordinates: Coordinates, accuracy_m: Option<f64>, now_ms: i64) {
        self.inner
            .send_modify(|t| t.record_fix(coordinates, accuracy_m, now_ms));
    }

    #[must_use]
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.inner.borrow().is_fresh(now_ms)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.borrow().is_valid()
    }

    #[must_use]
    pub fn snapshot(&self) -> GeoFreshnessTracker {
        self.inner.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn tracker_with(accuracy_m: Option<f64>, captured_at_ms: i64) -> GeoFreshnessTracker {
        let mut t = GeoFreshnessTracker::default();
        t.record_fix(Coordinates::new(18.52, 73.85), accuracy_m, captured_at_ms);
        t
    }

    #[test]
    fn empty_tracker_is_neither_valid_nor_fresh() {
        let t = GeoFreshnessTracker::default();
        assert!(!t.has_fix());
        assert!(!t.is_valid());
        assert!(!t.is_fresh(NOW));
    }

    #[test]
    fn fix_at_age_limit_is_fresh() {
        let t = tracker_with(Some(5_000.0), NOW - 20_000);
        assert!(t.is_fresh(NOW));
    }

    #[test]
    fn fix_past_age_limit_is_stale_regardless_of_accuracy() {
        for acc in [None, Some(1.0), Some(5_000.0)] {
            let t = tracker_with(acc, NOW - 20_001);
            assert!(!t.is_fresh(NOW), "accuracy {acc:?} should not rescue a stale fix");
        }
    }

    #[test]
    fn coarse_fix_is_not_fresh() {
        let t = tracker_with(Some(5_000.5), NOW);
        assert!(!t.is_fresh(NOW));
    }

    #[test]
    fn missing_or_non_finite_accuracy_is_ignored() {
        assert!(tracker_with(None, NOW).is_fresh(NOW));
        assert!(tracker_with(Some(f64::NAN), NOW).is_fresh(NOW));
        assert!(tracker_with(Some(f64::INFINITY), NOW).is_fresh(NOW));
    }

    #[test]
    fn non_finite_coordinates_are_invalid() {
        let mut t = GeoFreshnessTracker::default();
        t.record_fix(Coordinates::new(f64::NAN, 73.0), None, NOW);
        assert!(t.has_fix());
        assert!(!t.is_valid());
        assert!(!t.is_fresh(NOW));
    }

    #[test]
    fn record_fix_overwrites_even_with_older_timestamp() {
        let mut t = tracker_with(None, NOW);
        t.record_fix(Coordinates::new(1.0, 2.0), Some(10.0), NOW - 60_000);
        let p = t.position().unwrap();
        assert_eq!(p.coordinates, Coordinates::new(1.0, 2.0));
        assert_eq!(p.captured_at_ms, NOW - 60_000);
        assert!(!t.is_fresh(NOW));
    }

    #[test]
    fn custom_policy_is_respected() {
        let mut t = GeoFreshnessTracker::new(FreshnessPolicy {
            max_age_ms: 1_000,
            max_accuracy_m: 50.0,
        });
        t.record_fix(Coordinates::new(0.0, 0.0), Some(40.0), NOW - 900);
        assert!(t.is_fresh(NOW));
        assert!(!t.is_fresh(NOW + 200));
    }

    #[test]
    fn age_is_measured_from_last_fix() {
        let t = tracker_with(None, NOW - 1_500);
        assert_eq!(t.age_ms(NOW), Some(1_500));
    }

    #[test]
    fn cell_shares_state_between_clones() {
        let cell = TrackerCell::new(FreshnessPolicy::default());
        let writer = cell.clone();
        assert!(!cell.is_fresh(NOW));
        writer.record_fix(Coordinates::new(18.0, 73.0), Some(20.0), NOW);
        assert!(cell.is_fresh(NOW));
        assert!(cell.is_valid());
        assert!(cell.snapshot().has_fix());
    }
}
