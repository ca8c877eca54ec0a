use serde::Serialize;

const SCOOTER_KMH: f64 = 22.0;
const WALK_KMH: f64 = 4.5;
const MIN_SCOOTER_MINUTES: u32 = 2;
const MIN_WALK_MINUTES: u32 = 3;

/// Rough travel time to a place by scooter and on foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReachEstimate {
    pub scooter_minutes: u32,
    pub walk_minutes: u32,
}

/// Estimates travel time for `distance_km`, `None` for non-finite input.
///
/// Very short distances are floored so nothing ever reads as "0 min".
#[must_use]
pub fn estimate(distance_km: f64) -> Option<ReachEstimate> {
    if !distance_km.is_finite() {
        return None;
    }
    Some(ReachEstimate {
        scooter_minutes: minutes_at(distance_km, SCOOTER_KMH).max(MIN_SCOOTER_MINUTES),
        walk_minutes: minutes_at(distance_km, WALK_KMH).max(MIN_WALK_MINUTES),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn minutes_at(distance_km: f64, speed_kmh: f64) -> u32 {
    // Negative distances clamp to zero before the cast.
    (distance_km / speed_kmh * 60.0).round().max(0.0) as u32
}
