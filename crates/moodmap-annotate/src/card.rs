use std::collections::HashSet;

use chrono::NaiveDateTime;
use moodmap_core::{Mood, Place};
use serde::Serialize;

use crate::explain::explain;
use crate::open_status::{OpenStatus, OpenStatusResolver};
use crate::rank::rank;
use crate::reach::{estimate, ReachEstimate};

/// Everything a presentation layer needs to draw one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceCard {
    pub id: String,
    pub place: Place,
    pub is_favorite: bool,
    pub open_status: OpenStatus,
    pub reach: Option<ReachEstimate>,
    pub explanation: String,
    pub maps_url: Option<String>,
}

/// Ranks `places` for display and annotates each survivor.
#[must_use]
pub fn build_cards(
    places: &[Place],
    favorite_ids: &HashSet<String>,
    query: &str,
    mood: Mood,
    resolver: &OpenStatusResolver,
    now: NaiveDateTime,
) -> Vec<PlaceCard> {
    rank(places, favorite_ids, query)
        .into_iter()
        .map(|place| {
            let id = place.stable_id().into_owned();
            PlaceCard {
                is_favorite: favorite_ids.contains(&id),
                id,
                open_status: resolver.resolve(place, now),
                reach: place.distance_km.and_then(estimate),
                explanation: explain(mood, place),
                maps_url: place.coordinates().map(|c| c.maps_url()),
                place: place.clone(),
            }
        })
        .collect()
}
