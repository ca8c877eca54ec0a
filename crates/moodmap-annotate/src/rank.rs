use std::cmp::Ordering;
use std::collections::HashSet;

use moodmap_core::Place;

/// Filters `places` by `query` and orders them favorites first, then by
/// ascending distance.
///
/// The query is matched case-insensitively against name or category; an
/// empty query keeps everything. The sort is stable, so places with equal
/// keys keep their response order and re-ranking a ranked list is a no-op.
/// Places without a distance sort after those with one.
#[must_use]
pub fn rank<'a>(places: &'a [Place], favorite_ids: &HashSet<String>, query: &str) -> Vec<&'a Place> {
    let query = query.trim().to_lowercase();
    let mut ranked: Vec<(bool, &Place)> = places
        .iter()
        .filter(|p| query.is_empty() || matches_query(p, &query))
        .map(|p| (favorite_ids.contains(p.stable_id().as_ref()), p))
        .collect();

    ranked.sort_by(|(a_fav, a), (b_fav, b)| {
        b_fav
            .cmp(a_fav)
            .then_with(|| compare_distance(a.distance_km, b.distance_km))
    });
    ranked.into_iter().map(|(_, p)| p).collect()
}

fn matches_query(place: &Place, query: &str) -> bool {
    place.name.to_lowercase().contains(query)
        || place
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(query))
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
