//! Command handlers for the CLI.
//!
//! Each handler drives a [`MoodMapSession`] and prints what it returns. Backend
//! failures have already been logged and turned into safe defaults by the
//! session, so most handlers cannot fail.

use anyhow::Context;
use moodmap_annotate::{group_saved, PlaceCard};
use moodmap_core::{category_label, Mood, Place};
use moodmap_geo::GeoSource;

use crate::session::{MoodMapSession, SearchAvailability, SearchOutcome};

/// Strips the emphasis markup explanation text carries for rich renderers.
fn plain(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}

fn print_card(card: &PlaceCard) {
    let star = if card.is_favorite { "*" } else { " " };
    println!("{star} {} [{}]  ({})", card.place.name, card.place.category_label(), card.id);

    let mut facts = Vec::new();
    if let Some(km) = card.place.distance_km {
        facts.push(format!("{km:.2} km"));
    }
    if let Some(reach) = card.reach {
        facts.push(format!(
            "~{} min by scooter, ~{} min walk",
            reach.scooter_minutes, reach.walk_minutes
        ));
    }
    if let Some(label) = card.open_status.label() {
        facts.push(label.to_string());
    }
    if !facts.is_empty() {
        println!("    {}", facts.join(" \u{b7} "));
    }
    println!("    {}", plain(&card.explanation));
    if let Some(url) = &card.maps_url {
        println!("    {url}");
    }
}

/// Search for `mood` and print the ranked cards.
///
/// # Errors
///
/// Returns an error only if the cards cannot be serialized for `--json`.
pub(crate) async fn run_recommend<S: GeoSource>(
    session: &MoodMapSession<S>,
    mood: Mood,
    query: &str,
    json: bool,
) -> anyhow::Result<()> {
    if session.availability() == SearchAvailability::GettingLocation {
        tracing::info!("waiting for the first location fix");
    }

    session.select_mood(mood).await;
    match session.find_places(session.mood().await).await {
        SearchOutcome::Found(count) => tracing::info!(count, %mood, "places found"),
        SearchOutcome::NoLocation => {
            println!("Could not get a fresh location. Check location access and try again.");
            return Ok(());
        }
        SearchOutcome::NoPlaces => {
            println!("No places found nearby for {}.", mood.label());
            return Ok(());
        }
        SearchOutcome::Busy => return Ok(()),
    }

    let cards = session
        .visible_cards(query, chrono::Local::now().naive_local())
        .await;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&cards).context("failed to serialize cards")?
        );
        return Ok(());
    }

    if cards.is_empty() {
        println!("No places match '{query}'.");
    }
    for card in &cards {
        print_card(card);
    }
    Ok(())
}

pub(crate) async fn run_saved<S: GeoSource>(session: &MoodMapSession<S>) {
    let favorites = session.favorites().await;
    if favorites.is_empty() {
        println!("No saved places yet.");
        return;
    }

    for section in group_saved(&favorites) {
        println!("{}", section.group.title());
        for record in section.places {
            println!(
                "  {} [{}]  ({})",
                record.name.as_deref().unwrap_or("Unnamed place"),
                category_label(record.category.as_deref()),
                record.place_id
            );
        }
    }
}

/// Toggle a saved place. The place is looked up in a fresh `mood` search
/// first, then in the saved list.
///
/// # Errors
///
/// Returns an error if `place_id` is in neither.
pub(crate) async fn run_toggle<S: GeoSource>(
    session: &MoodMapSession<S>,
    mood: Mood,
    place_id: &str,
) -> anyhow::Result<()> {
    let outcome = session.find_places(mood).await;
    tracing::debug!(?outcome, "search before toggle");

    let place = match session
        .places()
        .await
        .into_iter()
        .find(|p| p.stable_id() == place_id)
    {
        Some(place) => place,
        None => find_saved(session, place_id)
            .await
            .with_context(|| format!("place '{place_id}' is neither nearby nor saved"))?,
    };

    let was_saved = session.is_favorite(&place).await;
    let saved = session.toggle_favorite(&place).await;
    match (was_saved, saved) {
        (false, true) => println!("Saved {}.", place.name),
        (true, false) => println!("Removed {} from saved places.", place.name),
        _ => println!("Could not update {}; try again.", place.name),
    }
    Ok(())
}

async fn find_saved<S: GeoSource>(session: &MoodMapSession<S>, place_id: &str) -> Option<Place> {
    session
        .favorites()
        .await
        .iter()
        .find(|f| f.place_id == place_id)
        .map(Place::from)
}

/// Print details for a saved place.
///
/// # Errors
///
/// Returns an error if `place_id` is not saved.
pub(crate) async fn run_details<S: GeoSource>(
    session: &MoodMapSession<S>,
    place_id: &str,
) -> anyhow::Result<()> {
    let place = find_saved(session, place_id)
        .await
        .with_context(|| format!("place '{place_id}' is not in your saved places"))?;

    let Some(details) = session.place_details(&place).await else {
        println!("Details for {} are not available right now.", place.name);
        return Ok(());
    };

    println!("{}", if details.name.is_empty() { &place.name } else { &details.name });
    let fields = [
        ("Category", category_label(Some(details.category.as_str()))),
        ("Address", details.address.clone()),
        ("Hours", details.opening_hours.clone()),
        ("Cuisine", details.cuisine.clone()),
        ("Phone", details.phone.clone()),
        ("Website", details.website.clone()),
        ("Email", details.email.clone()),
        ("Map", details.maps_url.clone()),
    ];
    for (label, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        println!("  {label}: {value}");
    }
    if !details.wiki_extract.is_empty() {
        println!();
        println!("  {}", details.wiki_extract);
    }
    Ok(())
}

pub(crate) async fn run_requests<S: GeoSource>(session: &MoodMapSession<S>) {
    let requests = session.follow_requests().await;
    if requests.is_empty() {
        println!("No pending follow requests.");
        return;
    }
    for request in requests {
        let when = request
            .requested_at()
            .map_or_else(String::new, |at| format!("  {}", at.format("%Y-%m-%d")));
        println!(
            "#{} @{} {}{when}",
            request.req_id,
            request.username,
            request.name.as_deref().unwrap_or_default()
        );
    }
}

pub(crate) async fn run_respond<S: GeoSource>(
    session: &MoodMapSession<S>,
    req_id: i64,
    accept: bool,
) {
    let (ok, verb) = if accept {
        (session.accept_follow_request(req_id).await, "accepted")
    } else {
        (session.reject_follow_request(req_id).await, "rejected")
    };
    if ok {
        println!("Request #{req_id} {verb}.");
    } else {
        println!("Request #{req_id} could not be {verb}.");
    }
}

pub(crate) async fn run_users<S: GeoSource>(session: &MoodMapSession<S>, query: &str) {
    let users = session.user_search().search(query).await.unwrap_or_default();
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for user in users {
        let lock = if user.is_private { " (private)" } else { "" };
        println!(
            "@{} {}{lock}",
            user.username,
            user.name.as_deref().unwrap_or_default()
        );
    }
}
