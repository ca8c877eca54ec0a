//! Session-scoped client controller.
//!
//! Owns everything a page session used to keep in globals: the selected
//! mood, the last result set, the favorites cache, the cached username and
//! the in-flight search flag. A presentation layer calls into it and renders
//! what it returns.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::NaiveDateTime;
use moodmap_annotate::{OpenStatusResolver, PlaceCard};
use moodmap_client::{ApiError, DetailsQuery, FollowRequest, MoodMapClient, PlaceDetails};
use moodmap_core::{FavoriteRecord, Mood, Place};
use moodmap_geo::{GeoSource, LocationAcquirer, WatchStatus};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::user_search::UserSearchDebouncer;

/// Result of [`MoodMapSession::find_places`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// Another search is still running; nothing was done.
    Busy,
    /// No fresh, valid fix before the wait budget ran out. Worth a retry.
    NoLocation,
    /// The backend returned nothing, or the request failed.
    NoPlaces,
    Found(usize),
}

/// What the search control should offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchAvailability {
    /// Waiting for the first watch event.
    GettingLocation,
    Ready,
    Searching,
}

#[derive(Debug, Error)]
pub(crate) enum ProfileLinkError {
    #[error("username not available; set a username on your profile first")]
    UsernameMissing,

    #[error(transparent)]
    Url(#[from] ApiError),
}

struct SessionState {
    mood: Mood,
    places: Vec<Place>,
    favorites: Vec<FavoriteRecord>,
    favorite_ids: HashSet<String>,
    username: Option<String>,
}

/// Clears the in-flight flag when a search ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub(crate) struct MoodMapSession<S> {
    client: MoodMapClient,
    acquirer: LocationAcquirer<S>,
    watch: Option<JoinHandle<()>>,
    locate_max_wait: Duration,
    resolver: OpenStatusResolver,
    user_search: UserSearchDebouncer,
    loading: AtomicBool,
    state: Mutex<SessionState>,
}

impl<S: GeoSource> MoodMapSession<S> {
    /// Creates the session, starts the continuous location watch and loads
    /// the favorites cache.
    pub(crate) async fn start(
        client: MoodMapClient,
        acquirer: LocationAcquirer<S>,
        locate_max_wait: Duration,
    ) -> Self {
        let watch = acquirer.start_watch();
        let session = Self {
            user_search: UserSearchDebouncer::new(client.clone()),
            client,
            acquirer,
            watch,
            locate_max_wait,
            resolver: OpenStatusResolver::default(),
            loading: AtomicBool::new(false),
            state: Mutex::new(SessionState {
                mood: Mood::Work,
                places: Vec::new(),
                favorites: Vec::new(),
                favorite_ids: HashSet::new(),
                username: None,
            }),
        };
        session.refresh_favorites().await;
        session
    }

    pub(crate) fn availability(&self) -> SearchAvailability {
        if self.loading.load(Ordering::Acquire) {
            return SearchAvailability::Searching;
        }
        match self.acquirer.watch_status() {
            WatchStatus::Pending => SearchAvailability::GettingLocation,
            WatchStatus::Receiving | WatchStatus::Failed | WatchStatus::Unavailable => {
                SearchAvailability::Ready
            }
        }
    }

    pub(crate) async fn mood(&self) -> Mood {
        self.state.lock().await.mood
    }

    /// Switches mood. A different mood drops the current result set.
    pub(crate) async fn select_mood(&self, mood: Mood) {
        let mut state = self.state.lock().await;
        if state.mood != mood {
            state.mood = mood;
            state.places.clear();
        }
    }

    /// Runs a full search for `mood`.
    ///
    /// Records the mood on the profile in the background, waits for a fresh
    /// fix, refreshes favorites, then fetches recommendations. Favorites are
    /// refreshed again once the search settles, whatever the outcome.
    pub(crate) async fn find_places(&self, mood: Mood) -> SearchOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.loading) else {
            tracing::debug!("search already running");
            return SearchOutcome::Busy;
        };

        let outcome = self.search(mood).await;
        tracing::info!(%mood, ?outcome, "search finished");
        self.refresh_favorites().await;
        outcome
    }

    async fn search(&self, mood: Mood) -> SearchOutcome {
        self.select_mood(mood).await;
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.set_mood(mood).await {
                tracing::warn!(error = %e, %mood, "failed to record mood");
            }
        });

        let fresh = self.acquirer.ensure_fresh_location(self.locate_max_wait).await;
        let position = self.acquirer.tracker().snapshot().position();
        let Some(position) = position.filter(|p| fresh && p.coordinates.is_finite()) else {
            tracing::info!(%mood, "no fresh location; search skipped");
            return SearchOutcome::NoLocation;
        };

        self.refresh_favorites().await;

        match self.client.recommend(mood, position.coordinates).await {
            Ok(places) if !places.is_empty() => {
                let count = places.len();
                self.state.lock().await.places = places;
                SearchOutcome::Found(count)
            }
            Ok(_) => {
                self.state.lock().await.places.clear();
                SearchOutcome::NoPlaces
            }
            Err(e) => {
                tracing::warn!(error = %e, %mood, "recommend request failed");
                self.state.lock().await.places.clear();
                SearchOutcome::NoPlaces
            }
        }
    }

    /// Reloads the favorites cache. A failed fetch empties it.
    pub(crate) async fn refresh_favorites(&self) {
        let favorites = match self.client.favorites().await {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load favorites");
                Vec::new()
            }
        };
        let mut state = self.state.lock().await;
        state.favorite_ids = favorites.iter().map(|f| f.place_id.clone()).collect();
        state.favorites = favorites;
    }

    pub(crate) async fn favorites(&self) -> Vec<FavoriteRecord> {
        self.state.lock().await.favorites.clone()
    }

    pub(crate) async fn is_favorite(&self, place: &Place) -> bool {
        self.state
            .lock()
            .await
            .favorite_ids
            .contains(place.stable_id().as_ref())
    }

    /// Adds or removes `place` from favorites, then refetches the cache.
    /// Returns whether the place is a favorite afterwards.
    pub(crate) async fn toggle_favorite(&self, place: &Place) -> bool {
        let place_id = place.stable_id();
        let result = if self.is_favorite(place).await {
            self.client.remove_favorite(&place_id).await
        } else {
            self.client.add_favorite(&FavoriteRecord::from(place)).await
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, place_id = %place_id, "favorite toggle failed");
        }

        self.refresh_favorites().await;
        self.is_favorite(place).await
    }

    /// Last result set.
    pub(crate) async fn places(&self) -> Vec<Place> {
        self.state.lock().await.places.clone()
    }

    /// Ranked, annotated cards for the current result set.
    pub(crate) async fn visible_cards(&self, query: &str, now: NaiveDateTime) -> Vec<PlaceCard> {
        let state = self.state.lock().await;
        moodmap_annotate::build_cards(
            &state.places,
            &state.favorite_ids,
            query,
            state.mood,
            &self.resolver,
            now,
        )
    }

    /// Enriched details for `place`; `None` when it cannot be identified or
    /// the lookup fails.
    pub(crate) async fn place_details(&self, place: &Place) -> Option<PlaceDetails> {
        let query = DetailsQuery::for_place(place)?;
        match self.client.place_details(&query).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(error = %e, place = %place.name, "place details failed");
                None
            }
        }
    }

    /// Link to the user's public profile.
    ///
    /// The username is re-read from the backend each time and cached; when
    /// the backend cannot provide one the cached value is used.
    pub(crate) async fn profile_link(&self) -> Result<String, ProfileLinkError> {
        let username = self
            .resolve_username()
            .await
            .ok_or(ProfileLinkError::UsernameMissing)?;
        Ok(self.client.profile_url(&username)?.to_string())
    }

    async fn resolve_username(&self) -> Option<String> {
        match self.client.profile_me().await {
            Ok(Some(profile)) => {
                if let Some(username) = profile.username() {
                    let username = username.to_string();
                    self.state.lock().await.username = Some(username.clone());
                    return Some(username);
                }
            }
            Ok(None) => tracing::debug!("profile unavailable"),
            Err(e) => tracing::warn!(error = %e, "failed to load profile"),
        }
        self.state.lock().await.username.clone()
    }

    pub(crate) async fn follow_requests(&self) -> Vec<FollowRequest> {
        self.client.follow_requests().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load follow requests");
            Vec::new()
        })
    }

    pub(crate) async fn accept_follow_request(&self, req_id: i64) -> bool {
        self.client
            .accept_follow_request(req_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, req_id, "accept follow request failed");
                false
            })
    }

    pub(crate) async fn reject_follow_request(&self, req_id: i64) -> bool {
        self.client
            .reject_follow_request(req_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, req_id, "reject follow request failed");
                false
            })
    }

    pub(crate) fn user_search(&self) -> &UserSearchDebouncer {
        &self.user_search
    }
}

impl<S> Drop for MoodMapSession<S> {
    fn drop(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.abort();
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
