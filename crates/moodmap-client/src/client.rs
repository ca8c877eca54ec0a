//! HTTP client for the MoodMap backend.
//!
//! Wraps `reqwest` with the backend's conventions: session auth through a
//! `Cookie` header, JSON bodies, and list endpoints that answer a non-array
//! (usually `[]` or `{"success": false}`) when the caller is not logged in.

use std::time::Duration;

use moodmap_core::{AppConfig, Coordinates, FavoriteRecord, Mood, Place};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::types::{
    DetailsQuery, DetailsResponse, FollowRequest, MoodBody, PlaceDetails, PlaceIdBody,
    ProfileMe, RecommendRequest, RequestIdBody, SuccessResponse, UserSummary,
};

/// Client for the MoodMap REST API.
///
/// Use [`MoodMapClient::from_config`] in the binary or
/// [`MoodMapClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct MoodMapClient {
    client: Client,
    base_url: Url,
}

impl MoodMapClient {
    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`MoodMapClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.session_cookie.as_deref(),
        )
    }

    /// Creates a client for `base_url`, sending `session_cookie` (a raw
    /// `Cookie` header value) with every request when given.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built,
    /// [`ApiError::InvalidUrl`] if `base_url` does not parse and
    /// [`ApiError::InvalidCookie`] if the cookie is not a valid header value.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session_cookie: Option<&str>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let mut value = HeaderValue::from_str(cookie).map_err(|_| ApiError::InvalidCookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // A single trailing slash makes relative joins append to the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Public profile page for `username`: `<base>/u/<username>`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot carry a path.
    pub fn profile_url(&self, username: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "base URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(["u", username]);
        Ok(url)
    }

    /// Places near `at` for `mood`, in backend order.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the array entries are not places.
    pub async fn recommend(&self, mood: Mood, at: Coordinates) -> Result<Vec<Place>, ApiError> {
        let url = self.endpoint("api/recommend", &[])?;
        let request = self
            .client
            .post(url.clone())
            .json(&RecommendRequest::new(mood, at));
        let body = Self::send_json(request, &url).await?;
        decode_list(body, &format!("recommend(mood={mood})"))
    }

    /// The logged-in user's saved places, newest first.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the array entries are not favorites.
    pub async fn favorites(&self) -> Result<Vec<FavoriteRecord>, ApiError> {
        let url = self.endpoint("api/favorites", &[])?;
        let body = Self::send_json(self.client.get(url.clone()), &url).await?;
        decode_list(body, "favorites")
    }

    /// Saves a place. Returns the backend's `success` flag; saving an
    /// already-saved place still reports success.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the response is not JSON.
    pub async fn add_favorite(&self, record: &FavoriteRecord) -> Result<bool, ApiError> {
        self.post_for_success("api/favorites/add", record).await
    }

    /// Removes a saved place by id.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the response is not JSON.
    pub async fn remove_favorite(&self, place_id: &str) -> Result<bool, ApiError> {
        self.post_for_success("api/favorites/remove", &PlaceIdBody { place_id })
            .await
    }

    /// Records the user's current mood on their profile.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the response is not JSON.
    pub async fn set_mood(&self, mood: Mood) -> Result<bool, ApiError> {
        self.post_for_success("api/mood/set", &MoodBody { mood: mood.as_str() })
            .await
    }

    /// Enriched details for one place; `None` when the backend reports no
    /// match.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status (the
    ///   backend answers 403 when logged out and 400 without coordinates).
    /// - [`ApiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn place_details(
        &self,
        query: &DetailsQuery,
    ) -> Result<Option<PlaceDetails>, ApiError> {
        let pairs = query.query_pairs();
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = self.endpoint("api/place_details", &borrowed)?;
        let body = Self::send_json(self.client.get(url.clone()), &url).await?;
        let DetailsResponse { success, place } = decode(body, "place_details")?;
        Ok(place.filter(|_| success))
    }

    /// The logged-in user's profile; `None` when the backend reports
    /// `success: false` (logged out or session expired).
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn profile_me(&self) -> Result<Option<ProfileMe>, ApiError> {
        let url = self.endpoint("api/profile/me", &[])?;
        let body = Self::send_json(self.client.get(url.clone()), &url).await?;
        let profile: ProfileMe = decode(body, "profile_me")?;
        Ok(profile.success.then_some(profile))
    }

    /// Pending follow requests addressed to the logged-in user.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the array entries are malformed.
    pub async fn follow_requests(&self) -> Result<Vec<FollowRequest>, ApiError> {
        let url = self.endpoint("api/follow/requests", &[])?;
        let body = Self::send_json(self.client.get(url.clone()), &url).await?;
        decode_list(body, "follow_requests")
    }

    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the response is not JSON.
    pub async fn accept_follow_request(&self, req_id: i64) -> Result<bool, ApiError> {
        self.post_for_success("api/follow/requests/accept", &RequestIdBody { req_id })
            .await
    }

    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the response is not JSON.
    pub async fn reject_follow_request(&self, req_id: i64) -> Result<bool, ApiError> {
        self.post_for_success("api/follow/requests/reject", &RequestIdBody { req_id })
            .await
    }

    /// Users whose username or name contains `query`. The backend caps the
    /// result at 10 and ignores queries shorter than two characters.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the array entries are malformed.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let url = self.endpoint("api/users/search", &[("q", query)])?;
        let body = Self::send_json(self.client.get(url.clone()), &url).await?;
        decode_list(body, &format!("search_users(q={query})"))
    }

    /// Resolves `path` against the base URL and appends percent-encoded
    /// query parameters.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn post_for_success<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<bool, ApiError> {
        let url = self.endpoint(path, &[])?;
        let body = Self::send_json(self.client.post(url.clone()).json(payload), &url).await?;
        let response: SuccessResponse = decode(body, path)?;
        if !response.success {
            tracing::debug!(
                endpoint = path,
                message = response.message.as_deref().unwrap_or_default(),
                "backend reported failure"
            );
        }
        Ok(response.success)
    }

    /// Sends `request`, asserts a 2xx status, and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] on network failure or a non-2xx status.
    /// Returns [`ApiError::Deserialize`] if the body is not valid JSON.
    async fn send_json(
        request: RequestBuilder,
        url: &Url,
    ) -> Result<serde_json::Value, ApiError> {
        let response = request.send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

fn decode<T: DeserializeOwned>(body: serde_json::Value, context: &str) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// List endpoints answer a non-array when logged out; that reads as empty.
fn decode_list<T: DeserializeOwned>(
    body: serde_json::Value,
    context: &str,
) -> Result<Vec<T>, ApiError> {
    if body.is_array() {
        decode(body, context)
    } else {
        tracing::debug!(context, "expected a JSON array, treating as empty");
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
