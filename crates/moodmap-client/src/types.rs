//! MoodMap backend request and response types.
//!
//! Places and favorites live in `moodmap-core`; this module covers the
//! remaining endpoint shapes. The backend signals most failures with
//! `{"success": false}` rather than an HTTP status, so envelopes default
//! `success` to `false`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use moodmap_core::{Coordinates, Mood, Place};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /api/recommend`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendRequest {
    pub mood: Mood,
    pub latitude: f64,
    pub longitude: f64,
}

impl RecommendRequest {
    #[must_use]
    pub fn new(mood: Mood, at: Coordinates) -> Self {
        Self {
            mood,
            latitude: at.latitude,
            longitude: at.longitude,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MoodBody<'a> {
    pub mood: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlaceIdBody<'a> {
    pub place_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestIdBody {
    pub req_id: i64,
}

/// How `GET /api/place_details` identifies a place.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsQuery {
    /// OSM element lookup, preferred whenever type and id are known.
    Osm { osm_type: String, osm_id: String },
    /// Coordinate lookup with name and category as hints.
    Location {
        lat: f64,
        lon: f64,
        name: String,
        category: String,
    },
}

impl DetailsQuery {
    /// Picks the lookup for `place`; `None` when it has neither an OSM
    /// reference nor coordinates.
    #[must_use]
    pub fn for_place(place: &Place) -> Option<Self> {
        let osm_type = place.osm_type.as_deref().filter(|t| !t.is_empty());
        let osm_id = place.osm_id.as_deref().filter(|i| !i.is_empty());
        if let (Some(osm_type), Some(osm_id)) = (osm_type, osm_id) {
            return Some(Self::Osm {
                osm_type: osm_type.to_string(),
                osm_id: osm_id.to_string(),
            });
        }

        let at = place.coordinates()?;
        Some(Self::Location {
            lat: at.latitude,
            lon: at.longitude,
            name: place.name.clone(),
            category: place.category.clone().unwrap_or_default(),
        })
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Osm { osm_type, osm_id } => {
                vec![("type", osm_type.clone()), ("id", osm_id.clone())]
            }
            Self::Location {
                lat,
                lon,
                name,
                category,
            } => vec![
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("name", name.clone()),
                ("category", category.clone()),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `{"success": bool, "message"?: string}` returned by mutation endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub place: Option<PlaceDetails>,
}

/// Enriched place record from `/api/place_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub osm_type: String,
    #[serde(default)]
    pub osm_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub wheelchair: String,
    #[serde(default)]
    pub takeaway: String,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub wiki_extract: String,
    #[serde(default)]
    pub maps_url: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// The logged-in user's profile from `/api/profile/me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileMe {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_private: bool,
    #[serde(default)]
    pub current_mood: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

impl ProfileMe {
    /// Username when present and non-blank.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// A pending request from someone who wants to follow the current user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowRequest {
    pub req_id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl FollowRequest {
    #[must_use]
    pub fn requested_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// One hit from `/api/users/search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_private: bool,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
}

/// Accepts `true`/`false` or the backend's `0`/`1`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagValue>::deserialize(deserializer)? {
        Some(FlagValue::Bool(b)) => b,
        Some(FlagValue::Int(n)) => n != 0,
        None => false,
    })
}
