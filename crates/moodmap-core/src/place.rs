//! Place and favorite records as returned by the MoodMap backend.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Google Maps search link centred on these coordinates.
    #[must_use]
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// One recommended point of interest.
///
/// Snapshot of a single `/api/recommend` response entry. Numeric fields are
/// parsed leniently: the backend passes OSM values through, so numbers may
/// arrive as strings and a field that is neither becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "distance", default, deserialize_with = "lenient_f64")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub osm_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub osm_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Place {
    /// Identifier used to match this place against favorites.
    ///
    /// The backend id when present, otherwise a composite of name and
    /// coordinates so the same physical place maps to the same id on every
    /// fetch.
    #[must_use]
    pub fn stable_id(&self) -> Cow<'_, str> {
        match self.place_id.as_deref() {
            Some(id) if !id.is_empty() => Cow::Borrowed(id),
            _ => Cow::Owned(format!(
                "p_{}_{}_{}",
                self.name,
                display_opt(self.lat),
                display_opt(self.lon)
            )),
        }
    }

    /// Category with underscores replaced by spaces, `"place"` when absent.
    #[must_use]
    pub fn category_label(&self) -> String {
        category_label(self.category.as_deref())
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// Opening-hours expression, `None` when absent or blank.
    #[must_use]
    pub fn opening_hours_expr(&self) -> Option<&str> {
        self.opening_hours
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A saved place as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
}

impl From<&Place> for FavoriteRecord {
    fn from(place: &Place) -> Self {
        Self {
            place_id: place.stable_id().into_owned(),
            name: Some(place.name.clone()),
            category: place.category.clone(),
            lat: place.lat,
            lon: place.lon,
        }
    }
}

/// A saved place opened outside a result set has no distance or hours.
impl From<&FavoriteRecord> for Place {
    fn from(record: &FavoriteRecord) -> Self {
        Self {
            place_id: Some(record.place_id.clone()),
            name: record.name.clone().unwrap_or_default(),
            category: record.category.clone(),
            lat: record.lat,
            lon: record.lon,
            ..Self::default()
        }
    }
}

#[must_use]
pub fn category_label(category: Option<&str>) -> String {
    category
        .filter(|c| !c.is_empty())
        .unwrap_or("place")
        .replace('_', " ")
}

/// Missing coordinates render as `undefined` so ids match the ones the web
/// client has already saved.
fn display_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| v.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer).unwrap_or(None);
    Ok(match raw {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    }
    .filter(|n| n.is_finite()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrText {
    Int(i64),
    Text(String),
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IdOrText>::deserialize(deserializer).unwrap_or(None);
    Ok(match raw {
        Some(IdOrText::Int(n)) => Some(n.to_string()),
        Some(IdOrText::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}
