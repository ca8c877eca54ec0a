use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The moods the backend knows how to recommend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Work,
    Date,
    QuickBite,
    Budget,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Work, Mood::Date, Mood::QuickBite, Mood::Budget];

    /// Wire value sent to the backend (`"quick_bite"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Work => "work",
            Mood::Date => "date",
            Mood::QuickBite => "quick_bite",
            Mood::Budget => "budget",
        }
    }

    /// Human-readable form used in explanation text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Mood::QuickBite => "quick bite",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "work" => Ok(Mood::Work),
            "date" => Ok(Mood::Date),
            "quick_bite" => Ok(Mood::QuickBite),
            "budget" => Ok(Mood::Budget),
            other => Err(UnknownMood(other.to_string())),
        }
    }
}
