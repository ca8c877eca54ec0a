use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use moodmap_core::Place;
use serde::Serialize;

use crate::hours::{BasicOpeningHours, OpeningHoursEvaluator};

/// Display state for a place's opening hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OpenStatus {
    /// No hours data, no evaluator, or an expression the evaluator rejected.
    Unknown,
    Open { label: String },
    Closed { label: String },
}

impl OpenStatus {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Unknown => None,
            Self::Open { label } | Self::Closed { label } => Some(label.as_str()),
        }
    }
}

/// Turns a place's `opening_hours` into an [`OpenStatus`].
#[derive(Clone)]
pub struct OpenStatusResolver {
    evaluator: Option<Arc<dyn OpeningHoursEvaluator>>,
}

impl Default for OpenStatusResolver {
    fn default() -> Self {
        Self::new(Arc::new(BasicOpeningHours))
    }
}

impl std::fmt::Debug for OpenStatusResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStatusResolver")
            .field("evaluator", &self.evaluator.is_some())
            .finish()
    }
}

impl OpenStatusResolver {
    #[must_use]
    pub fn new(evaluator: Arc<dyn OpeningHoursEvaluator>) -> Self {
        Self {
            evaluator: Some(evaluator),
        }
    }

    /// A resolver with no evaluator; every place resolves to `Unknown`.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { evaluator: None }
    }

    #[must_use]
    pub fn resolve(&self, place: &Place, now: NaiveDateTime) -> OpenStatus {
        match place.opening_hours_expr() {
            Some(expr) => self.resolve_expr(expr, place, now),
            None => OpenStatus::Unknown,
        }
    }

    fn resolve_expr(&self, expr: &str, place: &Place, now: NaiveDateTime) -> OpenStatus {
        let Some(evaluator) = &self.evaluator else {
            return OpenStatus::Unknown;
        };

        match evaluator.evaluate(expr, place.coordinates(), now) {
            Ok(state) if state.is_open => OpenStatus::Open {
                label: state.next_change.map_or_else(
                    || "Open now".to_string(),
                    |at| format!("Closes at {}", format_clock(at)),
                ),
            },
            Ok(state) => OpenStatus::Closed {
                label: state.next_change.map_or_else(
                    || "Closed now".to_string(),
                    |at| format!("Opens at {}", format_clock(at)),
                ),
            },
            Err(error) => {
                tracing::debug!(place = %place.name, expr, %error, "unparseable opening hours");
                OpenStatus::Unknown
            }
        }
    }
}

/// `9:05 PM` style 12-hour clock; both noon and midnight render as 12.
#[must_use]
pub fn format_clock(at: NaiveDateTime) -> String {
    let (is_pm, hour) = at.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    format!("{hour}:{:02} {suffix}", at.minute())
}
