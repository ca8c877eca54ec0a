//! Shared domain types and configuration for the MoodMap client.

pub mod app_config;
pub mod config;
pub mod mood;
pub mod place;

use thiserror::Error;

pub use app_config::{AppConfig, FixedPosition};
pub use config::{load_app_config, load_app_config_from_env};
pub use mood::{Mood, UnknownMood};
pub use place::{category_label, Coordinates, FavoriteRecord, Place};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
