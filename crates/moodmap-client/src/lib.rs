//! Typed HTTP client for the MoodMap backend.

pub mod client;
pub mod error;
pub mod types;

pub use client::MoodMapClient;
pub use error::ApiError;
pub use types::{
    DetailsQuery, FollowRequest, PlaceDetails, ProfileMe, RecommendRequest, UserSummary,
};
