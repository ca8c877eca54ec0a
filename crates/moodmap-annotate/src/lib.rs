//! Client-side annotation of recommended places.
//!
//! Everything here is pure: open/closed status from opening hours, travel
//! time estimates, mood explanations and favorite-aware ordering. The
//! session layer feeds it backend data and hands the resulting cards to
//! whatever presentation layer is bound on top.

pub mod card;
pub mod explain;
pub mod hours;
pub mod open_status;
pub mod rank;
pub mod reach;
pub mod saved;

pub use card::{build_cards, PlaceCard};
pub use explain::{classify_vibe, explain, explain_why, nearness, Vibe};
pub use hours::{BasicOpeningHours, HoursError, HoursState, OpeningHoursEvaluator};
pub use open_status::{format_clock, OpenStatus, OpenStatusResolver};
pub use rank::rank;
pub use reach::{estimate, ReachEstimate};
pub use saved::{classify_saved, group_saved, SavedGroup, SavedSection, MAX_PER_GROUP};
