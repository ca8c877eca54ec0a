use thiserror::Error;

/// Reasons a geolocation request produced no fix.
///
/// Callers treat every variant the same way ("no fix this round"); the
/// distinction only exists for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("geolocation permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("geolocation request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("geolocation is not supported on this device")]
    Unsupported,
}
