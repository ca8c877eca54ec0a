use crate::place::Coordinates;

/// A manually configured position used when no live geolocation exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition {
    pub coordinates: Coordinates,
    pub accuracy_m: Option<f64>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub fresh_max_age_ms: i64,
    pub fresh_max_accuracy_m: f64,
    pub locate_max_wait_ms: u64,
    pub one_shot_timeout_ms: u64,
    pub watch_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub fixed_position: Option<FixedPosition>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fresh_max_age_ms", &self.fresh_max_age_ms)
            .field("fresh_max_accuracy_m", &self.fresh_max_accuracy_m)
            .field("locate_max_wait_ms", &self.locate_max_wait_ms)
            .field("one_shot_timeout_ms", &self.one_shot_timeout_ms)
            .field("watch_timeout_ms", &self.watch_timeout_ms)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("fixed_position", &self.fixed_position)
            .finish()
    }
}
