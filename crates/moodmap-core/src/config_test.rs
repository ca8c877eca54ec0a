use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:5000");
    assert!(cfg.session_cookie.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "moodmap/0.1 (place-recommendations)");
    assert_eq!(cfg.fresh_max_age_ms, 20_000);
    assert!((cfg.fresh_max_accuracy_m - 5000.0).abs() < f64::EPSILON);
    assert_eq!(cfg.locate_max_wait_ms, 10_000);
    assert_eq!(cfg.one_shot_timeout_ms, 12_000);
    assert_eq!(cfg.watch_timeout_ms, 15_000);
    assert_eq!(cfg.poll_interval_ms, 200);
    assert!(cfg.fixed_position.is_none());
}

#[test]
fn base_url_override() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_BASE_URL", "https://moodmap.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.base_url, "https://moodmap.example.com");
}

#[test]
fn base_url_without_scheme_fails() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_BASE_URL", "moodmap.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_BASE_URL"),
        "expected InvalidEnvVar(MOODMAP_BASE_URL), got: {result:?}"
    );
}

#[test]
fn blank_session_cookie_is_ignored() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_SESSION_COOKIE", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.session_cookie.is_none());
}

#[test]
fn session_cookie_is_redacted_in_debug() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_SESSION_COOKIE", "session=secret-value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-value"), "cookie leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MOODMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn freshness_overrides() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_FRESH_MAX_AGE_MS", "30000");
    map.insert("MOODMAP_FRESH_MAX_ACCURACY_M", "150.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.fresh_max_age_ms, 30_000);
    assert!((cfg.fresh_max_accuracy_m - 150.5).abs() < f64::EPSILON);
}

#[test]
fn non_finite_accuracy_ceiling_fails() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_FRESH_MAX_ACCURACY_M", "inf");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_FRESH_MAX_ACCURACY_M"),
        "expected InvalidEnvVar(MOODMAP_FRESH_MAX_ACCURACY_M), got: {result:?}"
    );
}

#[test]
fn zero_poll_interval_fails() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_POLL_INTERVAL_MS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_POLL_INTERVAL_MS"),
        "expected InvalidEnvVar(MOODMAP_POLL_INTERVAL_MS), got: {result:?}"
    );
}

#[test]
fn fixed_position_with_accuracy() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_LATITUDE", "18.5204");
    map.insert("MOODMAP_LONGITUDE", "73.8567");
    map.insert("MOODMAP_ACCURACY_M", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let fixed = cfg.fixed_position.expect("fixed position should be set");
    assert!((fixed.coordinates.latitude - 18.5204).abs() < f64::EPSILON);
    assert!((fixed.coordinates.longitude - 73.8567).abs() < f64::EPSILON);
    assert_eq!(fixed.accuracy_m, Some(25.0));
}

#[test]
fn latitude_without_longitude_fails() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_LATITUDE", "18.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_LONGITUDE"),
        "expected InvalidEnvVar(MOODMAP_LONGITUDE), got: {result:?}"
    );
}

#[test]
fn longitude_without_latitude_fails() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_LONGITUDE", "73.8");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_LATITUDE"),
        "expected InvalidEnvVar(MOODMAP_LATITUDE), got: {result:?}"
    );
}

#[test]
fn invalid_latitude_fails() {
    let mut map = HashMap::new();
    map.insert("MOODMAP_LATITUDE", "north");
    map.insert("MOODMAP_LONGITUDE", "73.8");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MOODMAP_LATITUDE"),
        "expected InvalidEnvVar(MOODMAP_LATITUDE), got: {result:?}"
    );
}
