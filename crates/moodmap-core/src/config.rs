use crate::app_config::{AppConfig, FixedPosition};
use crate::place::Coordinates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        or_default(var, default)
            .parse::<i64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, raw: &str| -> Result<f64, ConfigError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let base_url = or_default("MOODMAP_BASE_URL", "http://127.0.0.1:5000");
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "MOODMAP_BASE_URL",
            format!("expected an http(s) URL, got '{base_url}'"),
        ));
    }

    let session_cookie = lookup("MOODMAP_SESSION_COOKIE")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let log_level = or_default("MOODMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("MOODMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MOODMAP_USER_AGENT", "moodmap/0.1 (place-recommendations)");

    let fresh_max_age_ms = parse_i64("MOODMAP_FRESH_MAX_AGE_MS", "20000")?;
    let fresh_max_accuracy_m = parse_f64(
        "MOODMAP_FRESH_MAX_ACCURACY_M",
        &or_default("MOODMAP_FRESH_MAX_ACCURACY_M", "5000"),
    )?;
    let locate_max_wait_ms = parse_u64("MOODMAP_LOCATE_MAX_WAIT_MS", "10000")?;
    let one_shot_timeout_ms = parse_u64("MOODMAP_ONE_SHOT_TIMEOUT_MS", "12000")?;
    let watch_timeout_ms = parse_u64("MOODMAP_WATCH_TIMEOUT_MS", "15000")?;
    let poll_interval_ms = parse_u64("MOODMAP_POLL_INTERVAL_MS", "200")?;
    if poll_interval_ms == 0 {
        return Err(invalid(
            "MOODMAP_POLL_INTERVAL_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let fixed_position = match (lookup("MOODMAP_LATITUDE"), lookup("MOODMAP_LONGITUDE")) {
        (Ok(lat), Ok(lon)) => {
            let latitude = parse_f64("MOODMAP_LATITUDE", &lat)?;
            let longitude = parse_f64("MOODMAP_LONGITUDE", &lon)?;
            let accuracy_m = lookup("MOODMAP_ACCURACY_M")
                .ok()
                .map(|raw| parse_f64("MOODMAP_ACCURACY_M", &raw))
                .transpose()?;
            Some(FixedPosition {
                coordinates: Coordinates::new(latitude, longitude),
                accuracy_m,
            })
        }
        (Ok(_), Err(_)) => {
            return Err(invalid(
                "MOODMAP_LONGITUDE",
                "must be set together with MOODMAP_LATITUDE".to_string(),
            ));
        }
        (Err(_), Ok(_)) => {
            return Err(invalid(
                "MOODMAP_LATITUDE",
                "must be set together with MOODMAP_LONGITUDE".to_string(),
            ));
        }
        (Err(_), Err(_)) => None,
    };

    Ok(AppConfig {
        base_url,
        session_cookie,
        log_level,
        request_timeout_secs,
        user_agent,
        fresh_max_age_ms,
        fresh_max_accuracy_m,
        locate_max_wait_ms,
        one_shot_timeout_ms,
        watch_timeout_ms,
        poll_interval_ms,
        fixed_position,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
