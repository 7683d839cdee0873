use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Key used when neither the environment nor the config file provides one.
/// FIRMS rejects it, so every fire source fails and the fetcher returns nothing.
pub const PLACEHOLDER_FIRMS_KEY: &str = "YOUR_MAP_KEY_HERE";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    firms_api_key: Option<String>,
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Read `firms_api_key` from a JSON config file.
///
/// A missing file, unreadable file, malformed JSON, or absent key all yield
/// `None`; the caller falls back to the placeholder key.
#[must_use]
pub fn load_firms_api_key(path: &Path) -> Option<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config file");
            return None;
        }
    };

    match serde_json::from_str::<ConfigFile>(&raw) {
        Ok(file) => file.firms_api_key.filter(|k| !k.trim().is_empty()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if a numeric value cannot be parsed
/// or the fire radius is not positive.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a positive number, got {raw}"),
            });
        }
        Ok(value)
    };

    let log_level = or_default("POSTMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("POSTMAP_REQUEST_TIMEOUT_SECS", "10")?;
    let inference_timeout_secs = parse_u64("POSTMAP_INFERENCE_TIMEOUT_SECS", "300")?;
    let user_agent = or_default("POSTMAP_USER_AGENT", DEFAULT_BROWSER_USER_AGENT);
    let ollama_url = or_default("POSTMAP_OLLAMA_URL", "http://localhost:11434");
    let model = or_default("POSTMAP_MODEL", "gpt-oss:20b");
    let prompt_path = PathBuf::from(or_default("POSTMAP_PROMPT_PATH", "./prompt.txt"));
    let nominatim_url = or_default(
        "POSTMAP_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_user_agent = or_default("POSTMAP_GEOCODER_USER_AGENT", "tg-strike-extractor");
    let firms_url = or_default("POSTMAP_FIRMS_URL", "https://firms.modaps.eosdis.nasa.gov");
    let config_path = PathBuf::from(or_default("POSTMAP_CONFIG_PATH", "./config.json"));
    let fire_radius_km = parse_positive_f64("POSTMAP_FIRE_RADIUS_KM", "50")?;
    let fire_day_range = parse_u32("POSTMAP_FIRE_DAY_RANGE", "1")?;

    let firms_api_key = lookup("FIRMS_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| load_firms_api_key(&config_path))
        .unwrap_or_else(|| PLACEHOLDER_FIRMS_KEY.to_string());

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        inference_timeout_secs,
        user_agent,
        ollama_url,
        model,
        prompt_path,
        nominatim_url,
        geocoder_user_agent,
        firms_url,
        config_path,
        firms_api_key,
        fire_radius_km,
        fire_day_range,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
