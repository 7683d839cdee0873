use std::collections::HashMap;
use std::env::VarError;
use std::io::Write;

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

/// Points the config file at a path that never exists so tests do not pick
/// up a developer's real `config.json`.
fn base_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("POSTMAP_CONFIG_PATH", "/nonexistent/postmap/config.json");
    m
}

#[test]
fn build_app_config_uses_defaults() {
    let map = base_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.inference_timeout_secs, 300);
    assert_eq!(cfg.user_agent, DEFAULT_BROWSER_USER_AGENT);
    assert_eq!(cfg.ollama_url, "http://localhost:11434");
    assert_eq!(cfg.model, "gpt-oss:20b");
    assert_eq!(cfg.prompt_path, PathBuf::from("./prompt.txt"));
    assert_eq!(cfg.nominatim_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.geocoder_user_agent, "tg-strike-extractor");
    assert_eq!(cfg.firms_url, "https://firms.modaps.eosdis.nasa.gov");
    assert_eq!(cfg.firms_api_key, PLACEHOLDER_FIRMS_KEY);
    assert!((cfg.fire_radius_km - 50.0).abs() < f64::EPSILON);
    assert_eq!(cfg.fire_day_range, 1);
}

#[test]
fn request_timeout_override() {
    let mut map = base_env();
    map.insert("POSTMAP_REQUEST_TIMEOUT_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn request_timeout_invalid() {
    let mut map = base_env();
    map.insert("POSTMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POSTMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(POSTMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn fire_day_range_invalid() {
    let mut map = base_env();
    map.insert("POSTMAP_FIRE_DAY_RANGE", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POSTMAP_FIRE_DAY_RANGE"),
        "expected InvalidEnvVar(POSTMAP_FIRE_DAY_RANGE), got: {result:?}"
    );
}

#[test]
fn fire_radius_must_be_positive() {
    let mut map = base_env();
    map.insert("POSTMAP_FIRE_RADIUS_KM", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POSTMAP_FIRE_RADIUS_KM"),
        "expected InvalidEnvVar(POSTMAP_FIRE_RADIUS_KM), got: {result:?}"
    );
}

#[test]
fn model_and_urls_override() {
    let mut map = base_env();
    map.insert("POSTMAP_MODEL", "llama3.2");
    map.insert("POSTMAP_OLLAMA_URL", "http://gpu-box:11434");
    map.insert("POSTMAP_NOMINATIM_URL", "http://localhost:8080");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.model, "llama3.2");
    assert_eq!(cfg.ollama_url, "http://gpu-box:11434");
    assert_eq!(cfg.nominatim_url, "http://localhost:8080");
}

#[test]
fn firms_key_read_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"firms_api_key": "abc123"}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let mut map = HashMap::new();
    map.insert("POSTMAP_CONFIG_PATH", path.as_str());
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.firms_api_key, "abc123");
}

#[test]
fn firms_key_env_wins_over_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"firms_api_key": "from-file"}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let mut map = HashMap::new();
    map.insert("POSTMAP_CONFIG_PATH", path.as_str());
    map.insert("FIRMS_API_KEY", "from-env");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.firms_api_key, "from-env");
}

#[test]
fn malformed_config_file_falls_back_to_placeholder() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert_eq!(load_firms_api_key(file.path()), None);
}

#[test]
fn config_file_without_key_yields_none() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"other": 1}}"#).unwrap();
    assert_eq!(load_firms_api_key(file.path()), None);
}

#[test]
fn debug_output_redacts_firms_key() {
    let mut map = base_env();
    map.insert("FIRMS_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
