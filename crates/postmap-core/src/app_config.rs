use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub inference_timeout_secs: u64,
    pub user_agent: String,
    pub ollama_url: String,
    pub model: String,
    pub prompt_path: PathBuf,
    pub nominatim_url: String,
    pub geocoder_user_agent: String,
    pub firms_url: String,
    pub config_path: PathBuf,
    pub firms_api_key: String,
    pub fire_radius_km: f64,
    pub fire_day_range: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("inference_timeout_secs", &self.inference_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("ollama_url", &self.ollama_url)
            .field("model", &self.model)
            .field("prompt_path", &self.prompt_path)
            .field("nominatim_url", &self.nominatim_url)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("firms_url", &self.firms_url)
            .field("config_path", &self.config_path)
            .field("firms_api_key", &"[redacted]")
            .field("fire_radius_km", &self.fire_radius_km)
            .field("fire_day_range", &self.fire_day_range)
            .finish()
    }
}
