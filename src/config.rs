
use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_congestion_table_path")]
    pub congestion_table_path: String,
    #[serde(default = "default_weather_table_path")]
    pub weather_table_path: String,
    #[serde(default = "default_crash_table_path")]
    pub crash_table_path: String,
    #[serde(default)]
    pub regions_path: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub commute_model_path: String,
    #[serde(default)]
    pub segment_model_path: String,
    #[serde(default = "default_stand_in_noise_minutes")]
    pub stand_in_noise_minutes: f64,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapConfig {
    #[serde(default = "default_destination_lat")]
    pub destination_lat: f64,
    #[serde(default = "default_destination_lng")]
    pub destination_lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}
fn default_congestion_table_path() -> String {
    "data/congestion.csv".to_string()
}
fn default_weather_table_path() -> String {
    "data/weather.csv".to_string()
}
fn default_crash_table_path() -> String {
    "data/crashes.csv".to_string()
}
fn default_stand_in_noise_minutes() -> f64 {
    3.0
}
// シカゴ中心部 (Loop)
fn default_destination_lat() -> f64 {
    41.8781
}
fn default_destination_lng() -> f64 {
    -87.6298
}
fn default_rust_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            congestion_table_path: default_congestion_table_path(),
            weather_table_path: default_weather_table_path(),
            crash_table_path: default_crash_table_path(),
            regions_path: String::new(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            commute_model_path: String::new(),
            segment_model_path: String::new(),
            stand_in_noise_minutes: default_stand_in_noise_minutes(),
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            destination_lat: default_destination_lat(),
            destination_lng: default_destination_lng(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

/// 設定値を取得する
///
/// 優先順位: CONFIG_STORE > 環境変数 > TOML
pub fn get(name: &str) -> Result<String> {
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    let toml_value = match name {
        "SERVER_BIND_ADDRESS" => Some(CONFIG.server.bind_address.clone()),
        "CORS_ALLOWED_ORIGINS" => Some(CONFIG.server.cors_allowed_origins.join(",")),
        "CONGESTION_TABLE_PATH" => Some(CONFIG.data.congestion_table_path.clone()),
        "WEATHER_TABLE_PATH" => Some(CONFIG.data.weather_table_path.clone()),
        "CRASH_TABLE_PATH" => Some(CONFIG.data.crash_table_path.clone()),
        "REGIONS_PATH" => Some(CONFIG.data.regions_path.clone()),
        "COMMUTE_MODEL_PATH" => Some(CONFIG.model.commute_model_path.clone()),
        "SEGMENT_MODEL_PATH" => Some(CONFIG.model.segment_model_path.clone()),
        "STAND_IN_NOISE_MINUTES" => Some(CONFIG.model.stand_in_noise_minutes.to_string()),
        "HEATMAP_DESTINATION_LAT" => Some(CONFIG.heatmap.destination_lat.to_string()),
        "HEATMAP_DESTINATION_LNG" => Some(CONFIG.heatmap.destination_lng.to_string()),
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

/// 未設定のキーは None
pub fn get_optional(name: &str) -> Option<String> {
    get(name).ok()
}

/// 数値として取得する
pub fn get_f64(name: &str) -> Result<f64> {
    let value = get(name)?;
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("{}: invalid number {:?}: {}", name, value, e))
}

/// 実行時に値を上書きする (環境変数・TOML より優先)
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
pub(crate) fn unset(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // Server
    if local.server.bind_address != default_bind_address() {
        base.server.bind_address = local.server.bind_address;
    }
    if local.server.cors_allowed_origins != default_cors_allowed_origins() {
        base.server.cors_allowed_origins = local.server.cors_allowed_origins;
    }

    // Data
    if local.data.congestion_table_path != default_congestion_table_path() {
        base.data.congestion_table_path = local.data.congestion_table_path;
    }
    if local.data.weather_table_path != default_weather_table_path() {
        base.data.weather_table_path = local.data.weather_table_path;
    }
    if local.data.crash_table_path != default_crash_table_path() {
        base.data.crash_table_path = local.data.crash_table_path;
    }
    if !local.data.regions_path.is_empty() {
        base.data.regions_path = local.data.regions_path;
    }

    // Model
    if !local.model.commute_model_path.is_empty() {
        base.model.commute_model_path = local.model.commute_model_path;
    }
    if !local.model.segment_model_path.is_empty() {
        base.model.segment_model_path = local.model.segment_model_path;
    }
    if local.model.stand_in_noise_minutes != default_stand_in_noise_minutes() {
        base.model.stand_in_noise_minutes = local.model.stand_in_noise_minutes;
    }

    // Heatmap
    if local.heatmap.destination_lat != default_destination_lat() {
        base.heatmap.destination_lat = local.heatmap.destination_lat;
    }
    if local.heatmap.destination_lng != default_destination_lng() {
        base.heatmap.destination_lng = local.heatmap.destination_lng;
    }

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}
