use crate::api::ResilienceConfig;
use crate::api::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::api::resilience::{RateLimitConfig, ResilienceProfile, RetryConfig};
use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the directory holding `config.toml` and `session.toml`
pub const CONFIG_DIR_ENV: &str = "FORAGE_CONFIG_DIR";
/// Overrides `api.base_url`
pub const API_URL_ENV: &str = "FORAGE_API_URL";

/// Every key understood by `settings get/set`
pub const KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout_secs",
    "resilience.profile",
    "resilience.max_attempts",
    "resilience.base_delay_ms",
    "resilience.max_delay_ms",
    "resilience.rate_limit_enabled",
    "resilience.requests_per_minute",
    "resilience.burst_capacity",
    "resilience.request_logging",
    "display.alerts_page_size",
    "display.users_page_size",
    "display.currency",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    /// Preset the values below were taken from; "custom" once edited
    pub profile: String,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rate_limit_enabled: bool,
    pub requests_per_minute: u32,
    pub burst_capacity: u32,
    pub request_logging: bool,
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self::from_profile(ResilienceProfile::Standard)
    }
}

impl ResilienceSettings {
    pub fn from_profile(profile: ResilienceProfile) -> Self {
        let preset = ResilienceConfig::for_profile(profile);
        Self {
            profile: profile.name().to_string(),
            max_attempts: preset.retry.max_attempts,
            base_delay_ms: preset.retry.base_delay.as_millis() as u64,
            max_delay_ms: preset.retry.max_delay.as_millis() as u64,
            rate_limit_enabled: preset.rate_limit.enabled,
            requests_per_minute: preset.rate_limit.requests_per_minute,
            burst_capacity: preset.rate_limit.burst_capacity,
            request_logging: preset.monitoring.request_logging,
        }
    }

    fn preset(&self) -> ResilienceProfile {
        ResilienceProfile::parse(&self.profile).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub alerts_page_size: usize,
    pub users_page_size: usize,
    pub currency: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            alerts_page_size: 4,
            users_page_size: 8,
            currency: "DZD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub resilience: ResilienceSettings,
    pub display: DisplaySettings,
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ if cfg!(target_os = "linux") => dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("forage-cli"),
            _ => dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".forage-cli"),
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", path);
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;
        info!("Config saved successfully");
        Ok(())
    }

    /// `FORAGE_API_URL` when set, else the configured URL
    pub fn effective_base_url(&self) -> String {
        self.base_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn base_url_with(&self, env_override: Option<String>) -> String {
        let url = env_override
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.api.base_url.clone());
        url.trim().trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() || !url.starts_with("http") {
            bail!("api.base_url must be an http(s) URL, got '{}'", self.api.base_url);
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        if self.resilience.max_attempts == 0 {
            bail!("resilience.max_attempts must be at least 1");
        }
        if self.resilience.rate_limit_enabled && self.resilience.requests_per_minute == 0 {
            bail!("resilience.requests_per_minute must be at least 1 when rate limiting is enabled");
        }
        if self.resilience.burst_capacity == 0 {
            bail!("resilience.burst_capacity must be at least 1");
        }
        if self.display.alerts_page_size == 0 || self.display.users_page_size == 0 {
            bail!("Page sizes must be at least 1");
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout_secs" => self.api.timeout_secs.to_string(),
            "resilience.profile" => self.resilience.profile.clone(),
            "resilience.max_attempts" => self.resilience.max_attempts.to_string(),
            "resilience.base_delay_ms" => self.resilience.base_delay_ms.to_string(),
            "resilience.max_delay_ms" => self.resilience.max_delay_ms.to_string(),
            "resilience.rate_limit_enabled" => self.resilience.rate_limit_enabled.to_string(),
            "resilience.requests_per_minute" => self.resilience.requests_per_minute.to_string(),
            "resilience.burst_capacity" => self.resilience.burst_capacity.to_string(),
            "resilience.request_logging" => self.resilience.request_logging.to_string(),
            "display.alerts_page_size" => self.display.alerts_page_size.to_string(),
            "display.users_page_size" => self.display.users_page_size.to_string(),
            "display.currency" => self.display.currency.clone(),
            _ => bail!("Unknown setting '{}'. Valid keys: {}", key, KEYS.join(", ")),
        };
        Ok(value)
    }

    /// Set a dotted key; the change is rejected if it leaves the config invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "api.base_url" => updated.api.base_url = value.trim().to_string(),
            "api.timeout_secs" => updated.api.timeout_secs = parse_value(key, value)?,
            "resilience.profile" => {
                let profile = ResilienceProfile::parse(value).with_context(|| {
                    format!(
                        "Unknown profile '{}'. Expected one of: {}",
                        value,
                        ResilienceProfile::NAMES.join(", ")
                    )
                })?;
                updated.resilience = ResilienceSettings::from_profile(profile);
            }
            "resilience.max_attempts" => updated.resilience.max_attempts = parse_value(key, value)?,
            "resilience.base_delay_ms" => updated.resilience.base_delay_ms = parse_value(key, value)?,
            "resilience.max_delay_ms" => updated.resilience.max_delay_ms = parse_value(key, value)?,
            "resilience.rate_limit_enabled" => {
                updated.resilience.rate_limit_enabled = parse_value(key, value)?
            }
            "resilience.requests_per_minute" => {
                updated.resilience.requests_per_minute = parse_value(key, value)?
            }
            "resilience.burst_capacity" => updated.resilience.burst_capacity = parse_value(key, value)?,
            "resilience.request_logging" => updated.resilience.request_logging = parse_value(key, value)?,
            "display.alerts_page_size" => updated.display.alerts_page_size = parse_value(key, value)?,
            "display.users_page_size" => updated.display.users_page_size = parse_value(key, value)?,
            "display.currency" => updated.display.currency = value.trim().to_string(),
            _ => bail!("Unknown setting '{}'. Valid keys: {}", key, KEYS.join(", ")),
        }
        if key.starts_with("resilience.") && key != "resilience.profile" {
            updated.resilience.profile = "custom".to_string();
        }
        updated.validate()?;
        info!("Setting {} = {}", key, value);
        *self = updated;
        Ok(())
    }

    pub fn reset(&mut self) {
        info!("Resetting config to defaults");
        *self = Self::default();
    }

    pub fn resilience_config(&self) -> ResilienceConfig {
        let settings = &self.resilience;
        let preset = ResilienceConfig::for_profile(settings.preset());
        let retry = RetryConfig {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms.max(settings.base_delay_ms)),
            ..preset.retry.clone()
        };
        preset
            .with_retry(retry)
            .with_rate_limit(RateLimitConfig {
                requests_per_minute: settings.requests_per_minute.max(1),
                burst_capacity: settings.burst_capacity.max(1),
                enabled: settings.rate_limit_enabled,
            })
            .with_request_logging(settings.request_logging)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value '{}' for {}", value, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.display.alerts_page_size, 4);
        assert_eq!(config.display.users_page_size, 8);
        assert_eq!(config.display.currency, "DZD");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("api.base_url", "https://rig.example.com/api/").unwrap();
        config.set("display.users_page_size", "20").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.get("display.users_page_size").unwrap(), "20");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\ncurrency = \"EUR\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.display.currency, "EUR");
        assert_eq!(config.display.alerts_page_size, 4);
        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("display.colour", "red").is_err());
        assert!(config.set("api.timeout_secs", "soon").is_err());
        assert!(config.set("display.alerts_page_size", "0").is_err());
        assert!(config.set("api.base_url", "localhost:8080").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reset() {
        let mut config = Config::default();
        config.set("resilience.max_attempts", "7").unwrap();
        config.reset();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::default();
        assert_eq!(config.base_url_with(None), "http://localhost:8080/api");
        assert_eq!(
            config.base_url_with(Some("http://10.0.0.5:9000/api/".into())),
            "http://10.0.0.5:9000/api"
        );
        assert_eq!(config.base_url_with(Some("  ".into())), "http://localhost:8080/api");
    }

    #[test]
    fn test_resilience_config_follows_settings() {
        let mut config = Config::default();
        config.set("resilience.max_attempts", "5").unwrap();
        config.set("resilience.rate_limit_enabled", "false").unwrap();

        let resilience = config.resilience_config();
        assert_eq!(resilience.retry.max_attempts, 5);
        assert!(!resilience.rate_limit.enabled);
        assert!(resilience.monitoring.request_logging);
    }

    #[test]
    fn test_profile_fills_resilience_keys() {
        let mut config = Config::default();
        config.set("resilience.profile", "Shared").unwrap();
        assert_eq!(config.get("resilience.profile").unwrap(), "shared");
        assert_eq!(config.resilience.max_attempts, 2);
        assert_eq!(config.resilience.requests_per_minute, 120);

        config.set("resilience.burst_capacity", "4").unwrap();
        assert_eq!(config.resilience.profile, "custom");
        assert_eq!(config.resilience_config().rate_limit.burst_capacity, 4);

        assert!(config.set("resilience.profile", "cloud").is_err());
    }

    #[test]
    fn test_empty_burst_is_rejected() {
        let mut config = Config::default();
        let err = config.set("resilience.burst_capacity", "0").unwrap_err();
        assert_eq!(err.to_string(), "resilience.burst_capacity must be at least 1");
        assert_eq!(config.resilience.burst_capacity, Config::default().resilience.burst_capacity);

        config.resilience.burst_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config::default();
        for key in KEYS {
            assert!(config.get(key).is_ok(), "{}", key);
        }
    }
}
