use crate::common::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_LOG_DIR, DEFAULT_LOG_PREFIX, HARP_CATALOG_URL, HEK_SEARCH_URL,
    JSOC_INFO_URL, SHARP_SERIES,
};
use crate::common::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_EVENT_URL: &str = "FLARE_CATALOG_EVENT_URL";
pub const ENV_COORDINATE_URL: &str = "FLARE_CATALOG_COORDINATE_URL";
pub const ENV_CATALOG_SOURCE: &str = "FLARE_CATALOG_SOURCE";
pub const ENV_LOG_DIR: &str = "FLARE_CATALOG_LOG_DIR";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub services: ServicesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub event_search_url: String,
    pub coordinate_url: String,
    pub coordinate_series: String,
    /// URL or local path of the HARP/NOAA table
    pub catalog_source: String,
    pub request_timeout_secs: u64,
    pub max_event_pages: u32,
    pub event_page_size: u32,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            event_search_url: HEK_SEARCH_URL.to_string(),
            coordinate_url: JSOC_INFO_URL.to_string(),
            coordinate_series: SHARP_SERIES.to_string(),
            catalog_source: HARP_CATALOG_URL.to_string(),
            request_timeout_secs: 60,
            max_event_pages: 20,
            event_page_size: 500,
        }
    }
}

impl ServicesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_LOG_DIR.to_string(),
            file_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Reads the TOML file, then applies environment overrides.
    ///
    /// An explicitly named file must exist; the default `flare_catalog.toml` is optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_EVENT_URL) {
            self.services.event_search_url = v;
        }
        if let Some(v) = non_empty(ENV_COORDINATE_URL) {
            self.services.coordinate_url = v;
        }
        if let Some(v) = non_empty(ENV_CATALOG_SOURCE) {
            self.services.catalog_source = v;
        }
        if let Some(v) = non_empty(ENV_LOG_DIR) {
            self.logging.directory = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.services.request_timeout_secs == 0 {
            return Err(CatalogError::Config("request_timeout_secs must be positive".into()));
        }
        if self.services.event_page_size == 0 {
            return Err(CatalogError::Config("event_page_size must be positive".into()));
        }
        if self.services.coordinate_series.trim().is_empty() {
            return Err(CatalogError::Config("coordinate_series must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.services.coordinate_series, "hmi.sharp_720s");
        assert_eq!(config.services.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.logging.directory, "logs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [services]
            catalog_source = "data/all_harps_with_noaa_ars.txt"
            request_timeout_secs = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.services.catalog_source, "data/all_harps_with_noaa_ars.txt");
        assert_eq!(config.services.request_timeout_secs, 15);
        assert_eq!(config.services.coordinate_url, JSOC_INFO_URL);
        assert_eq!(config.logging.file_prefix, DEFAULT_LOG_PREFIX);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("[services]\nrequest_timeout_secs = \"soon\""),
            Err(CatalogError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_COORDINATE_URL, "http://localhost:8080/jsoc_info"),
            (ENV_CATALOG_SOURCE, "   "),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.services.coordinate_url, "http://localhost:8080/jsoc_info");
        assert_eq!(config.services.catalog_source, HARP_CATALOG_URL);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.services.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));
    }
}
