use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{WeatherQuery, client::openweather::DEFAULT_BASE_URL};

pub const LAT_VAR: &str = "LAT";
pub const LON_VAR: &str = "LON";
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// latitude = 50.45
/// longitude = 30.52
/// api_key = "..."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub api_key: Option<String>,

    /// Override for the OpenWeather API root, without the trailing `/weather`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout; when unset the HTTP client's defaults apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Load config from disk and apply `LAT`, `LON` and `WEATHER_API_KEY` from the process
    /// environment on top.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Override fields from environment-style variables; `lookup` returns a variable's value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(LAT_VAR) {
            self.latitude = Some(parse_coordinate(LAT_VAR, &raw)?);
        }
        if let Some(raw) = lookup(LON_VAR) {
            self.longitude = Some(parse_coordinate(LON_VAR, &raw)?);
        }
        if let Some(key) = lookup(API_KEY_VAR) {
            self.api_key = Some(key);
        }
        Ok(())
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "humidity-screen", "humidity")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Build the query for the weather endpoint; all three values must be present.
    pub fn query(&self) -> Result<WeatherQuery> {
        let latitude = self.latitude.ok_or_else(|| missing("latitude", LAT_VAR))?;
        let longitude = self.longitude.ok_or_else(|| missing("longitude", LON_VAR))?;
        let api_key = self.api_key.clone().ok_or_else(|| missing("API key", API_KEY_VAR))?;

        Ok(WeatherQuery { latitude, longitude, api_key })
    }
}

fn parse_coordinate(var: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("Environment variable {var} is not a number: '{raw}'"))
}

fn missing(what: &str, var: &str) -> anyhow::Error {
    anyhow!(
        "No {what} configured.\n\
         Hint: run `humidity configure` or set the {var} environment variable."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn query_errors_when_not_configured() {
        let cfg = Config::default();
        let err = cfg.query().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No latitude configured"));
        assert!(msg.contains("Hint: run `humidity configure`"));
    }

    #[test]
    fn query_names_missing_api_key() {
        let cfg = Config { latitude: Some(1.0), longitude: Some(2.0), ..Default::default() };
        let err = cfg.query().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config {
            latitude: Some(10.0),
            longitude: Some(20.0),
            api_key: Some("FILE_KEY".into()),
            ..Default::default()
        };

        cfg.apply_env(env(&[("LAT", "50.45"), ("WEATHER_API_KEY", "ENV_KEY")]))
            .expect("env must apply");

        let query = cfg.query().expect("query must build");
        assert_eq!(
            query,
            WeatherQuery { latitude: 50.45, longitude: 20.0, api_key: "ENV_KEY".into() }
        );
    }

    #[test]
    fn env_with_bad_coordinate_errors() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("LON", "east")])).unwrap_err();

        assert!(err.to_string().contains("LON"));
    }

    #[test]
    fn base_url_defaults_to_openweather() {
        let mut cfg = Config::default();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);

        cfg.base_url = Some("http://127.0.0.1:9000".into());
        assert_eq!(cfg.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn missing_file_loads_empty_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            latitude: Some(50.45),
            longitude: Some(30.52),
            api_key: Some("KEY".into()),
            base_url: None,
            timeout_secs: Some(5),
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "latitude = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
