use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    messages::Language,
    places::PlaceIndex,
    resolver::{Resolver, ResolverStrategy},
    retry::RetryPolicy,
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OWM_API";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// language = "ru"
/// places_file = "/var/lib/advisor/places.json"
///
/// [resolver]
/// mode = "best_match"
/// cutoff = 0.7
///
/// [retry]
/// max_retries = 2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Language used when the caller does not pick one.
    pub language: Language,

    /// JSON file with reference places; the built-in list is used when absent.
    pub places_file: Option<PathBuf>,

    /// Per-call timeout for the weather and geocoding providers.
    pub timeout_secs: u64,

    pub resolver: ResolverStrategy,

    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            language: Language::default(),
            places_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            resolver: ResolverStrategy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// The `OWM_API` environment variable takes precedence over the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            cfg.set_api_key_override(key);
        }

        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-advisor", "advisor")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    fn set_api_key_override(&mut self, key: String) {
        if !key.trim().is_empty() {
            self.api_key = Some(key);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Overall budget for one provider call, retries and backoff included.
    pub fn call_budget(&self) -> Duration {
        let retries = u64::from(self.retry.max_retries);
        let per_attempt = self.timeout_secs.saturating_mul(retries + 1);
        let backoff = self.retry.max_delay_ms.saturating_mul(retries);
        Duration::from_secs(per_attempt) + Duration::from_millis(backoff)
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.resolver)
    }

    /// The reference place index: the configured file, or the built-in list.
    pub fn place_index(&self) -> Result<PlaceIndex> {
        match &self.places_file {
            Some(path) => PlaceIndex::from_json_file(path),
            None => Ok(PlaceIndex::builtin()),
        }
    }
}
