//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.coddoc.toml` in the working directory
//! 4. `~/.config/coddoc/config.toml` (global defaults)
//! 5. Built-in defaults
//!
//! Every file-level setting is optional so that a layer only overrides what
//! it actually names, including an explicit choice of the default value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    CONFIG_DIR, CONFIG_FILENAME, DEFAULT_TIMEOUT_SECS, ENV_DATA_DIR, ENV_DEFAULT_PROVIDER,
    ENV_TIMEOUT_SECS,
};
use crate::env::Env;
use crate::models::BackendName;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub store: StoreConfig,
}

/// Backend selection and per-backend credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Backend used when a request names none.
    pub default: Option<BackendName>,
    /// Upper bound on one backend round trip, in seconds.
    pub timeout_secs: Option<u64>,
    pub gemini: BackendConfig,
    pub openai: BackendConfig,
    pub anthropic: BackendConfig,
}

impl ProvidersConfig {
    pub fn backend(&self, name: BackendName) -> &BackendConfig {
        match name {
            BackendName::Gemini => &self.gemini,
            BackendName::OpenAI => &self.openai,
            BackendName::Anthropic => &self.anthropic,
        }
    }

    fn backend_mut(&mut self, name: BackendName) -> &mut BackendConfig {
        match name {
            BackendName::Gemini => &mut self.gemini,
            BackendName::OpenAI => &mut self.openai,
            BackendName::Anthropic => &mut self.anthropic,
        }
    }

    /// Configured default backend, or the built-in one.
    pub fn default_backend(&self) -> BackendName {
        self.default.unwrap_or_default()
    }

    /// Configured request timeout, or the built-in one.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

/// Settings for a single backend.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl BackendConfig {
    /// The API key, if present and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn merge(&mut self, other: BackendConfig) {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Where records are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per record under the data directory.
    #[default]
    File,
    /// Process-local; records vanish on exit.
    Memory,
}

/// Result store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Option<StoreBackend>,
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn backend(&self) -> StoreBackend {
        self.backend.unwrap_or_default()
    }

    /// Configured data directory, else `<platform data dir>/coddoc`.
    ///
    /// Falls back to `.coddoc-data` in the working directory on platforms
    /// without a data dir.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(CONFIG_DIR))
                .unwrap_or_else(|| PathBuf::from(".coddoc-data"))
        })
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the working-directory config, then applies
    /// environment variable overrides. CLI flags are applied by the caller.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        Self::load_from(global.as_deref(), work_dir, env)
    }

    /// Layer `global`, then `<work_dir>/.coddoc.toml`, then `env`.
    ///
    /// Missing files are skipped; unreadable or malformed ones are errors.
    pub fn load_from(
        global: Option<&Path>,
        work_dir: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = global {
            if global_path.exists() {
                config.merge(Self::load_file(global_path)?);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(CONFIG_FILENAME);
            if local_path.exists() {
                config.merge(Self::load_file(&local_path)?);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Load a config from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one; anything `other` sets wins.
    fn merge(&mut self, other: Config) {
        if other.providers.default.is_some() {
            self.providers.default = other.providers.default;
        }
        if other.providers.timeout_secs.is_some() {
            self.providers.timeout_secs = other.providers.timeout_secs;
        }
        self.providers.gemini.merge(other.providers.gemini);
        self.providers.openai.merge(other.providers.openai);
        self.providers.anthropic.merge(other.providers.anthropic);

        if other.store.backend.is_some() {
            self.store.backend = other.store.backend;
        }
        if other.store.data_dir.is_some() {
            self.store.data_dir = other.store.data_dir;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.non_empty(ENV_DEFAULT_PROVIDER) {
            match val.parse::<BackendName>() {
                Ok(name) => self.providers.default = Some(name),
                Err(e) => tracing::warn!("ignoring invalid {ENV_DEFAULT_PROVIDER} value: {e}"),
            }
        }
        if let Some(val) = env.non_empty(ENV_TIMEOUT_SECS) {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => self.providers.timeout_secs = Some(secs),
                _ => tracing::warn!("ignoring invalid {ENV_TIMEOUT_SECS} value: {val}"),
            }
        }
        if let Some(val) = env.non_empty(ENV_DATA_DIR) {
            self.store.data_dir = Some(PathBuf::from(val));
        }

        for backend in BackendName::ALL {
            if let Some(key) = env.non_empty(backend.api_key_env_var()) {
                self.providers.backend_mut(backend).api_key = Some(key);
            }
        }
    }
}
