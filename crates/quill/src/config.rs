//! Layered process configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `quill/quill.toml` under the user config directory, then `./quill.toml`
//!    (or only the file given explicitly)
//! 3. Environment variables `QUILL__<SECTION>__<KEY>`, e.g.
//!    `QUILL__GENERATION__MODEL=gemini-2.5-pro`

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use quill_core::GenerationDefaults;
use quill_error::{ConfigError, QuillResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub use quill_models::{
    GEMINI_API_KEY_ENV as DEFAULT_GEMINI_API_KEY_ENV, GEMINI_BASE_URL as DEFAULT_GEMINI_BASE_URL,
};

/// Configuration file name looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "quill.toml";

const ENV_PREFIX: &str = "QUILL";
const ENV_SEPARATOR: &str = "__";

/// Gemini backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiConfig {
    /// REST endpoint base URL
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_GEMINI_API_KEY_ENV.to_string()
}

/// Recipe database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DatabaseConfig {
    /// SQLite database path
    #[serde(default = "default_database_url")]
    url: String,
    /// Maximum pooled connections
    #[serde(default = "default_pool_size")]
    pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_size: default_pool_size(),
        }
    }
}

fn default_database_url() -> String {
    "quill.db".to_string()
}

fn default_pool_size() -> u32 {
    4
}

/// Immutable process configuration, loaded once at start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct QuillConfig {
    /// Generation defaults, token floor and call timeout
    #[serde(default)]
    generation: GenerationDefaults,
    /// Gemini connection
    #[serde(default)]
    gemini: GeminiConfig,
    /// Recipe database
    #[serde(default)]
    database: DatabaseConfig,
}

impl QuillConfig {
    /// Load configuration from files and the environment.
    ///
    /// With `path`, only that file is read and it must exist. Without it,
    /// the user config directory and the working directory are searched and
    /// missing files are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a file cannot be parsed, a value has the
    /// wrong type, or validation fails.
    #[instrument(name = "config.load")]
    pub fn load(path: Option<&Path>) -> QuillResult<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                for candidate in default_paths() {
                    debug!(path = %candidate.display(), "Searching for config file");
                    builder = builder.add_source(File::from(candidate).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    /// Parse configuration from TOML text alone.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` on parse or validation failure.
    pub fn from_toml_str(text: &str) -> QuillResult<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> QuillResult<Self> {
        let loaded: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check all sections.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;

        if self.database.pool_size == 0 {
            return Err(ConfigError::new("database.pool_size must be greater than zero"));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::new("database.url cannot be empty"));
        }
        if self.gemini.base_url.trim().is_empty() {
            return Err(ConfigError::new("gemini.base_url cannot be empty"));
        }
        if self.gemini.api_key_env.trim().is_empty() {
            return Err(ConfigError::new("gemini.api_key_env cannot be empty"));
        }
        Ok(())
    }
}

/// Candidate config files, lowest precedence first.
fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("quill").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}
