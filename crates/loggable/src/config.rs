//! File and environment configuration.
//!
//! A configuration file declares the process minimum level, the message
//! formats and any number of directives:
//!
//! ```toml
//! min_level = "debug"
//!
//! [formats]
//! after = "${method.name} -> ${method.result} (${method.duration})"
//!
//! [[directives]]
//! type = "app::Ledger"
//! level = "info"
//!
//! [[directives]]
//! type = "app::Ledger"
//! method = "withdraw"
//! level = "warn"
//! log_on_entry = true
//! ignore = ["io::NotFound"]
//! ```
//!
//! The same structure is accepted as YAML. The format is chosen by file
//! extension.

use std::path::{Path, PathBuf};

use loggable_core::logging::{info, targets, warn};
use loggable_core::{LogLevel, Loggable, MessageFormats, ParseLevelError};
use serde::{Deserialize, Serialize};

use crate::interceptor::Interceptor;
use crate::registry::DirectiveRegistry;
use crate::sink::{self, Sink};

/// Path of the configuration file to load.
pub const CONFIG_ENV: &str = "LOGGABLE_CONFIG";
/// Overrides the configured minimum level.
pub const LEVEL_ENV: &str = "LOGGABLE_LEVEL";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    /// The file is not valid YAML for this schema.
    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A level string could not be parsed.
    #[error(transparent)]
    Level(#[from] ParseLevelError),
    /// The configuration parsed but is unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One `[[directives]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveEntry {
    /// Owning type name.
    #[serde(rename = "type")]
    pub owner: String,
    /// Method name; absent for a type-level directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// The directive itself.
    #[serde(flatten)]
    pub directive: Loggable,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggableConfig {
    /// Process-wide minimum level. `None` leaves the current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
    /// Message formats.
    pub formats: MessageFormats,
    /// Declared directives.
    pub directives: Vec<DirectiveEntry>,
}

impl LoggableConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates a `.toml`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match extension.to_lowercase().as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported config format '{other}' for {}",
                    path.display()
                )));
            }
        };
        info!(
            target: targets::CONFIG,
            "loaded {} directives from {}",
            config.directives.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `LOGGABLE_CONFIG` | path | TOML or YAML file to load |
    /// | `LOGGABLE_LEVEL` | all/trace/debug/info/warn/error/fatal/off | Minimum level |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };
        if let Some(level) = lookup(LEVEL_ENV) {
            config.min_level = Some(level.parse()?);
        }
        Ok(config)
    }

    /// Checks the configuration.
    ///
    /// Directives without a type are rejected. Unknown placeholders in the
    /// formats are only warned about, since they render verbatim.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, entry) in self.directives.iter().enumerate() {
            if entry.owner.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "directive #{} has an empty type",
                    index + 1
                )));
            }
            if entry.method.as_deref().is_some_and(|m| m.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "directive #{} for {} has an empty method",
                    index + 1,
                    entry.owner
                )));
            }
        }
        for key in self.formats.unknown_placeholders() {
            warn!(target: targets::CONFIG, "message format uses unknown placeholder ${{{}}}", key);
        }
        Ok(())
    }

    /// Builds the directive table.
    #[must_use]
    pub fn registry(&self) -> DirectiveRegistry {
        let mut registry = DirectiveRegistry::new();
        for entry in &self.directives {
            match &entry.method {
                Some(method) => {
                    registry.annotate_method(&entry.owner, method, entry.directive.clone());
                }
                None => registry.annotate_type(&entry.owner, entry.directive.clone()),
            }
        }
        registry
    }

    /// Publishes the configured minimum level, if any.
    pub fn apply(&self) {
        if let Some(level) = self.min_level {
            sink::set_min_level(level);
        }
    }

    /// Builds an interceptor with this configuration's directives and
    /// formats.
    #[must_use]
    pub fn interceptor(&self, sink: impl Sink + 'static) -> Interceptor {
        Interceptor::builder()
            .registry(self.registry())
            .formats(self.formats.clone())
            .sink(sink)
            .build()
    }
}
