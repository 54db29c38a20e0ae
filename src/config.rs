//! Runtime configuration, persisted as TOML.
//!
//! Lives at `$XDG_CONFIG_HOME/bdrc-outline/config.toml` unless overridden on
//! the command line. Every field has a default, so a missing file or an
//! empty one is a valid configuration.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LANGUAGE: &str = "bo";
pub const DEFAULT_SOURCE: &str = "Buddhist Digital Resource Center";

/// Errors from reading or writing the config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(bdrc::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(bdrc::config::parse),
        help("Check the TOML syntax in the config file. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config for {path}: {message}")]
    #[diagnostic(
        code(bdrc::config::serialize),
        help("Config paths must be valid UTF-8 to be written as TOML.")
    )]
    Serialize { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(bdrc::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL for single resources; `{id}.ttl` is appended.
    #[serde(default = "default_resource_base")]
    pub resource_base: String,
    /// Base URL for named graphs (outlines); `{id}.ttl` is appended.
    #[serde(default = "default_graph_base")]
    pub graph_base: String,
    /// Search results page.
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Language code written into every document.
    #[serde(default = "default_language")]
    pub language: String,
    /// Source name written into every document.
    #[serde(default = "default_source")]
    pub source: String,
    /// Concurrent page fetches during search.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Document cache directory. Defaults to the XDG cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_resource_base() -> String {
    "https://purl.bdrc.io/resource/".into()
}
fn default_graph_base() -> String {
    "https://purl.bdrc.io/graph/".into()
}
fn default_search_url() -> String {
    "https://library.bdrc.io/osearch/search".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("bdrc-outline/", env!("CARGO_PKG_VERSION")).into()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.into()
}
fn default_source() -> String {
    DEFAULT_SOURCE.into()
}
fn default_workers() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_base: default_resource_base(),
            graph_base: default_graph_base(),
            search_url: default_search_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            language: default_language(),
            source: default_source(),
            workers: default_workers(),
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file, or fall back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Text-level document settings taken from this config.
    pub fn document_options(&self) -> crate::outline::format::DocumentOptions {
        crate::outline::format::DocumentOptions {
            title: None,
            language: self.language.clone(),
            source: self.source.clone(),
            content: None,
        }
    }
}
