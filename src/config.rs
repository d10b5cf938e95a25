//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.event_manager.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".event_manager.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input files.
    #[serde(default)]
    pub input: InputConfig,

    /// Letter output.
    #[serde(default)]
    pub output: OutputConfig,

    /// Civic information service.
    #[serde(default)]
    pub civic: CivicConfig,
}

/// Roster and template locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Attendee roster (CSV with a header row).
    #[serde(default = "default_roster")]
    pub roster: PathBuf,

    /// Letter template.
    #[serde(default = "default_template")]
    pub template: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            template: default_template(),
        }
    }
}

fn default_roster() -> PathBuf {
    PathBuf::from("event_attendees.csv")
}

fn default_template() -> PathBuf {
    PathBuf::from("form_letter.html")
}

/// Where letters are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// Civic information API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CivicConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// File holding the API key.
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Government levels to request.
    #[serde(default = "default_levels")]
    pub levels: Vec<String>,

    /// Office roles to request.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
}

impl Default for CivicConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key_file: default_key_file(),
            timeout_seconds: default_timeout(),
            levels: default_levels(),
            roles: default_roles(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.googleapis.com/civicinfo/v2".to_string()
}

fn default_key_file() -> PathBuf {
    PathBuf::from("secret.key")
}

fn default_timeout() -> u64 {
    30
}

fn default_levels() -> Vec<String> {
    vec!["country".to_string()]
}

fn default_roles() -> Vec<String> {
    vec![
        "legislatorUpperBody".to_string(),
        "legislatorLowerBody".to_string(),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.event_manager.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref roster) = args.roster {
            self.input.roster = roster.clone();
        }
        if let Some(ref template) = args.template {
            self.input.template = template.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(ref key_file) = args.key_file {
            self.civic.key_file = key_file.clone();
        }
        if let Some(timeout) = args.timeout {
            self.civic.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
