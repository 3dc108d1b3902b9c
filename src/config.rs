//! Local configuration store.
//!
//! Manages `config.yaml`, which holds one connection profile per project
//! and a few global settings:
//!
//! ```yaml
//! current_profile: default
//! settings:
//!   timeout: 60
//!   verbosity: warn
//!   error_policy: print
//! profiles:
//!   default:
//!     token: "..."
//!     api_url: https://api.example.com
//!     websocket_url: wss://api.example.com/ws
//!     serving_url: https://serving.example.com
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{Error, ErrorPolicy, Result};

const CONFIG_ENV: &str = "AUTOML_CONFIG";
const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection bundle for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub token: String,
    pub api_url: String,
    /// Defaults to `<api_url>/admin` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    pub websocket_url: String,
    pub serving_url: String,
}

impl Profile {
    /// Check that every URL parses.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::config("profile token is empty"));
        }
        Url::parse(&self.api_url)?;
        Url::parse(&self.websocket_url)?;
        Url::parse(&self.serving_url)?;
        if let Some(admin) = &self.admin_url {
            Url::parse(admin)?;
        }
        Ok(())
    }

    /// Admin base URL, explicit or derived from the API URL.
    pub fn admin_url(&self) -> String {
        match &self.admin_url {
            Some(url) => url.clone(),
            None => format!("{}/admin", self.api_url.trim_end_matches('/')),
        }
    }
}

/// Global settings shared by all profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Per-request timeout in seconds. Does not apply to task watching.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Log filter directive used by the CLI.
    #[serde(default = "default_verbosity")]
    pub verbosity: String,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_verbosity() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            verbosity: default_verbosity(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Update one setting from its CLI name and string value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "timeout" => {
                self.timeout = value
                    .parse()
                    .map_err(|_| Error::config(format!("timeout must be seconds, got '{value}'")))?;
            },
            "verbosity" => self.verbosity = value.to_string(),
            "error-policy" | "error_policy" => self.error_policy = value.parse()?,
            other => return Err(Error::config(format!("unknown setting '{other}'"))),
        }
        Ok(())
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_profile: Option<String>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Location of the configuration file: `$AUTOML_CONFIG`, else
    /// `<config dir>/automl/config.yaml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::config("could not determine the user configuration directory"))?;
        Ok(dir.join("automl").join(CONFIG_FILE))
    }

    /// Load configuration from `path`; a missing file yields the default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {e}", path.display()))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("{} is not valid YAML: {e}", path.display())))
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Add or replace a profile. The first profile added becomes current.
    pub fn set_profile(&mut self, name: impl Into<String>, profile: Profile) -> Result<()> {
        profile.validate()?;
        let name = name.into();
        if self.current_profile.is_none() {
            self.current_profile = Some(name.clone());
        }
        self.profiles.insert(name, profile);
        Ok(())
    }

    /// Remove a profile, clearing the current selection if it pointed at it.
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        let removed = self.profiles.remove(name);
        if self.current_profile.as_deref() == Some(name) {
            self.current_profile = None;
        }
        removed
    }

    /// Select the current profile.
    pub fn use_profile(&mut self, name: &str) -> Result<()> {
        if !self.profiles.contains_key(name) {
            return Err(Error::config(format!("no profile named '{name}'")));
        }
        self.current_profile = Some(name.to_string());
        Ok(())
    }

    /// Resolve `name`, or the current profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile)> {
        let name = name
            .or(self.current_profile.as_deref())
            .ok_or_else(|| Error::config("no profile selected"))?;
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| Error::config(format!("no profile named '{name}'")))
    }
}
