//! Configuration management for the gh-branch-protection CLI.
//!
//! The configuration is stored in TOML format and is optional. It is loaded from
//! the path given with `--config` (or `GH_BRANCH_PROTECTION_CONFIG`), or from
//! `.gh-branch-protection.toml` in the current directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use github_client::{pagination::MAX_PAGE_SIZE, ApiEndpoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = ".gh-branch-protection.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the CLI.
///
/// # Example TOML Configuration
///
/// ```toml
/// [api]
/// page_size = 50
/// graphql_url = "https://ghe.example.com/api/graphql"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Settings for talking to the GraphQL API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Number of entries requested per page when listing, between 1 and 100.
    #[serde(default = "ApiConfig::default_page_size")]
    pub page_size: u32,

    /// Overrides the GraphQL endpoint derived from the repository host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_url: Option<String>,
}

impl ApiConfig {
    fn default_page_size() -> u32 {
        MAX_PAGE_SIZE
    }

    /// Returns the endpoint to use for `host`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `graphql_url` is set but invalid.
    pub fn endpoint_for(&self, host: &str) -> Result<ApiEndpoint, Error> {
        match &self.graphql_url {
            Some(url) => ApiEndpoint::from_graphql_url(url).map_err(|e| Error::Config(e.to_string())),
            None => Ok(ApiEndpoint::for_host(host)),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            graphql_url: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, is not
    /// valid TOML, or holds out-of-range values.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration for a run.
    ///
    /// An explicitly given file must exist. Without one, the default file is used
    /// when present and the built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the explicit file is missing, or if the file in
    /// use cannot be parsed or fails validation.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self, Error> {
        let path = get_config_path(config_path);
        if config_path.is_none() && !path.exists() {
            debug!("No configuration file found, using defaults");
            return Ok(Self::default());
        }

        Self::load(&path)
    }

    fn validate(&self) -> Result<(), Error> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.api.page_size) {
            return Err(Error::Config(format!(
                "api.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.api.page_size
            )));
        }

        Ok(())
    }
}

/// Resolves the path to the configuration file.
///
/// Returns `config_path` when given, otherwise `./.gh-branch-protection.toml`.
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        // Look for config in current directory
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}
