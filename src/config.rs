//! Run configuration: built-in defaults, optionally overridden by a YAML file.
//!
//! Every section and every field may be omitted from the file.
//!
//! ```yaml
//! blog:
//!   start_url: https://codeup.com/blog/
//!   user_agent: Codeup Data Science
//! news:
//!   url_template: https://inshorts.com/en/read/{category}
//!   categories: [business, sports, technology, entertainment]
//! spam:
//!   database: spam_db
//!   cache_path: spam.csv
//! ```

use crate::error::{AcquireError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcquireConfig {
    pub blog: BlogConfig,
    pub news: NewsConfig,
    pub spam: SpamConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// First listing page of the walk.
    pub start_url: String,
    pub user_agent: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            start_url: "https://codeup.com/blog/".to_string(),
            user_agent: "Codeup Data Science".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsConfig {
    /// Must contain `{category}`.
    pub url_template: String,
    /// Used when no categories are given on the command line.
    pub categories: Vec<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            url_template: "https://inshorts.com/en/read/{category}".to_string(),
            categories: ["business", "sports", "technology", "entertainment"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpamConfig {
    /// Database name appended to the server URL.
    pub database: String,
    pub cache_path: PathBuf,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            database: "spam_db".to_string(),
            cache_path: PathBuf::from("spam.csv"),
        }
    }
}

impl AcquireConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AcquireError::Config(e.to_string()))
    }

    #[instrument(level = "info")]
    pub async fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| AcquireError::Config(format!("reading {}: {e}", path.display())))?;
        let config = Self::from_yaml(&yaml)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p).await,
            None => Ok(Self::default()),
        }
    }
}
