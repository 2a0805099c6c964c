//! Optional YAML configuration
//!
//! ```yaml
//! title: Terraform Plan
//! workspace: networking
//! var_file: tfvars/dev.tfvars
//! marker: "<!-- tf-pr-comment:networking -->"
//! api_url: https://github.example.com/api/v3
//! ```
//!
//! Command-line values always win over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::traits::FileSystem;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".tfcomment.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentConfig {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub marker: Option<String>,

    #[serde(default)]
    pub workspace: Option<String>,

    #[serde(default)]
    pub var_file: Option<String>,

    #[serde(default)]
    pub api_url: Option<String>,
}

impl CommentConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).context("Failed to parse configuration")
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !fs.exists(default) {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(path = %path.display(), "Loading configuration");
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {:?}", path))?;

        Self::from_yaml(&contents).with_context(|| format!("Invalid configuration in {:?}", path))
    }
}
