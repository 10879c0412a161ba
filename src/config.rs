// src/config.rs

//! Package visibility configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Allow- and deny-lists applied to the package sack
///
/// Patterns are package names; patterns with glob metacharacters match as
/// globs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SackConfig {
    /// When non-empty, only matching packages are visible
    pub includepkgs: Vec<String>,

    /// Matching packages are hidden
    pub excludepkgs: Vec<String>,

    /// Ignore `excludepkgs`
    pub disable_excludes: bool,
}

impl SackConfig {
    /// Read a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&content).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        info!(
            "Loaded config from {}: {} include, {} exclude patterns",
            path.display(),
            config.includepkgs.len(),
            config.excludepkgs.len()
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
