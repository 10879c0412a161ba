// src/repository/metadata.rs

//! Local repository index
//!
//! The index is a JSON document listing repositories together with the
//! packages they provide. Fetching and caching remote metadata happens
//! elsewhere; this module only reads an index that is already on disk.

use super::repo::{DEFAULT_COST, DEFAULT_PRIORITY, Repo, RepoType};
use crate::error::Result;
use crate::packages::Package;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// All repositories known to one index file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryIndex {
    pub repos: Vec<RepositoryMetadata>,
}

/// One repository with its packages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Unique repository id
    pub id: String,

    /// Human readable name (defaults to the id)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "type")]
    pub repo_type: RepoType,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_priority")]
    pub priority: i64,

    #[serde(default = "default_cost")]
    pub cost: i64,

    #[serde(default)]
    pub baseurl: Vec<String>,

    #[serde(default)]
    pub packages: Vec<PackageMetadata>,
}

/// Package entry of a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,

    #[serde(default)]
    pub epoch: i64,

    pub version: String,

    pub release: String,

    /// Architecture (x86_64, aarch64, noarch, ...)
    pub arch: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub sourcerpm: Option<String>,

    #[serde(default)]
    pub provides: Vec<String>,

    #[serde(default)]
    pub requires: Vec<String>,

    /// Package size in bytes
    #[serde(default)]
    pub size: i64,
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn default_cost() -> i64 {
    DEFAULT_COST
}

impl RepositoryIndex {
    /// Read an index from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading repository index from {}", path.display());
        let content = fs::read_to_string(path)?;
        let index = Self::from_json(&content)?;
        info!("Repository index lists {} repositories", index.repos.len());
        Ok(index)
    }

    /// Parse an index from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl RepositoryMetadata {
    /// Build the repository object described by this entry
    pub fn to_repo(&self) -> Repo {
        let repo = Repo::new(self.id.clone(), self.repo_type);
        if let Some(name) = &self.name {
            repo.set_name(name.clone());
        }
        if !self.enabled {
            repo.disable();
        }
        repo.set_priority(self.priority);
        repo.set_cost(self.cost);
        repo.set_baseurl(self.baseurl.clone());
        repo
    }
}

impl PackageMetadata {
    /// Build a package belonging to `repo_id`
    pub fn to_package(&self, repo_id: &str, installed: bool) -> Package {
        let mut pkg = Package::new(&self.name, self.epoch, &self.version, &self.release, &self.arch);
        pkg.repo_id = repo_id.to_string();
        pkg.summary = self.summary.clone();
        pkg.url = self.url.clone();
        pkg.sourcerpm = self.sourcerpm.clone();
        pkg.provides = self.provides.clone();
        pkg.requires = self.requires.clone();
        pkg.size = self.size;
        pkg.installed = installed;
        pkg
    }
}
