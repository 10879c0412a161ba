// src/repository/repo.rs

//! Repository objects stored in a `RepoSack`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default priority of a repository (lower value = preferred)
pub const DEFAULT_PRIORITY: i64 = 99;

/// Default cost of a repository
pub const DEFAULT_COST: i64 = 1000;

/// Kind of repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    /// Regular repository with available packages
    #[default]
    Available,

    /// Packages installed on the system
    System,

    /// Packages passed on the command line
    Commandline,
}

impl RepoType {
    pub fn as_str(&self) -> &str {
        match self {
            RepoType::Available => "available",
            RepoType::System => "system",
            RepoType::Commandline => "commandline",
        }
    }

    /// Stable numeric code used for integer filtering
    pub fn code(&self) -> i64 {
        match self {
            RepoType::Available => 0,
            RepoType::System => 1,
            RepoType::Commandline => 2,
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable part of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub name: String,
    pub enabled: bool,
    pub priority: i64,
    pub cost: i64,
    pub baseurl: Vec<String>,
}

/// A repository
///
/// Repositories are owned by the `RepoSack` and shared through handles, so
/// the configurable part sits behind a lock and can be changed through a
/// shared reference (e.g. when enabling source repositories).
#[derive(Debug)]
pub struct Repo {
    id: String,
    repo_type: RepoType,
    config: RwLock<RepoConfig>,
}

impl Repo {
    /// Create an enabled repository with default configuration
    pub fn new(id: impl Into<String>, repo_type: RepoType) -> Self {
        let id = id.into();
        Self {
            config: RwLock::new(RepoConfig {
                name: id.clone(),
                enabled: true,
                priority: DEFAULT_PRIORITY,
                cost: DEFAULT_COST,
                baseurl: Vec::new(),
            }),
            id,
            repo_type,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RepoConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RepoConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn repo_type(&self) -> RepoType {
        self.repo_type
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.write().name = name.into();
    }

    pub fn is_enabled(&self) -> bool {
        self.read().enabled
    }

    pub fn enable(&self) {
        self.write().enabled = true;
    }

    pub fn disable(&self) {
        self.write().enabled = false;
    }

    pub fn priority(&self) -> i64 {
        self.read().priority
    }

    pub fn set_priority(&self, priority: i64) {
        self.write().priority = priority;
    }

    pub fn cost(&self) -> i64 {
        self.read().cost
    }

    pub fn set_cost(&self, cost: i64) {
        self.write().cost = cost;
    }

    pub fn baseurl(&self) -> Vec<String> {
        self.read().baseurl.clone()
    }

    pub fn set_baseurl(&self, baseurl: Vec<String>) {
        self.write().baseurl = baseurl;
    }

    /// Copy of the current configuration
    pub fn config(&self) -> RepoConfig {
        self.read().clone()
    }
}

impl Clone for Repo {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            repo_type: self.repo_type,
            config: RwLock::new(self.config()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_defaults() {
        let repo = Repo::new("fedora", RepoType::Available);
        assert_eq!(repo.id(), "fedora");
        assert_eq!(repo.name(), "fedora");
        assert!(repo.is_enabled());
        assert_eq!(repo.priority(), DEFAULT_PRIORITY);
        assert_eq!(repo.cost(), DEFAULT_COST);
        assert!(repo.baseurl().is_empty());
    }

    #[test]
    fn test_repo_config_through_shared_reference() {
        let repo = Repo::new("updates", RepoType::Available);
        let shared = &repo;
        shared.disable();
        shared.set_priority(10);
        shared.set_name("Fedora Updates");
        assert!(!repo.is_enabled());
        assert_eq!(repo.priority(), 10);
        assert_eq!(repo.name(), "Fedora Updates");
    }

    #[test]
    fn test_clone_is_independent() {
        let repo = Repo::new("a", RepoType::System);
        let copy = repo.clone();
        copy.disable();
        assert!(repo.is_enabled());
        assert_eq!(copy.repo_type(), RepoType::System);
    }

    #[test]
    fn test_repo_type_serde() {
        let t: RepoType = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(t, RepoType::System);
        assert_eq!(serde_json::to_string(&RepoType::Commandline).unwrap(), "\"commandline\"");
    }
}
