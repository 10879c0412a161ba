// src/base.rs

//! Session context owning the repository and package sacks

use crate::config::SackConfig;
use crate::error::Result;
use crate::packages::PackageSack;
use crate::repository::{RepoSack, RepoType, RepositoryIndex};
use tracing::{debug, info, warn};

/// Owner of all sacks of one session
///
/// Fields drop in declaration order, so the package sack (whose packages
/// refer to repositories by id) is torn down before the repository sack.
#[derive(Debug, Default)]
pub struct Base {
    config: SackConfig,
    package_sack: PackageSack,
    repo_sack: RepoSack,
}

impl Base {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SackConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SackConfig {
        &self.config
    }

    /// Replace the configuration and re-apply it to the package sack
    pub fn set_config(&mut self, config: SackConfig) -> Result<()> {
        self.config = config;
        self.package_sack.apply_config(&self.config)
    }

    pub fn get_repo_sack(&self) -> &RepoSack {
        &self.repo_sack
    }

    pub fn get_repo_sack_mut(&mut self) -> &mut RepoSack {
        &mut self.repo_sack
    }

    pub fn get_package_sack(&self) -> &PackageSack {
        &self.package_sack
    }

    pub fn get_package_sack_mut(&mut self) -> &mut PackageSack {
        &mut self.package_sack
    }

    /// Populate both sacks from a repository index
    ///
    /// Every repository of the index is added; packages are loaded only from
    /// enabled ones. Packages of system repositories are marked installed.
    /// Entries whose id is already present are skipped along with their
    /// packages. The configuration is applied afterwards.
    ///
    /// Returns the number of packages loaded.
    pub fn load_index(&mut self, index: &RepositoryIndex) -> Result<usize> {
        let mut loaded = 0;

        for meta in &index.repos {
            if self.repo_sack.find(&meta.id)?.is_some() {
                warn!("Skipping duplicate repository {}", meta.id);
                continue;
            }
            self.repo_sack.add_repo(meta.to_repo())?;

            if !meta.enabled {
                debug!("Repository {} is disabled, skipping its packages", meta.id);
                continue;
            }

            let installed = meta.repo_type == RepoType::System;
            for pkg in &meta.packages {
                self.package_sack.add_package(pkg.to_package(&meta.id, installed));
            }
            loaded += meta.packages.len();
            debug!("Loaded {} packages from {}", meta.packages.len(), meta.id);
        }

        self.package_sack.apply_config(&self.config)?;
        info!(
            "Loaded {} packages from {} repositories",
            loaded,
            index.repos.len()
        );
        Ok(loaded)
    }
}
