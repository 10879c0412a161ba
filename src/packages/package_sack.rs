// src/packages/package_sack.rs

//! Package store

use super::{Package, PackageQuery, PackageSet};
use crate::config::SackConfig;
use crate::error::Result;
use crate::sack::Sack;
use crate::utils::glob_or_exact;
use crate::weak_ptr::WeakPtr;
use std::ops::{Deref, DerefMut};
use tracing::{debug, info};

/// Sack of packages from all repositories
#[derive(Debug, Default)]
pub struct PackageSack {
    sack: Sack<Package>,
}

impl PackageSack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `pkg` and return a handle to it
    pub fn add_package(&mut self, pkg: Package) -> WeakPtr<Package> {
        self.sack.add_item_with_return(pkg)
    }

    /// Query over the visible packages
    pub fn new_query(&self) -> PackageQuery {
        PackageQuery::from(self.sack.new_query())
    }

    /// Handles of all packages whose name matches any of `patterns`
    ///
    /// Patterns containing glob metacharacters are matched as globs, all
    /// others exactly. The overlays are not applied.
    pub fn resolve_names<P: AsRef<str>>(&self, patterns: &[P]) -> Result<PackageSet> {
        let mut result = PackageSet::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let mut query = PackageQuery::from(self.sack.all_items());
            query.filter_name(pattern, glob_or_exact(pattern))?;
            result |= query.list();
        }
        Ok(result)
    }

    /// Replace the overlays with the ones described by `config`
    ///
    /// Non-empty `includepkgs` restricts queries to the matching packages;
    /// `excludepkgs` hides the matching packages unless `disable_excludes`
    /// is set.
    pub fn apply_config(&mut self, config: &SackConfig) -> Result<()> {
        let includes = self.resolve_names(&config.includepkgs)?;
        let excludes = if config.disable_excludes {
            PackageSet::new()
        } else {
            self.resolve_names(&config.excludepkgs)?
        };

        info!(
            "Applying package config: {} included, {} excluded",
            includes.len(),
            excludes.len()
        );

        self.sack.set_use_includes(!config.includepkgs.is_empty());
        self.sack.set_includes(includes);
        self.sack.set_excludes(excludes);
        debug!("Package sack overlays updated");
        Ok(())
    }
}

impl Deref for PackageSack {
    type Target = Sack<Package>;

    fn deref(&self) -> &Self::Target {
        &self.sack
    }
}

impl DerefMut for PackageSack {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.sack
    }
}
