// src/packages/package_query.rs

//! Queries over packages

use super::{Package, PackageSet};
use crate::error::Result;
use crate::sack::{Query, QueryCmp};
use crate::utils::glob_or_exact;
use crate::weak_ptr::WeakPtr;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Filterable set of package handles
///
/// Every filter checks that the handles are still valid before touching the
/// set and fails with `Error::InvalidatedReference` otherwise.
#[derive(Debug, Clone, Default)]
pub struct PackageQuery {
    query: Query<WeakPtr<Package>>,
}

impl PackageQuery {
    pub fn filter_name(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.filter_name_any(&[pattern], cmp)
    }

    pub fn filter_name_any<P: AsRef<str>>(&mut self, patterns: &[P], cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str_any(|pkg| pkg.value().name.clone(), patterns, cmp)
    }

    pub fn filter_epoch(&mut self, epoch: i64, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_i64(|pkg| pkg.value().epoch, epoch, cmp)
    }

    pub fn filter_version(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str(|pkg| pkg.value().version.clone(), pattern, cmp)
    }

    pub fn filter_release(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str(|pkg| pkg.value().release.clone(), pattern, cmp)
    }

    pub fn filter_arch(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.filter_arch_any(&[pattern], cmp)
    }

    pub fn filter_arch_any<P: AsRef<str>>(&mut self, patterns: &[P], cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str_any(|pkg| pkg.value().arch.clone(), patterns, cmp)
    }

    /// Filter by NEVRA
    ///
    /// A package matches if either its short form (epoch omitted when zero)
    /// or its full form matches.
    pub fn filter_nevra(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_strs(
            |pkg| {
                let pkg = pkg.value();
                vec![pkg.nevra(), pkg.full_nevra()]
            },
            pattern,
            cmp,
        )
    }

    pub fn filter_repo_id(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.filter_repo_id_any(&[pattern], cmp)
    }

    pub fn filter_repo_id_any<P: AsRef<str>>(&mut self, patterns: &[P], cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str_any(|pkg| pkg.value().repo_id.clone(), patterns, cmp)
    }

    pub fn filter_summary(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str(|pkg| pkg.value().summary.clone(), pattern, cmp)
    }

    /// Filter by URL; `ISNULL` keeps packages without one
    pub fn filter_url(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_opt_str_any(|pkg| pkg.value().url.clone(), &[pattern], cmp)
    }

    /// Filter by source package name; `ISNULL` keeps packages without one
    pub fn filter_sourcerpm(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query
            .filter_opt_str_any(|pkg| pkg.value().sourcerpm.clone(), &[pattern], cmp)
    }

    pub fn filter_provides(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.filter_provides_any(&[pattern], cmp)
    }

    pub fn filter_provides_any<P: AsRef<str>>(&mut self, patterns: &[P], cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_strs_any(|pkg| pkg.value().provides.clone(), patterns, cmp)
    }

    pub fn filter_requires(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_strs(|pkg| pkg.value().requires.clone(), pattern, cmp)
    }

    pub fn filter_size(&mut self, size: i64, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_i64(|pkg| pkg.value().size, size, cmp)
    }

    /// Keep installed packages
    pub fn filter_installed(&mut self) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_bool(|pkg| pkg.value().installed, true, QueryCmp::EQ)
    }

    /// Keep packages that are not installed
    pub fn filter_available(&mut self) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_bool(|pkg| pkg.value().installed, false, QueryCmp::EQ)
    }

    /// Narrow the query to the packages a user supplied spec refers to
    ///
    /// The spec is matched against package names first and, if no name
    /// matches, against NEVRAs. Specs with glob metacharacters are matched
    /// as globs, anything else exactly. Returns whether anything matched.
    pub fn resolve_spec(&mut self, spec: &str) -> Result<bool> {
        let cmp = glob_or_exact(spec);

        let mut by_name = self.clone();
        by_name.filter_name(spec, cmp)?;
        if !by_name.is_empty() {
            debug!("Spec {} resolved by name to {} packages", spec, by_name.len());
            *self = by_name;
            return Ok(true);
        }

        self.filter_nevra(spec, cmp)?;
        debug!("Spec {} resolved by NEVRA to {} packages", spec, self.len());
        Ok(!self.is_empty())
    }

    /// NEVRAs of the query, sorted
    pub fn nevras(&self) -> Result<Vec<String>> {
        let mut nevras = self
            .query
            .iter()
            .map(|pkg| pkg.with(Package::nevra))
            .collect::<Result<Vec<_>>>()?;
        nevras.sort();
        Ok(nevras)
    }
}

impl Deref for PackageQuery {
    type Target = Query<WeakPtr<Package>>;

    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl DerefMut for PackageQuery {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}

impl From<Query<WeakPtr<Package>>> for PackageQuery {
    fn from(query: Query<WeakPtr<Package>>) -> Self {
        Self { query }
    }
}

impl From<PackageSet> for PackageQuery {
    fn from(set: PackageSet) -> Self {
        Self {
            query: Query::from(set),
        }
    }
}

impl From<PackageQuery> for PackageSet {
    fn from(query: PackageQuery) -> Self {
        query.query.into_set()
    }
}
