// src/repository/repo_query.rs

//! Queries over repositories

use super::repo::{Repo, RepoType};
use crate::error::Result;
use crate::sack::{Query, QueryCmp};
use crate::set::Set;
use crate::weak_ptr::WeakPtr;
use std::ops::{Deref, DerefMut};

/// Filterable set of repository handles
#[derive(Debug, Clone, Default)]
pub struct RepoQuery {
    query: Query<WeakPtr<Repo>>,
}

impl RepoQuery {
    pub fn filter_id(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.filter_id_any(&[pattern], cmp)
    }

    pub fn filter_id_any<P: AsRef<str>>(&mut self, patterns: &[P], cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query
            .filter_str_any(|repo| repo.value().id().to_string(), patterns, cmp)
    }

    pub fn filter_name(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.filter_name_any(&[pattern], cmp)
    }

    pub fn filter_name_any<P: AsRef<str>>(&mut self, patterns: &[P], cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_str_any(|repo| repo.value().name(), patterns, cmp)
    }

    /// Keep enabled (`true`) or disabled (`false`) repositories
    pub fn filter_enabled(&mut self, enabled: bool) -> Result<()> {
        self.query.ensure_valid()?;
        self.query
            .filter_bool(|repo| repo.value().is_enabled(), enabled, QueryCmp::EQ)
    }

    /// Filter by repository type; `EQ` and `NEQ` are meaningful here
    pub fn filter_type(&mut self, repo_type: RepoType, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query
            .filter_i64(|repo| repo.value().repo_type().code(), repo_type.code(), cmp)
    }

    pub fn filter_priority(&mut self, priority: i64, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_i64(|repo| repo.value().priority(), priority, cmp)
    }

    /// Filter by base URL; a repository matches if any of its URLs does
    pub fn filter_baseurl(&mut self, pattern: &str, cmp: QueryCmp) -> Result<()> {
        self.query.ensure_valid()?;
        self.query.filter_strs(|repo| repo.value().baseurl(), pattern, cmp)
    }

    /// Repository ids of the query, sorted
    pub fn ids(&self) -> Result<Vec<String>> {
        let mut ids = self
            .query
            .iter()
            .map(|repo| repo.with(|repo| repo.id().to_string()))
            .collect::<Result<Vec<_>>>()?;
        ids.sort();
        Ok(ids)
    }
}

impl Deref for RepoQuery {
    type Target = Query<WeakPtr<Repo>>;

    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl DerefMut for RepoQuery {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}

impl From<Query<WeakPtr<Repo>>> for RepoQuery {
    fn from(query: Query<WeakPtr<Repo>>) -> Self {
        Self { query }
    }
}

impl From<Set<WeakPtr<Repo>>> for RepoQuery {
    fn from(set: Set<WeakPtr<Repo>>) -> Self {
        Self {
            query: Query::from(set),
        }
    }
}
