// src/repository/repo_sack.rs

//! Repository store

use super::repo::{Repo, RepoType};
use super::repo_query::RepoQuery;
use crate::error::{Error, Result};
use crate::sack::{QueryCmp, Sack};
use crate::weak_ptr::WeakPtr;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Id of the repository holding installed packages
pub const SYSTEM_REPO_ID: &str = "@System";

/// Id of the repository holding packages given on the command line
pub const CMDLINE_REPO_ID: &str = "@commandline";

/// Sack of repositories with unique ids
#[derive(Debug, Default)]
pub struct RepoSack {
    sack: Sack<Repo>,
}

impl RepoSack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new enabled repository with default configuration
    ///
    /// Fails if a repository with the same id already exists.
    pub fn create_repo(&mut self, id: &str) -> Result<WeakPtr<Repo>> {
        self.add_repo(Repo::new(id, RepoType::Available))
    }

    /// Add a fully configured repository
    pub fn add_repo(&mut self, repo: Repo) -> Result<WeakPtr<Repo>> {
        if self.find(repo.id())?.is_some() {
            return Err(Error::RepoAlreadyExists(repo.id().to_string()));
        }
        debug!("Creating repository {} ({})", repo.id(), repo.repo_type());
        Ok(self.sack.add_item_with_return(repo))
    }

    /// Look up a repository by exact id
    pub fn find(&self, id: &str) -> Result<Option<WeakPtr<Repo>>> {
        let mut query = self.query_all();
        query.filter_id(id, QueryCmp::EQ)?;
        Ok(query.iter().next().cloned())
    }

    /// Look up a repository by exact id, failing if it does not exist
    pub fn get_repo(&self, id: &str) -> Result<WeakPtr<Repo>> {
        self.find(id)?
            .ok_or_else(|| Error::RepoNotFound(id.to_string()))
    }

    /// Return the system repository, creating it on first use
    pub fn get_system_repo(&mut self) -> Result<WeakPtr<Repo>> {
        self.get_or_create(SYSTEM_REPO_ID, RepoType::System)
    }

    pub fn has_system_repo(&self) -> bool {
        matches!(self.find(SYSTEM_REPO_ID), Ok(Some(_)))
    }

    /// Return the command line repository, creating it on first use
    pub fn get_cmdline_repo(&mut self) -> Result<WeakPtr<Repo>> {
        self.get_or_create(CMDLINE_REPO_ID, RepoType::Commandline)
    }

    pub fn has_cmdline_repo(&self) -> bool {
        matches!(self.find(CMDLINE_REPO_ID), Ok(Some(_)))
    }

    fn get_or_create(&mut self, id: &str, repo_type: RepoType) -> Result<WeakPtr<Repo>> {
        match self.find(id)? {
            Some(repo) => Ok(repo),
            None => self.add_repo(Repo::new(id, repo_type)),
        }
    }

    /// Query over the visible repositories
    pub fn new_query(&self) -> RepoQuery {
        RepoQuery::from(self.sack.new_query())
    }

    /// Query over all repositories, ignoring the overlays
    fn query_all(&self) -> RepoQuery {
        RepoQuery::from(self.sack.all_items())
    }

    /// For every enabled repository enable the matching source repository
    ///
    /// `<id>-rpms` maps to `<id>-source-rpms`, anything else to `<id>-source`.
    pub fn enable_source_repos(&mut self) -> Result<usize> {
        self.enable_companion_repos("-source-rpms", "-source")
    }

    /// For every enabled repository enable the matching debug repository
    ///
    /// `<id>-rpms` maps to `<id>-debug-rpms`, anything else to `<id>-debuginfo`.
    pub fn enable_debug_repos(&mut self) -> Result<usize> {
        self.enable_companion_repos("-debug-rpms", "-debuginfo")
    }

    fn enable_companion_repos(&mut self, rpms_suffix: &str, suffix: &str) -> Result<usize> {
        let mut enabled = self.query_all();
        enabled.filter_enabled(true)?;

        let companion_ids: Vec<String> = enabled
            .ids()?
            .into_iter()
            .map(|id| match id.strip_suffix("-rpms") {
                Some(stem) => format!("{}{}", stem, rpms_suffix),
                None => format!("{}{}", id, suffix),
            })
            .collect();

        let mut companions = self.query_all();
        companions.filter_id_any(&companion_ids, QueryCmp::EQ)?;
        companions.filter_enabled(false)?;

        let mut count = 0;
        for repo in companions.iter() {
            let repo = repo.get()?;
            debug!("Enabling repository {}", repo.id());
            repo.enable();
            count += 1;
        }
        Ok(count)
    }
}

impl Deref for RepoSack {
    type Target = Sack<Repo>;

    fn deref(&self) -> &Self::Target {
        &self.sack
    }
}

impl DerefMut for RepoSack {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.sack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo_rejects_duplicates() {
        let mut sack = RepoSack::new();
        let repo = sack.create_repo("fedora").unwrap();
        assert_eq!(repo.value().id(), "fedora");
        assert!(matches!(
            sack.create_repo("fedora"),
            Err(Error::RepoAlreadyExists(id)) if id == "fedora"
        ));
        assert_eq!(sack.len(), 1);
    }

    #[test]
    fn test_get_repo() {
        let mut sack = RepoSack::new();
        let created = sack.create_repo("updates").unwrap();
        assert_eq!(sack.get_repo("updates").unwrap(), created);
        assert!(matches!(sack.get_repo("missing"), Err(Error::RepoNotFound(_))));
    }

    #[test]
    fn test_system_repo_created_once() {
        let mut sack = RepoSack::new();
        assert!(!sack.has_system_repo());
        let first = sack.get_system_repo().unwrap();
        let second = sack.get_system_repo().unwrap();
        assert!(sack.has_system_repo());
        assert_eq!(first, second);
        assert_eq!(first.value().repo_type(), RepoType::System);
        assert_eq!(sack.len(), 1);

        let cmdline = sack.get_cmdline_repo().unwrap();
        assert!(sack.has_cmdline_repo());
        assert_eq!(cmdline.value().id(), CMDLINE_REPO_ID);
    }

    #[test]
    fn test_enable_source_repos() {
        let mut sack = RepoSack::new();
        sack.create_repo("fedora").unwrap();
        sack.create_repo("rhel-9-rpms").unwrap();
        let fedora_source = sack.create_repo("fedora-source").unwrap();
        let rhel_source = sack.create_repo("rhel-9-source-rpms").unwrap();
        let off = sack.create_repo("off").unwrap();
        let off_source = sack.create_repo("off-source").unwrap();
        fedora_source.value().disable();
        rhel_source.value().disable();
        off.value().disable();
        off_source.value().disable();

        assert_eq!(sack.enable_source_repos().unwrap(), 2);
        assert!(fedora_source.value().is_enabled());
        assert!(rhel_source.value().is_enabled());
        assert!(!off_source.value().is_enabled());
    }

    #[test]
    fn test_enable_debug_repos() {
        let mut sack = RepoSack::new();
        sack.create_repo("fedora").unwrap();
        sack.create_repo("appstream-rpms").unwrap();
        let debuginfo = sack.create_repo("fedora-debuginfo").unwrap();
        let debug_rpms = sack.create_repo("appstream-debug-rpms").unwrap();
        debuginfo.value().disable();
        debug_rpms.value().disable();

        assert_eq!(sack.enable_debug_repos().unwrap(), 2);
        assert!(debuginfo.value().is_enabled());
        assert!(debug_rpms.value().is_enabled());
    }

    #[test]
    fn test_repo_query_filters() {
        let mut sack = RepoSack::new();
        let fedora = sack.create_repo("fedora").unwrap();
        let updates = sack.create_repo("updates").unwrap();
        sack.get_system_repo().unwrap();
        updates.value().set_priority(10);
        updates.value().set_baseurl(vec!["https://mirror.example/updates/".to_string()]);
        fedora.value().set_name("Fedora 40");

        let mut query = sack.new_query();
        query.filter_type(RepoType::System, QueryCmp::NEQ).unwrap();
        assert_eq!(query.ids().unwrap(), vec!["fedora", "updates"]);

        let mut query = sack.new_query();
        query.filter_priority(50, QueryCmp::LT).unwrap();
        assert_eq!(query.get().unwrap(), &updates);

        let mut query = sack.new_query();
        query.filter_baseurl("*mirror.example*", QueryCmp::GLOB).unwrap();
        assert_eq!(query.ids().unwrap(), vec!["updates"]);

        let mut query = sack.new_query();
        query.filter_name("fedora*", QueryCmp::IGLOB).unwrap();
        assert_eq!(query.ids().unwrap(), vec!["fedora"]);

        let mut query = sack.new_query();
        query.filter_id_any(&["fed*", "@*"], QueryCmp::GLOB).unwrap();
        assert_eq!(query.ids().unwrap(), vec!["@System", "fedora"]);

        fedora.value().disable();
        let mut query = sack.new_query();
        query.filter_enabled(false).unwrap();
        assert_eq!(query.ids().unwrap(), vec!["fedora"]);
    }

    #[test]
    fn test_query_on_invalidated_handles_fails() {
        let mut sack = RepoSack::new();
        sack.create_repo("fedora").unwrap();
        let mut query = sack.new_query();
        sack.invalidate_handles();
        assert!(matches!(
            query.filter_id("fedora", QueryCmp::EQ),
            Err(Error::InvalidatedReference)
        ));
    }
}
