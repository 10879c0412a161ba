// src/repository/mod.rs

//! Repositories
//!
//! This module provides:
//! - `Repo`, the repository object, and its `RepoSack` store
//! - `RepoQuery` for filtering repositories by id, name, type, state, ...
//! - the local JSON index from which repositories and packages are loaded

pub mod metadata;
pub mod repo;
pub mod repo_query;
pub mod repo_sack;

pub use metadata::{PackageMetadata, RepositoryIndex, RepositoryMetadata};
pub use repo::{Repo, RepoConfig, RepoType};
pub use repo_query::RepoQuery;
pub use repo_sack::{CMDLINE_REPO_ID, RepoSack, SYSTEM_REPO_ID};
