// src/lib.rs

//! pkgsack
//!
//! Generic object stores and query engine for package management.
//!
//! # Architecture
//!
//! - Sacks own objects (repositories, packages) and hand out `WeakPtr` handles
//! - Handles are invalidated when their sack goes away; dereferencing an
//!   invalidated handle is an error, never undefined behavior
//! - Queries are sets of handles narrowed by chained `filter_*` calls
//! - `QueryCmp` describes how a filter compares values (exact, glob, regex,
//!   substring, ordering), optionally negated or case-insensitive

pub mod base;
pub mod config;
mod error;
pub mod packages;
pub mod repository;
pub mod sack;
pub mod set;
pub mod utils;
pub mod weak_ptr;

pub use base::Base;
pub use config::SackConfig;
pub use error::{Error, Result};
pub use packages::{Package, PackageQuery, PackageSack, PackageSet};
pub use repository::{Repo, RepoQuery, RepoSack, RepoType, RepositoryIndex};
pub use sack::{Query, QueryCmp, Sack};
pub use set::Set;
pub use weak_ptr::{SnapshotPtr, WeakPtr, WeakPtrGuard};
