// src/packages/mod.rs

//! Packages and package queries
//!
//! Packages are owned by a `PackageSack` and addressed through `WeakPtr`
//! handles. `PackageQuery` filters those handles by any package attribute.

pub mod package;
pub mod package_query;
pub mod package_sack;

pub use package::Package;
pub use package_query::PackageQuery;
pub use package_sack::PackageSack;

use crate::set::Set;
use crate::weak_ptr::WeakPtr;

/// Set of package handles
pub type PackageSet = Set<WeakPtr<Package>>;
