// src/sack/mod.rs

//! Object store and query engine
//!
//! A `Sack` owns the objects of one kind (repositories, packages, ...) and
//! hands out `WeakPtr` handles to them. Two overlays control which objects a
//! new query starts from:
//!
//! - `includes` with `use_includes` switched on restricts queries to an
//!   allow-list (e.g. `includepkgs`)
//! - `excludes` is always subtracted afterwards (e.g. `excludepkgs`)
//!
//! Both overlays are combined lazily in `new_query()`, so changing either one
//! or adding items never triggers recomputation.

pub mod match_int64;
pub mod match_string;
pub mod query;
pub mod query_cmp;

pub use match_int64::{match_int64, match_int64_any, match_int64s, match_int64s_any};
pub use match_string::{match_string, match_string_any, match_strings, match_strings_any};
pub use query::Query;
pub use query_cmp::QueryCmp;

use crate::set::Set;
use crate::weak_ptr::{WeakPtr, WeakPtrGuard};
use std::sync::Arc;
use tracing::debug;

/// Owning store of objects with an include/exclude visibility overlay
#[derive(Debug)]
pub struct Sack<T> {
    excludes: Set<WeakPtr<T>>,
    includes: Set<WeakPtr<T>>,
    use_includes: bool,
    data: Vec<Arc<T>>,
    data_guard: WeakPtrGuard<T>,
}

impl<T> Default for Sack<T> {
    fn default() -> Self {
        Self {
            excludes: Set::new(),
            includes: Set::new(),
            use_includes: false,
            data: Vec::new(),
            data_guard: WeakPtrGuard::new(),
        }
    }
}

impl<T> Sack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `item`
    pub fn add_item(&mut self, item: T) {
        self.data.push(Arc::new(item));
        debug!("Sack now holds {} items", self.data.len());
    }

    /// Take ownership of `item` and return a handle to it
    pub fn add_item_with_return(&mut self, item: T) -> WeakPtr<T> {
        let item = Arc::new(item);
        let handle = WeakPtr::new(&item, &self.data_guard);
        self.data.push(item);
        debug!("Sack now holds {} items", self.data.len());
        handle
    }

    /// All items in insertion order, ignoring the overlays
    ///
    /// Cloning an `Arc` out of this slice keeps that item alive past the
    /// sack; handles issued for it are still invalidated.
    pub fn get_data(&self) -> &[Arc<T>] {
        &self.data
    }

    /// Number of items, ignoring the overlays
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Issue a handle for an item owned by this sack
    pub fn weak_ptr(&self, item: &Arc<T>) -> WeakPtr<T> {
        WeakPtr::new(item, &self.data_guard)
    }

    /// Handles to every item, ignoring the overlays
    pub fn all_items(&self) -> Set<WeakPtr<T>> {
        self.data.iter().map(|item| self.weak_ptr(item)).collect()
    }

    /// Number of live handles issued for items of this sack
    pub fn handle_count(&self) -> usize {
        self.data_guard.len()
    }

    /// Invalidate every handle issued so far, including the ones stored in
    /// the overlays
    ///
    /// Items stay owned by the sack; new handles can be issued afterwards.
    pub fn invalidate_handles(&mut self) {
        self.data_guard.clear();
        self.excludes.clear();
        self.includes.clear();
        debug!("Invalidated all handles of sack with {} items", self.data.len());
    }

    /// Start a query from the visible items
    ///
    /// The query is seeded from `includes` when `use_includes` is set and
    /// from all items otherwise; `excludes` is subtracted in both cases.
    pub fn new_query(&self) -> Query<WeakPtr<T>> {
        let mut result = if self.use_includes {
            self.includes.clone()
        } else {
            self.all_items()
        };
        result -= &self.excludes;
        Query::from(result)
    }

    pub fn get_excludes(&self) -> &Set<WeakPtr<T>> {
        &self.excludes
    }

    pub fn add_excludes(&mut self, items: &Set<WeakPtr<T>>) {
        self.excludes |= items;
        debug!("Sack excludes now hold {} items", self.excludes.len());
    }

    pub fn remove_excludes(&mut self, items: &Set<WeakPtr<T>>) {
        self.excludes -= items;
        debug!("Sack excludes now hold {} items", self.excludes.len());
    }

    pub fn set_excludes(&mut self, items: Set<WeakPtr<T>>) {
        self.excludes = items;
        debug!("Sack excludes set to {} items", self.excludes.len());
    }

    pub fn clear_excludes(&mut self) {
        self.excludes.clear();
    }

    pub fn get_includes(&self) -> &Set<WeakPtr<T>> {
        &self.includes
    }

    pub fn add_includes(&mut self, items: &Set<WeakPtr<T>>) {
        self.includes |= items;
        debug!("Sack includes now hold {} items", self.includes.len());
    }

    pub fn remove_includes(&mut self, items: &Set<WeakPtr<T>>) {
        self.includes -= items;
        debug!("Sack includes now hold {} items", self.includes.len());
    }

    pub fn set_includes(&mut self, items: Set<WeakPtr<T>>) {
        self.includes = items;
        debug!("Sack includes set to {} items", self.includes.len());
    }

    pub fn clear_includes(&mut self) {
        self.includes.clear();
    }

    pub fn get_use_includes(&self) -> bool {
        self.use_includes
    }

    pub fn set_use_includes(&mut self, value: bool) {
        self.use_includes = value;
    }
}
