// src/sack/query.rs

//! Filterable views over sets of objects
//!
//! A `Query` is a `Set` that can be narrowed in place. Each `filter_*` call
//! evaluates an accessor on every remaining object and drops the objects
//! that do not match, so consecutive calls combine as logical AND while the
//! patterns passed to one call combine as logical OR.
//!
//! Operator validation and pattern compilation happen before the set is
//! touched: a call that returns an error leaves the query unchanged.

use super::match_int64::Int64Matcher;
use super::match_string::StringMatcher;
use super::query_cmp::{Predicate, QueryCmp};
use crate::error::{Error, Result};
use crate::set::Set;
use crate::weak_ptr::WeakPtr;
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// A set of objects narrowed by chained filter calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<T: Ord> {
    data: Set<T>,
}

impl<T: Ord> Default for Query<T> {
    fn default() -> Self {
        Self { data: Set::new() }
    }
}

impl<T: Ord> Query<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the single object of the query
    ///
    /// Fails with `Error::NotExactlyOne` unless exactly one object is left.
    pub fn get(&self) -> Result<&T> {
        match self.data.len() {
            1 => self.data.iter().next().ok_or(Error::NotExactlyOne(0)),
            n => Err(Error::NotExactlyOne(n)),
        }
    }

    /// All objects matching the query so far
    pub fn list(&self) -> &Set<T> {
        &self.data
    }

    pub fn into_set(self) -> Set<T> {
        self.data
    }

    /// Keep the objects for which `keep` returns true
    ///
    /// This is the primitive every typed filter is built on.
    pub fn filter_with<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.data.len();
        self.data.retain(|obj| keep(obj));
        trace!("Query filter kept {} of {} objects", self.data.len(), before);
    }

    /// Filter by a string attribute against one pattern
    pub fn filter_str<F, S>(&mut self, getter: F, pattern: &str, cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> S,
        S: AsRef<str>,
    {
        self.filter_str_any(getter, &[pattern], cmp)
    }

    /// Filter by a string attribute; an object is kept if any pattern matches
    pub fn filter_str_any<F, S, P>(&mut self, getter: F, patterns: &[P], cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> S,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let matcher = StringMatcher::new(cmp, patterns)?;
        self.filter_with(|obj| matcher.matches(getter(obj).as_ref()));
        Ok(())
    }

    /// Filter by a list-of-strings attribute against one pattern
    pub fn filter_strs<F, S>(&mut self, getter: F, pattern: &str, cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> Vec<S>,
        S: AsRef<str>,
    {
        self.filter_strs_any(getter, &[pattern], cmp)
    }

    /// Filter by a list-of-strings attribute; an object is kept if any of its
    /// values matches any pattern
    pub fn filter_strs_any<F, S, P>(&mut self, getter: F, patterns: &[P], cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> Vec<S>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let matcher = StringMatcher::new(cmp, patterns)?;
        self.filter_with(|obj| {
            let values = getter(obj);
            matcher.matches_any(values.iter().map(AsRef::as_ref))
        });
        Ok(())
    }

    /// Filter by an optional string attribute; `ISNULL` selects objects
    /// without a value
    pub fn filter_opt_str_any<F, S, P>(&mut self, getter: F, patterns: &[P], cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> Option<S>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let matcher = StringMatcher::new_optional(cmp, patterns)?;
        self.filter_with(|obj| {
            let value = getter(obj);
            matcher.matches_optional(value.as_ref().map(AsRef::as_ref))
        });
        Ok(())
    }

    /// Filter by an integer attribute against one pattern
    pub fn filter_i64<F>(&mut self, getter: F, pattern: i64, cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> i64,
    {
        self.filter_i64_any(getter, &[pattern], cmp)
    }

    /// Filter by an integer attribute; an object is kept if any pattern matches
    pub fn filter_i64_any<F>(&mut self, getter: F, patterns: &[i64], cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> i64,
    {
        let matcher = Int64Matcher::new(cmp, patterns)?;
        self.filter_with(|obj| matcher.matches(getter(obj)));
        Ok(())
    }

    /// Filter by a list-of-integers attribute against one pattern
    pub fn filter_i64s<F>(&mut self, getter: F, pattern: i64, cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> Vec<i64>,
    {
        self.filter_i64s_any(getter, &[pattern], cmp)
    }

    /// Filter by a list-of-integers attribute; kept if any value matches any
    /// pattern
    pub fn filter_i64s_any<F>(&mut self, getter: F, patterns: &[i64], cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> Vec<i64>,
    {
        let matcher = Int64Matcher::new(cmp, patterns)?;
        self.filter_with(|obj| matcher.matches_any(getter(obj)));
        Ok(())
    }

    /// Filter by a boolean attribute; only `EQ` and `NEQ` apply
    pub fn filter_bool<F>(&mut self, getter: F, pattern: bool, cmp: QueryCmp) -> Result<()>
    where
        F: Fn(&T) -> bool,
    {
        if cmp.predicate() != Some(Predicate::Eq) || cmp.is_case_insensitive() {
            return Err(Error::UnsupportedOperation { cmp, kind: "bool" });
        }
        let negate = cmp.is_negated();
        self.filter_with(|obj| (getter(obj) == pattern) != negate);
        Ok(())
    }
}

impl<T> Query<WeakPtr<T>> {
    /// Fail with `Error::InvalidatedReference` if any handle in the query was
    /// invalidated
    ///
    /// Domain queries call this before filtering so their accessors can
    /// dereference handles without further checks.
    pub fn ensure_valid(&self) -> Result<()> {
        if self.data.iter().all(WeakPtr::is_valid) {
            Ok(())
        } else {
            Err(Error::InvalidatedReference)
        }
    }
}

impl<T: Ord> Deref for Query<T> {
    type Target = Set<T>;

    fn deref(&self) -> &Set<T> {
        &self.data
    }
}

impl<T: Ord> DerefMut for Query<T> {
    fn deref_mut(&mut self) -> &mut Set<T> {
        &mut self.data
    }
}

impl<T: Ord> From<Set<T>> for Query<T> {
    fn from(data: Set<T>) -> Self {
        Self { data }
    }
}

impl<T: Ord> From<Query<T>> for Set<T> {
    fn from(query: Query<T>) -> Self {
        query.data
    }
}

impl<T: Ord> FromIterator<T> for Query<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> IntoIterator for Query<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T: Ord> IntoIterator for &'a Query<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
