// src/set.rs

//! Ordered set with set algebra
//!
//! `Set` is the container behind every sack-backed collection (package
//! sets, repository sets, query results). Elements are kept sorted and
//! unique; the operators mirror Python's set operators:
//!
//! - `|` / `|=` union
//! - `&` / `&=` intersection
//! - `-` / `-=` difference
//! - `^` / `^=` symmetric difference

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

/// Ordered, duplicate-free collection of objects
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Set<T: Ord> {
    data: BTreeSet<T>,
}

impl<T: Ord> Default for Set<T> {
    fn default() -> Self {
        Self {
            data: BTreeSet::new(),
        }
    }
}

impl<T: Ord> Set<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object; returns true if it was not present yet
    pub fn add(&mut self, obj: T) -> bool {
        self.data.insert(obj)
    }

    /// Remove an object; returns true if it was present
    pub fn remove(&mut self, obj: &T) -> bool {
        self.data.remove(obj)
    }

    pub fn contains(&self, obj: &T) -> bool {
        self.data.contains(obj)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.data.iter()
    }

    /// Keep only the objects for which `keep` returns true
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.data.retain(keep);
    }

    /// Read-only access to the underlying ordered storage
    pub fn get_data(&self) -> &BTreeSet<T> {
        &self.data
    }

    pub fn into_inner(self) -> BTreeSet<T> {
        self.data
    }

    /// True if every object of `self` is also in `other`
    pub fn is_subset(&self, other: &Self) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut theirs = other.data.iter();
        'outer: for mine in &self.data {
            for candidate in theirs.by_ref() {
                match candidate.cmp(mine) {
                    Ordering::Less => continue,
                    Ordering::Equal => continue 'outer,
                    Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    /// True if every object of `other` is also in `self`
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }
}

impl<T: Ord + Clone> Set<T> {
    /// Add all objects of `other` (in-place union)
    ///
    /// Mutates `self`; use `&a | &b` for a new set.
    pub fn update(&mut self, other: &Self) {
        self.data.extend(other.data.iter().cloned());
    }

    /// Keep only objects also present in `other` (in-place intersection)
    ///
    /// Unlike `BTreeSet::intersection` this mutates `self` and returns
    /// nothing; use `&a & &b` for a new set.
    pub fn intersection(&mut self, other: &Self) {
        self.data.retain(|obj| other.data.contains(obj));
    }

    /// Remove objects present in `other` (in-place difference)
    ///
    /// Mutates `self`; use `&a - &b` for a new set.
    pub fn difference(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.data.retain(|obj| !other.data.contains(obj));
    }

    /// Keep objects present in exactly one of the two sets
    ///
    /// Mutates `self`; use `&a ^ &b` for a new set.
    pub fn symmetric_difference(&mut self, other: &Self) {
        for obj in &other.data {
            if !self.data.remove(obj) {
                self.data.insert(obj.clone());
            }
        }
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Ord> From<BTreeSet<T>> for Set<T> {
    fn from(data: BTreeSet<T>) -> Self {
        Self { data }
    }
}

impl<T: Ord> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T: Ord> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

macro_rules! set_operator {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $inplace:ident) => {
        impl<T: Ord + Clone> $assign_op<&Set<T>> for Set<T> {
            fn $assign_method(&mut self, rhs: &Set<T>) {
                self.$inplace(rhs);
            }
        }

        impl<T: Ord + Clone> $assign_op<Set<T>> for Set<T> {
            fn $assign_method(&mut self, rhs: Set<T>) {
                self.$inplace(&rhs);
            }
        }

        impl<T: Ord + Clone> $op<&Set<T>> for &Set<T> {
            type Output = Set<T>;

            fn $method(self, rhs: &Set<T>) -> Set<T> {
                let mut result = self.clone();
                result.$inplace(rhs);
                result
            }
        }

        impl<T: Ord + Clone> $op<&Set<T>> for Set<T> {
            type Output = Set<T>;

            fn $method(mut self, rhs: &Set<T>) -> Set<T> {
                self.$inplace(rhs);
                self
            }
        }
    };
}

set_operator!(BitOr, bitor, BitOrAssign, bitor_assign, update);
set_operator!(BitAnd, bitand, BitAndAssign, bitand_assign, intersection);
set_operator!(Sub, sub, SubAssign, sub_assign, difference);
set_operator!(BitXor, bitxor, BitXorAssign, bitxor_assign, symmetric_difference);
