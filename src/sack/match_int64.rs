// src/sack/match_int64.rs

//! Integer matching for query filters

use super::query_cmp::{Predicate, QueryCmp};
use crate::error::{Error, Result};

/// Compiled integer comparison with its patterns
#[derive(Debug, Clone)]
pub struct Int64Matcher {
    predicate: Predicate,
    negate: bool,
    patterns: Vec<i64>,
}

impl Int64Matcher {
    /// Prepare a matcher; only `EQ`, `GT`, `GTE`, `LT`, `LTE` (optionally
    /// with `NOT`) apply to numbers
    pub fn new(cmp: QueryCmp, patterns: &[i64]) -> Result<Self> {
        let predicate = match cmp.predicate() {
            Some(p @ (Predicate::Eq | Predicate::Gt | Predicate::Gte | Predicate::Lt | Predicate::Lte))
                if !cmp.is_case_insensitive() =>
            {
                p
            }
            _ => return Err(Error::UnsupportedOperation { cmp, kind: "int64" }),
        };

        Ok(Self {
            predicate,
            negate: cmp.is_negated(),
            patterns: patterns.to_vec(),
        })
    }

    pub fn matches(&self, value: i64) -> bool {
        self.matches_any([value])
    }

    /// True if any value satisfies the comparison with any pattern, then
    /// inverted as a whole for `NOT`
    pub fn matches_any<I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = i64>,
    {
        let hit = values
            .into_iter()
            .any(|value| self.patterns.iter().any(|&pattern| self.test(value, pattern)));
        hit != self.negate
    }

    fn test(&self, value: i64, pattern: i64) -> bool {
        match self.predicate {
            Predicate::Eq => value == pattern,
            Predicate::Gt => value > pattern,
            Predicate::Gte => value >= pattern,
            Predicate::Lt => value < pattern,
            Predicate::Lte => value <= pattern,
            _ => false,
        }
    }
}

/// Compare one value with one pattern
pub fn match_int64(value: i64, cmp: QueryCmp, pattern: i64) -> Result<bool> {
    Ok(Int64Matcher::new(cmp, &[pattern])?.matches(value))
}

/// Compare one value with several patterns (OR across patterns)
pub fn match_int64_any(value: i64, cmp: QueryCmp, patterns: &[i64]) -> Result<bool> {
    Ok(Int64Matcher::new(cmp, patterns)?.matches(value))
}

/// Compare several values with one pattern (OR across values)
pub fn match_int64s(values: &[i64], cmp: QueryCmp, pattern: i64) -> Result<bool> {
    Ok(Int64Matcher::new(cmp, &[pattern])?.matches_any(values.iter().copied()))
}

/// Compare several values with several patterns (OR across both)
pub fn match_int64s_any(values: &[i64], cmp: QueryCmp, patterns: &[i64]) -> Result<bool> {
    Ok(Int64Matcher::new(cmp, patterns)?.matches_any(values.iter().copied()))
}
