// src/sack/query_cmp.rs

//! Comparison operators used by query filters
//!
//! A `QueryCmp` is a bit set made of exactly one base predicate (`EQ`, `GT`,
//! `LT`, `ISNULL`, `REGEX`, `GLOB`, `CONTAINS`, `STARTSWITH`, `ENDSWITH`,
//! where `GT|EQ` and `LT|EQ` count as one) plus the optional `NOT` and
//! `ICASE` modifiers. Composites are plain unions, e.g. `NEQ = NOT | EQ`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Match operator and modifiers for `Query` filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryCmp(u32);

impl QueryCmp {
    // modifiers
    pub const NOT: Self = Self(1 << 0);
    pub const ICASE: Self = Self(1 << 1);

    // base predicates
    pub const ISNULL: Self = Self(1 << 7);
    pub const EQ: Self = Self(1 << 8);
    pub const GT: Self = Self(1 << 9);
    pub const LT: Self = Self(1 << 10);
    pub const REGEX: Self = Self(1 << 11);
    pub const GLOB: Self = Self(1 << 12);
    pub const CONTAINS: Self = Self(1 << 16);
    pub const STARTSWITH: Self = Self(1 << 17);
    pub const ENDSWITH: Self = Self(1 << 18);

    // composites
    pub const NEQ: Self = Self::NOT.union(Self::EQ);
    pub const GTE: Self = Self::GT.union(Self::EQ);
    pub const LTE: Self = Self::LT.union(Self::EQ);
    pub const EXACT: Self = Self::EQ;
    pub const NOT_EXACT: Self = Self::NEQ;
    pub const IEXACT: Self = Self::ICASE.union(Self::EQ);
    pub const NOT_IEXACT: Self = Self::NOT.union(Self::IEXACT);
    pub const IREGEX: Self = Self::ICASE.union(Self::REGEX);
    pub const NOT_REGEX: Self = Self::NOT.union(Self::REGEX);
    pub const NOT_IREGEX: Self = Self::NOT.union(Self::IREGEX);
    pub const IGLOB: Self = Self::ICASE.union(Self::GLOB);
    pub const NOT_GLOB: Self = Self::NOT.union(Self::GLOB);
    pub const NOT_IGLOB: Self = Self::NOT.union(Self::IGLOB);
    pub const ICONTAINS: Self = Self::ICASE.union(Self::CONTAINS);
    pub const NOT_CONTAINS: Self = Self::NOT.union(Self::CONTAINS);
    pub const NOT_ICONTAINS: Self = Self::NOT.union(Self::ICONTAINS);
    pub const ISTARTSWITH: Self = Self::ICASE.union(Self::STARTSWITH);
    pub const IENDSWITH: Self = Self::ICASE.union(Self::ENDSWITH);

    const MODIFIERS: u32 = Self::NOT.0 | Self::ICASE.0;

    const NAMES: [(Self, &'static str); 11] = [
        (Self::NOT, "NOT"),
        (Self::ICASE, "ICASE"),
        (Self::ISNULL, "ISNULL"),
        (Self::EQ, "EQ"),
        (Self::GT, "GT"),
        (Self::LT, "LT"),
        (Self::REGEX, "REGEX"),
        (Self::GLOB, "GLOB"),
        (Self::CONTAINS, "CONTAINS"),
        (Self::STARTSWITH, "STARTSWITH"),
        (Self::ENDSWITH, "ENDSWITH"),
    ];

    /// Union of two operators, usable in const context
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Raw bit representation
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Copy of `self` with the bits of `other` cleared
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_negated(self) -> bool {
        self.contains(Self::NOT)
    }

    pub const fn is_case_insensitive(self) -> bool {
        self.contains(Self::ICASE)
    }

    /// Decode the base predicate, ignoring modifiers
    ///
    /// Returns `None` when there is no base predicate, more than one, or
    /// unknown bits are set.
    pub fn predicate(self) -> Option<Predicate> {
        let base = self.0 & !Self::MODIFIERS;
        let predicate = match Self(base) {
            Self::EQ => Predicate::Eq,
            Self::GT => Predicate::Gt,
            Self::GTE => Predicate::Gte,
            Self::LT => Predicate::Lt,
            Self::LTE => Predicate::Lte,
            Self::ISNULL => Predicate::IsNull,
            Self::REGEX => Predicate::Regex,
            Self::GLOB => Predicate::Glob,
            Self::CONTAINS => Predicate::Contains,
            Self::STARTSWITH => Predicate::StartsWith,
            Self::ENDSWITH => Predicate::EndsWith,
            _ => return None,
        };
        Some(predicate)
    }
}

impl BitOr for QueryCmp {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for QueryCmp {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for QueryCmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if rest & flag.0 != 0 {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                rest &= !flag.0;
                first = false;
            }
        }
        if rest != 0 || first {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#x}", rest)?;
        }
        Ok(())
    }
}

/// Base predicate of a `QueryCmp` with the modifiers stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    IsNull,
    Regex,
    Glob,
    Contains,
    StartsWith,
    EndsWith,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composites_are_unions() {
        assert_eq!(QueryCmp::NEQ, QueryCmp::NOT | QueryCmp::EQ);
        assert_eq!(QueryCmp::GTE, QueryCmp::GT | QueryCmp::EQ);
        assert_eq!(QueryCmp::NOT_IGLOB, QueryCmp::NOT | QueryCmp::ICASE | QueryCmp::GLOB);
        assert!(QueryCmp::ICONTAINS.is_case_insensitive());
        assert!(!QueryCmp::ICONTAINS.is_negated());
    }

    #[test]
    fn test_predicate_decoding() {
        assert_eq!(QueryCmp::NOT_IREGEX.predicate(), Some(Predicate::Regex));
        assert_eq!(QueryCmp::LTE.predicate(), Some(Predicate::Lte));
        assert_eq!(QueryCmp::NEQ.predicate(), Some(Predicate::Eq));
        assert_eq!(QueryCmp::NOT.predicate(), None);
        assert_eq!((QueryCmp::NOT | QueryCmp::ICASE).predicate(), None);
        assert_eq!((QueryCmp::GLOB | QueryCmp::REGEX).predicate(), None);
        assert_eq!((QueryCmp::GLOB | QueryCmp::EQ).predicate(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryCmp::EQ.to_string(), "EQ");
        assert_eq!(QueryCmp::NOT_IGLOB.to_string(), "NOT|ICASE|GLOB");
        assert_eq!(QueryCmp::GTE.to_string(), "EQ|GT");
    }

    #[test]
    fn test_without() {
        assert_eq!(QueryCmp::NOT_ICONTAINS.without(QueryCmp::NOT), QueryCmp::ICONTAINS);
    }
}
