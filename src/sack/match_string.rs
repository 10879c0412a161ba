// src/sack/match_string.rs

//! String matching for query filters
//!
//! Every match reduces to a single disjunction over all (value, pattern)
//! pairs; the `NOT` modifier is applied once to that disjunction, so
//! `NEQ` with patterns `[a, b]` means "neither a nor b".

use super::query_cmp::{Predicate, QueryCmp};
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Values longer than this many characters never match a `REGEX` operator
pub const REGEX_MAX_INPUT_LEN: usize = 2048;

/// A single pattern prepared for repeated matching
#[derive(Debug)]
enum CompiledPattern {
    /// Literal text, lowercased when the matcher is case-insensitive
    Text(String),
    /// Anchored regex built from a `REGEX` or `GLOB` pattern
    Regex(Regex),
    /// Glob that no value can match
    Nothing,
}

/// Compiled form of a `QueryCmp` together with its patterns
///
/// Built once per filter pass so regex and glob patterns are compiled a
/// single time regardless of how many objects are tested.
#[derive(Debug)]
pub struct StringMatcher {
    predicate: Predicate,
    negate: bool,
    icase: bool,
    patterns: Vec<CompiledPattern>,
}

impl StringMatcher {
    /// Prepare a matcher for plain string values
    ///
    /// Ordering operators and `ISNULL` are rejected: a plain string is never
    /// null, and strings are not ordered by queries.
    pub fn new<P: AsRef<str>>(cmp: QueryCmp, patterns: &[P]) -> Result<Self> {
        Self::build(cmp, patterns, false)
    }

    /// Prepare a matcher for optional string values, which additionally
    /// accepts `ISNULL`
    pub fn new_optional<P: AsRef<str>>(cmp: QueryCmp, patterns: &[P]) -> Result<Self> {
        Self::build(cmp, patterns, true)
    }

    fn build<P: AsRef<str>>(cmp: QueryCmp, patterns: &[P], nullable: bool) -> Result<Self> {
        let predicate = match cmp.predicate() {
            Some(Predicate::IsNull) if nullable => Predicate::IsNull,
            Some(
                p @ (Predicate::Eq
                | Predicate::Contains
                | Predicate::StartsWith
                | Predicate::EndsWith
                | Predicate::Regex
                | Predicate::Glob),
            ) => p,
            _ => {
                return Err(Error::UnsupportedOperation {
                    cmp,
                    kind: if nullable { "optional string" } else { "string" },
                });
            }
        };

        let icase = cmp.is_case_insensitive();
        let patterns = patterns
            .iter()
            .map(|pattern| compile(predicate, pattern.as_ref(), icase))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            predicate,
            negate: cmp.is_negated(),
            icase,
            patterns,
        })
    }

    /// Match a single value
    pub fn matches(&self, value: &str) -> bool {
        self.matches_any([value])
    }

    /// Match a list of values; true if any value matches any pattern
    pub fn matches_any<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let hit = values.into_iter().any(|value| self.test_value(value));
        hit != self.negate
    }

    /// Match an optional value; `None` only satisfies `ISNULL`
    pub fn matches_optional(&self, value: Option<&str>) -> bool {
        let hit = match (self.predicate, value) {
            (Predicate::IsNull, value) => value.is_none(),
            (_, None) => false,
            (_, Some(value)) => self.test_value(value),
        };
        hit != self.negate
    }

    fn test_value(&self, value: &str) -> bool {
        let folded;
        let value = if self.icase && self.uses_folded_text() {
            folded = value.to_lowercase();
            folded.as_str()
        } else {
            value
        };

        if self.predicate == Predicate::Regex && exceeds_regex_limit(value) {
            return false;
        }

        self.patterns.iter().any(|pattern| match pattern {
            CompiledPattern::Text(text) => match self.predicate {
                Predicate::Eq => value == text,
                Predicate::Contains => value.contains(text.as_str()),
                Predicate::StartsWith => value.starts_with(text.as_str()),
                Predicate::EndsWith => value.ends_with(text.as_str()),
                _ => false,
            },
            CompiledPattern::Regex(regex) => regex.is_match(value),
            CompiledPattern::Nothing => false,
        })
    }

    fn uses_folded_text(&self) -> bool {
        matches!(
            self.predicate,
            Predicate::Eq | Predicate::Contains | Predicate::StartsWith | Predicate::EndsWith
        )
    }
}

fn exceeds_regex_limit(value: &str) -> bool {
    value.len() > REGEX_MAX_INPUT_LEN && value.chars().count() > REGEX_MAX_INPUT_LEN
}

fn compile(predicate: Predicate, pattern: &str, icase: bool) -> Result<CompiledPattern> {
    let source = match predicate {
        Predicate::Regex => format!(r"\A(?:{})\z", pattern),
        Predicate::Glob => format!(r"(?s)\A{}\z", glob_to_regex(pattern)),
        _ if icase => return Ok(CompiledPattern::Text(pattern.to_lowercase())),
        _ => return Ok(CompiledPattern::Text(pattern.to_string())),
    };

    match RegexBuilder::new(&source).case_insensitive(icase).build() {
        Ok(regex) => Ok(CompiledPattern::Regex(regex)),
        // fnmatch has no error case, an unusable glob simply matches nothing
        Err(e) if predicate == Predicate::Glob => {
            warn!("Glob pattern {} matches nothing: {}", pattern, e);
            Ok(CompiledPattern::Nothing)
        }
        Err(e) => Err(Error::InvalidPattern(format!("{}: {}", pattern, e))),
    }
}

/// Translate an `fnmatch` pattern into regex syntax
///
/// `*` and `?` also match `/`, a backslash quotes the next character, and an
/// unterminated `[` is a literal bracket.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' if i + 1 < chars.len() => {
                i += 1;
                push_escaped(&mut out, chars[i]);
            }
            '[' => match bracket_end(&chars, i) {
                Some(end) => {
                    push_bracket(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                None => push_escaped(&mut out, '['),
            },
            c => push_escaped(&mut out, c),
        }
        i += 1;
    }

    out
}

/// Index of the `]` closing the bracket expression opened at `start`
fn bracket_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if i < chars.len() && (chars[i] == '!' || chars[i] == '^') {
        i += 1;
    }
    // a leading ']' is a member, not the terminator
    if i < chars.len() && chars[i] == ']' {
        i += 1;
    }
    while i < chars.len() {
        match chars[i] {
            ']' => return Some(i),
            '[' if chars.get(i + 1) == Some(&':') => {
                let close = (i + 2..chars.len().saturating_sub(1))
                    .find(|&j| chars[j] == ':' && chars[j + 1] == ']')?;
                i = close + 1;
            }
            '\\' => i += 1,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Character class matching nothing, for brackets no character can satisfy
const EMPTY_CLASS: &str = r"[^\s\S]";

/// Character class matching any character, `/` included
const ANY_CLASS: &str = r"[\s\S]";

const POSIX_CLASSES: [&str; 12] = [
    "alnum", "alpha", "blank", "cntrl", "digit", "graph", "lower", "print", "punct", "space",
    "upper", "xdigit",
];

/// Member of a bracket expression at `i` with a backslash resolved, and the
/// index after it
fn bracket_member(body: &[char], i: usize) -> (char, usize) {
    if body[i] == '\\' && i + 1 < body.len() {
        (body[i + 1], i + 2)
    } else {
        (body[i], i + 1)
    }
}

/// Translate the inside of a bracket expression into a regex class
///
/// Like `fnmatch`, a reversed range (`z-a`) contributes no characters and an
/// unknown class name makes the bracket match nothing, so no bracket can
/// produce a regex compile error.
fn push_bracket(out: &mut String, body: &[char]) {
    let negated = matches!(body.first(), Some('!' | '^'));
    let mut members = String::new();
    let mut i = usize::from(negated);

    while i < body.len() {
        if body[i] == '[' && body.get(i + 1) == Some(&':') {
            let close = (i + 2..body.len().saturating_sub(1))
                .find(|&j| body[j] == ':' && body[j + 1] == ']');
            if let Some(close) = close {
                let name: String = body[i + 2..close].iter().collect();
                if !POSIX_CLASSES.contains(&name.as_str()) {
                    out.push_str(EMPTY_CLASS);
                    return;
                }
                members.push_str(&format!("[:{}:]", name));
                i = close + 2;
                continue;
            }
        }

        let (low, next) = bracket_member(body, i);
        if body.get(next) == Some(&'-') && next + 1 < body.len() {
            let (high, after) = bracket_member(body, next + 1);
            if low <= high {
                push_class_escaped(&mut members, low);
                members.push('-');
                push_class_escaped(&mut members, high);
            }
            i = after;
            continue;
        }
        push_class_escaped(&mut members, low);
        i = next;
    }

    match (members.is_empty(), negated) {
        (true, false) => out.push_str(EMPTY_CLASS),
        (true, true) => out.push_str(ANY_CLASS),
        (false, negated) => {
            out.push('[');
            if negated {
                out.push('^');
            }
            out.push_str(&members);
            out.push(']');
        }
    }
}

fn push_escaped(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn push_class_escaped(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~' | '-') {
        out.push('\\');
    }
    out.push(c);
}

/// Match one value against one pattern
pub fn match_string(value: &str, cmp: QueryCmp, pattern: &str) -> Result<bool> {
    Ok(StringMatcher::new(cmp, &[pattern])?.matches(value))
}

/// Match one value against several patterns (OR across patterns)
pub fn match_string_any<P: AsRef<str>>(value: &str, cmp: QueryCmp, patterns: &[P]) -> Result<bool> {
    Ok(StringMatcher::new(cmp, patterns)?.matches(value))
}

/// Match several values against one pattern (OR across values)
pub fn match_strings<S: AsRef<str>>(values: &[S], cmp: QueryCmp, pattern: &str) -> Result<bool> {
    Ok(StringMatcher::new(cmp, &[pattern])?.matches_any(values.iter().map(AsRef::as_ref)))
}

/// Match several values against several patterns (OR across both)
pub fn match_strings_any<S: AsRef<str>, P: AsRef<str>>(
    values: &[S],
    cmp: QueryCmp,
    patterns: &[P],
) -> Result<bool> {
    Ok(StringMatcher::new(cmp, patterns)?.matches_any(values.iter().map(AsRef::as_ref)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE: &str = "AbCdEfGhIjKlMnOp";

    const PATTERNS: [&str; 12] = [
        "AbCdEfGhIjKlMnOp",
        "ABcdEfGhIjKlMNop",
        "AbCdEf",
        "ABcdEf",
        "KlMnOp",
        "KlMNoP",
        "EfGh",
        "EFgh",
        "A[a-d]Cd*Gh*Ij?lMnOp",
        "A[A-D]Cd*Gh*Ij?lMNoP",
        "A[bdCE]+fGhIj.lMnOp",
        "A[b-e]+fGhIj.lMNop",
    ];

    fn check(cmp: QueryCmp, expected: [bool; 12]) {
        for (pattern, want) in PATTERNS.iter().zip(expected) {
            assert_eq!(
                match_string(VALUE, cmp, pattern).unwrap(),
                want,
                "{} against {}",
                cmp,
                pattern
            );
            assert_eq!(
                match_string(VALUE, cmp | QueryCmp::NOT, pattern).unwrap(),
                !want,
                "{} against {}",
                cmp | QueryCmp::NOT,
                pattern
            );
        }
    }

    #[test]
    fn test_exact() {
        let mut want = [false; 12];
        want[0] = true;
        check(QueryCmp::EXACT, want);
        want[1] = true;
        check(QueryCmp::IEXACT, want);
    }

    #[test]
    fn test_glob() {
        check(
            QueryCmp::GLOB,
            [true, false, false, false, false, false, false, false, true, false, false, false],
        );
        check(
            QueryCmp::IGLOB,
            [true, true, false, false, false, false, false, false, true, true, false, false],
        );
    }

    #[test]
    fn test_regex() {
        check(
            QueryCmp::REGEX,
            [true, false, false, false, false, false, false, false, false, false, true, false],
        );
        check(
            QueryCmp::IREGEX,
            [true, true, false, false, false, false, false, false, false, false, true, true],
        );
    }

    #[test]
    fn test_contains() {
        check(
            QueryCmp::CONTAINS,
            [true, false, true, false, true, false, true, false, false, false, false, false],
        );
        check(
            QueryCmp::ICONTAINS,
            [true, true, true, true, true, true, true, true, false, false, false, false],
        );
    }

    #[test]
    fn test_starts_and_ends_with() {
        check(
            QueryCmp::STARTSWITH,
            [true, false, true, false, false, false, false, false, false, false, false, false],
        );
        check(
            QueryCmp::ISTARTSWITH,
            [true, true, true, true, false, false, false, false, false, false, false, false],
        );
        check(
            QueryCmp::ENDSWITH,
            [true, false, false, false, true, false, false, false, false, false, false, false],
        );
        check(
            QueryCmp::IENDSWITH,
            [true, true, false, false, true, true, false, false, false, false, false, false],
        );
    }

    #[test]
    fn test_invalid_operators() {
        for cmp in [
            QueryCmp::NOT,
            QueryCmp::ICASE,
            QueryCmp::NOT | QueryCmp::ICASE,
            QueryCmp::ISNULL,
            QueryCmp::GT,
            QueryCmp::GTE,
            QueryCmp::LT,
            QueryCmp::LTE,
        ] {
            let result = match_string("VALUE", cmp, "PATTERN");
            assert!(
                matches!(result, Err(Error::UnsupportedOperation { .. })),
                "{} should be rejected",
                cmp
            );
        }
    }

    #[test]
    fn test_invalid_regex() {
        let result = match_string("value", QueryCmp::REGEX, "(unclosed");
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_regex_input_limit() {
        let long = "a".repeat(REGEX_MAX_INPUT_LEN + 1);
        assert!(!match_string(&long, QueryCmp::REGEX, "a*").unwrap());
        assert!(match_string(&long, QueryCmp::NOT_REGEX, "a*").unwrap());

        let at_limit = "a".repeat(REGEX_MAX_INPUT_LEN);
        assert!(match_string(&at_limit, QueryCmp::REGEX, "a*").unwrap());

        // the limit only guards regex evaluation
        assert!(match_string(&long, QueryCmp::GLOB, "a*").unwrap());
    }

    #[test]
    fn test_glob_dialect() {
        assert!(match_string("usr/bin/ls", QueryCmp::GLOB, "usr*ls").unwrap());
        assert!(match_string("kernel-6", QueryCmp::GLOB, "kernel-[!a-z]").unwrap());
        assert!(!match_string("kernel-x", QueryCmp::GLOB, "kernel-[!a-z]").unwrap());
        assert!(match_string("a]b", QueryCmp::GLOB, "a[]]b").unwrap());
        assert!(match_string("a*b", QueryCmp::GLOB, r"a\*b").unwrap());
        assert!(!match_string("axb", QueryCmp::GLOB, r"a\*b").unwrap());
        assert!(match_string("a[b", QueryCmp::GLOB, "a[b").unwrap());
        assert!(match_string("lib.so.1", QueryCmp::GLOB, "lib.so.?").unwrap());
        assert!(!match_string("libxso.1", QueryCmp::GLOB, "lib.so.?").unwrap());
        assert!(match_string("python3", QueryCmp::GLOB, "python[[:digit:]]").unwrap());
        assert!(match_string("a^b", QueryCmp::GLOB, "a[&^]b").unwrap());
        assert!(match_string("a-b", QueryCmp::GLOB, "a[x-]b").unwrap());
        assert!(match_string("a-b", QueryCmp::GLOB, "a[-x]b").unwrap());
        assert!(!match_string("akb", QueryCmp::GLOB, "a[-x]b").unwrap());
        assert!(match_string("a]b", QueryCmp::GLOB, r"a[\]]b").unwrap());
    }

    #[test]
    fn test_glob_brackets_never_fail() {
        // reversed ranges contribute nothing, like fnmatch
        assert!(!match_string("b", QueryCmp::GLOB, "[z-a]").unwrap());
        assert!(match_string("b", QueryCmp::NOT_GLOB, "[z-a]").unwrap());
        assert!(!match_string("kernel", QueryCmp::IGLOB, "[z-a]*").unwrap());
        assert!(match_string("b", QueryCmp::GLOB, "[z-ab]").unwrap());
        assert!(match_string("b", QueryCmp::GLOB, "[!z-a]").unwrap());
        assert!(match_string("/", QueryCmp::GLOB, "[!z-a]").unwrap());

        // unknown class names make the bracket match nothing
        assert!(!match_string("1", QueryCmp::GLOB, "[[:nodigit:]1]").unwrap());
        assert!(match_string("1", QueryCmp::NOT_GLOB, "[![:nodigit:]]").unwrap());
    }

    #[test]
    fn test_multi_pattern_not_applies_to_disjunction() {
        let patterns = ["foo", "bar"];
        for value in ["foo", "bar", "baz"] {
            let expected = !(match_string(value, QueryCmp::EQ, "foo").unwrap()
                || match_string(value, QueryCmp::EQ, "bar").unwrap());
            assert_eq!(match_string_any(value, QueryCmp::NEQ, &patterns).unwrap(), expected);
        }
        assert!(!match_string_any("foo", QueryCmp::NEQ, &patterns).unwrap());
        assert!(match_string_any("baz", QueryCmp::NEQ, &patterns).unwrap());
    }

    #[test]
    fn test_vector_values() {
        assert!(match_strings(&["a", "b"], QueryCmp::CONTAINS, "b").unwrap());
        assert!(!match_strings(&["a", "c"], QueryCmp::CONTAINS, "b").unwrap());
        assert!(!match_strings(&["a", "b"], QueryCmp::NOT_CONTAINS, "b").unwrap());
        assert!(match_strings(&["a", "c"], QueryCmp::NOT_CONTAINS, "b").unwrap());

        let empty: [&str; 0] = [];
        assert!(!match_strings(&empty, QueryCmp::EQ, "a").unwrap());
        assert!(match_strings(&empty, QueryCmp::NEQ, "a").unwrap());

        assert!(match_strings_any(&["x", "y"], QueryCmp::GLOB, &["z*", "y"]).unwrap());
        assert!(!match_strings_any(&["x", "y"], QueryCmp::NOT_GLOB, &["z*", "y"]).unwrap());
    }

    #[test]
    fn test_optional_values() {
        let matcher = StringMatcher::new_optional(QueryCmp::ISNULL, &[""; 0]).unwrap();
        assert!(matcher.matches_optional(None));
        assert!(!matcher.matches_optional(Some("x")));

        let matcher = StringMatcher::new_optional(QueryCmp::NOT | QueryCmp::ISNULL, &[""; 0]).unwrap();
        assert!(matcher.matches_optional(Some("x")));

        let matcher = StringMatcher::new_optional(QueryCmp::GLOB, &["http*"]).unwrap();
        assert!(matcher.matches_optional(Some("https://example.com")));
        assert!(!matcher.matches_optional(None));
    }

    proptest::proptest! {
        #[test]
        fn test_not_inverts_every_operator(value in "[a-cA-C.*?]{0,6}", pattern in "[a-cA-C.*?]{0,4}") {
            for cmp in [
                QueryCmp::EQ,
                QueryCmp::IEXACT,
                QueryCmp::GLOB,
                QueryCmp::IGLOB,
                QueryCmp::CONTAINS,
                QueryCmp::ICONTAINS,
                QueryCmp::STARTSWITH,
                QueryCmp::ENDSWITH,
            ] {
                let plain = match_string(&value, cmp, &pattern).unwrap();
                let negated = match_string(&value, QueryCmp::NOT | cmp, &pattern).unwrap();
                proptest::prop_assert_ne!(plain, negated);
            }
        }
    }
}
