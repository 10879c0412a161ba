// src/utils.rs

//! Small helpers shared by the domain queries

use crate::sack::QueryCmp;

/// Returns true if `pattern` contains glob metacharacters
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// `GLOB` for patterns with metacharacters, `EQ` otherwise
pub fn glob_or_exact(pattern: &str) -> QueryCmp {
    if is_glob_pattern(pattern) {
        QueryCmp::GLOB
    } else {
        QueryCmp::EQ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("kernel*"));
        assert!(is_glob_pattern("python3.1?"));
        assert!(is_glob_pattern("lib[cm]"));
        assert!(!is_glob_pattern("bash"));
        assert!(!is_glob_pattern(""));
    }

    #[test]
    fn test_glob_or_exact() {
        assert_eq!(glob_or_exact("vim-*"), QueryCmp::GLOB);
        assert_eq!(glob_or_exact("vim"), QueryCmp::EQ);
    }
}
