//! Tag name rules.

use regex::Regex;
use std::sync::LazyLock;

/// Non-empty, at most 255 characters, no whitespace and no commas.
///
/// Commas are reserved as the list separator in `DELETE /api/tags?tags=a,b`.
pub static TAG_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s,]+$").unwrap());

pub const MAX_TAG_NAME_LEN: u64 = 255;

pub fn is_valid_tag_name(name: &str) -> bool {
    name.chars().count() as u64 <= MAX_TAG_NAME_LEN && TAG_NAME_REGEX.is_match(name)
}

/// Splits a comma-separated list into trimmed, non-empty, de-duplicated names.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_tag_name("foo"));
        assert!(is_valid_tag_name("foo-bar_baz"));
        assert!(is_valid_tag_name("ñandú"));
        assert!(is_valid_tag_name(&"a".repeat(255)));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("foo bar"));
        assert!(!is_valid_tag_name("foo,bar"));
        assert!(!is_valid_tag_name("tab\there"));
        assert!(!is_valid_tag_name(&"a".repeat(256)));
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list("foo, bar,,foo , baz"), vec!["foo", "bar", "baz"]);
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ").is_empty());
    }
}
