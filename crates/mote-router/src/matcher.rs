//! Route pattern matching
//!
//! A pattern segment prefixed with `:` captures the corresponding path
//! segment under that name. Segment counts must match exactly; there is
//! no wildcard or catch-all form.

use std::collections::BTreeMap;

/// Match `path` against `pattern`, yielding captured parameters
pub fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (pattern_seg, path_seg) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_seg.strip_prefix(':') {
            params.insert(name.to_string(), (*path_seg).to_string());
        } else if pattern_seg != path_seg {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        assert_eq!(match_pattern("/users", "/users"), Some(BTreeMap::new()));
        assert_eq!(match_pattern("/users", "/posts"), None);
    }

    #[test]
    fn test_dynamic_segment() {
        let params = match_pattern("/users/:id", "/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_segment_count_must_match() {
        assert_eq!(match_pattern("/users/:id", "/users/42/edit"), None);
        assert_eq!(match_pattern("/users/:id", "/users"), None);
    }

    #[test]
    fn test_multiple_captures() {
        let params = match_pattern("/:section/:id", "/posts/7").unwrap();
        assert_eq!(params.get("section").map(String::as_str), Some("posts"));
        assert_eq!(params.get("id").map(String::as_str), Some("7"));
    }
}
