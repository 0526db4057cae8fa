//! Hashtag extraction from entry descriptions.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Pre-compiled pattern for `#tag` tokens.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([a-zA-Z0-9_]+)").unwrap());

/// Extracts the distinct hashtags of a description.
///
/// Tags are lowercased and returned in first-occurrence order; `#Tag` and `#tag`
/// collapse into a single `tag`. A token ends at the first character that is not
/// ASCII alphanumeric or `_`, so `#not-a-tag` yields `not`.
pub fn extract_tags(description: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for caps in TAG_RE.captures_iter(description) {
        let tag = caps[1].to_ascii_lowercase();
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tags_yields_empty() {
        assert!(extract_tags("hello world").is_empty());
        assert!(extract_tags("").is_empty());
        assert!(extract_tags("# lonely hash").is_empty());
    }

    #[test]
    fn extracts_tags_in_order() {
        assert_eq!(extract_tags("hello #world"), vec!["world"]);
        assert_eq!(extract_tags("#a #b #c"), vec!["a", "b", "c"]);
        assert_eq!(extract_tags("#c text #a more #b"), vec!["c", "a", "b"]);
    }

    #[test]
    fn dedups_case_insensitively() {
        assert_eq!(extract_tags("#Tag #tag"), vec!["tag"]);
        assert_eq!(extract_tags("#Deploy then #DEPLOY and #ops"), vec!["deploy", "ops"]);
    }

    #[test]
    fn stops_at_non_word_characters() {
        assert_eq!(extract_tags("#tag_123 #not-a-tag"), vec!["tag_123", "not"]);
        assert_eq!(extract_tags("review(#pr42), #qa."), vec!["pr42", "qa"]);
    }

    #[test]
    fn adjacent_tags_split_on_hash() {
        assert_eq!(extract_tags("#one#two"), vec!["one", "two"]);
    }
}
