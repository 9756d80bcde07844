//! Tag sanitisation
//!
//! Tags are reduced to ASCII letters and digits before they are stored or
//! looked up. Other characters are stripped, never rejected.

/// Longest tag accepted after sanitisation
pub const MAX_TAG_LEN: usize = 50;

/// Strip every character that is not an ASCII letter or digit.
///
/// Idempotent: sanitising an already clean tag returns it unchanged.
pub fn sanitize_tag(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Sanitise a list of tags for one paper.
///
/// Tags that end up empty are dropped, and tags that collapse to the same
/// text are kept once, in first-seen order.
pub fn sanitize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut clean: Vec<String> = Vec::with_capacity(raw.len());

    for tag in raw {
        let tag = sanitize_tag(tag.as_ref());
        if !tag.is_empty() && !clean.contains(&tag) {
            clean.push(tag);
        }
    }

    clean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(sanitize_tag("data-base!!"), "database");
        assert_eq!(sanitize_tag("sql!"), "sql");
        assert_eq!(sanitize_tag("multi versioned"), "multiversioned");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["data-base!!", "C++", "Rust2021", "", "--"] {
            let once = sanitize_tag(raw);
            assert_eq!(sanitize_tag(&once), once);
        }
    }

    #[test]
    fn test_non_ascii_is_stripped() {
        assert_eq!(sanitize_tag("café"), "caf");
        assert_eq!(sanitize_tag("数据"), "");
    }

    #[test]
    fn test_case_is_kept() {
        assert_eq!(sanitize_tag("PostgreSQL"), "PostgreSQL");
    }

    #[test]
    fn test_list_drops_empty_and_duplicates() {
        let tags = sanitize_tags(&["sql!", "database", "sql", "!!!", "data-base"]);
        assert_eq!(tags, vec!["sql", "database"]);
    }
}
