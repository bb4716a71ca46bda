//! Name normalization
//!
//! Title-casing for book titles and author names, and parsing of the
//! free-text, comma-separated author field submitted with a new book.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\S+").expect("word pattern is valid");
}

/// Capitalize the first letter of every whitespace-separated word and
/// lower-case the rest. Whitespace between words is kept as written.
pub fn title_case(input: &str) -> String {
    WORD.replace_all(input, |caps: &Captures| capitalize(&caps[0]))
        .into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Parser for the comma-separated author field
pub struct AuthorListParser;

impl AuthorListParser {
    /// Split `input` on commas into trimmed, title-cased names.
    ///
    /// Order is preserved and repeats are passed through; reuse of existing
    /// authors is decided by the caller. Tokens that are empty after trimming
    /// (`"A,,B"`, trailing commas) are skipped. An absent input yields no names.
    pub fn parse(input: Option<&str>) -> Vec<String> {
        let Some(input) = input else {
            return Vec::new();
        };

        input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(title_case)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("the test title"), "The Test Title");
        assert_eq!(title_case("sINGLE nAME"), "Single Name");
        assert_eq!(title_case("author 1"), "Author 1");
    }

    #[test]
    fn test_title_case_keeps_spacing() {
        assert_eq!(title_case("  two   spaces "), "  Two   Spaces ");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_unicode() {
        assert_eq!(title_case("émile zola"), "Émile Zola");
    }

    #[test]
    fn test_parse_multiple_names() {
        assert_eq!(
            AuthorListParser::parse(Some("more than,one name")),
            vec!["More Than".to_string(), "One Name".to_string()]
        );
    }

    #[test]
    fn test_parse_ignores_space_after_comma() {
        assert_eq!(
            AuthorListParser::parse(Some("A, B")),
            AuthorListParser::parse(Some("A,B"))
        );
        assert_eq!(AuthorListParser::parse(Some("A, B")), vec!["A", "B"]);
    }

    #[test]
    fn test_parse_keeps_order_and_repeats() {
        assert_eq!(
            AuthorListParser::parse(Some("zed, amy, zed")),
            vec!["Zed", "Amy", "Zed"]
        );
    }

    #[test]
    fn test_parse_absent_or_blank() {
        assert!(AuthorListParser::parse(None).is_empty());
        assert!(AuthorListParser::parse(Some("")).is_empty());
        assert!(AuthorListParser::parse(Some(" , ,")).is_empty());
    }

    #[test]
    fn test_parse_single_name() {
        assert_eq!(AuthorListParser::parse(Some("single name")), vec!["Single Name"]);
    }
}
