// General normalization (raw message -> msg_norm).
//
// Light cleanup applied to every record before language identification:
// escaped line breaks, stray HTML tags, and whitespace runs.

use anyhow::Result;

use super::rules::{RuleSet, Whitespace};

/// Escaped carriage returns and newlines as they appear in the export,
/// i.e. a backslash followed by `r` or `n`, not control characters.
const ESCAPED_BREAKS: [&str; 2] = ["\\r", "\\n"];

const TAG_RULES: &[(&str, &str)] = &[
    (r"<[a-z].*?>", " "),
    (r"</[a-z].*?>", " "),
    (r"<[a-z].*?/>", " "),
];

/// Pass 1 of the cascade.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    tags: RuleSet,
    whitespace: Whitespace,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tags: RuleSet::compile("html tags", TAG_RULES)?,
            whitespace: Whitespace::new()?,
        })
    }

    /// Produce `msg_norm` from a raw message. Leading and trailing
    /// whitespace is collapsed but not removed.
    pub fn normalize(&self, msg: &str) -> String {
        let mut out = msg.to_string();
        for escaped in ESCAPED_BREAKS {
            out = out.replace(escaped, " ");
        }
        let out = self.tags.apply(&out);
        self.whitespace.collapse(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_and_escaped_newline() {
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(
            norm.normalize("Hello <b>world</b>  \\n extra"),
            "Hello world extra"
        );
    }

    #[test]
    fn test_escaped_return_pair() {
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(norm.normalize("one\\r\\ntwo"), "one two");
    }

    #[test]
    fn test_real_control_characters_are_whitespace() {
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(norm.normalize("one\r\n\ttwo"), "one two");
    }

    #[test]
    fn test_self_closing_and_attributes() {
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(
            norm.normalize("line<br/>break and <a href=\"x\">link</a>"),
            "line break and link "
        );
    }

    #[test]
    fn test_uppercase_tags_survive() {
        // Only lowercase tag names are recognized
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(norm.normalize("<B>bold</B>"), "<B>bold</B>");
    }

    #[test]
    fn test_edges_are_collapsed_not_trimmed() {
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(norm.normalize("  padded  "), " padded ");
    }

    #[test]
    fn test_comparison_is_not_a_tag() {
        let norm = TextNormalizer::new().unwrap();
        assert_eq!(norm.normalize("a < 5 and b > 2"), "a < 5 and b > 2");
    }
}
