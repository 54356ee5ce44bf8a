use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Deref;

/// Cover-page disclosures sit near the top of a filing; nothing past this
/// many characters is searched.
pub const MAX_TEXT_CHARS: usize = 300_000;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Tag-stripped, whitespace-collapsed view of the head of one document.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let head = match raw.char_indices().nth(MAX_TEXT_CHARS) {
            Some((cut, _)) => &raw[..cut],
            None => raw,
        };

        // Tags become spaces so adjacent cells do not fuse into one token.
        let text = TAG_RE.replace_all(head, " ");
        let text = WHITESPACE_RE.replace_all(&text, " ");

        NormalizedText(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_collapses_whitespace() {
        let raw = "<html><body><p>The registrant had\n\n  <b>1,000</b>\tshares</p></body></html>";
        assert_eq!(NormalizedText::new(raw).as_str(), "The registrant had 1,000 shares");
    }

    #[test]
    fn test_split_digit_group_keeps_a_space() {
        let raw = "14,000,<span style=\"x\">000</span> shares";
        assert_eq!(NormalizedText::new(raw).as_str(), "14,000, 000 shares");
    }

    #[test]
    fn test_truncates_by_characters() {
        let raw = "é".repeat(MAX_TEXT_CHARS + 10);
        let text = NormalizedText::new(&raw);
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_deterministic() {
        let raw = "<div>Outstanding at May 1:</div> <td>12,345</td> shares";
        assert_eq!(NormalizedText::new(raw), NormalizedText::new(raw));
    }
}
