//! # Name Patterns Module
//!
//! Regex patterns used to clean ingredient names before they are matched.

use lazy_static::lazy_static;
use regex::Regex;

// Parenthetical asides: "(about 2 cups)", "(optional)"
pub const PARENTHETICAL_PATTERN: &str = r"\([^)]*\)?";

// Anything that is not a letter, digit or whitespace
pub const NON_ALPHANUMERIC_PATTERN: &str = r"[^\p{L}\p{N}\s]";

// Apostrophes are dropped rather than split on ("baker's" -> "bakers")
pub const APOSTROPHE_PATTERN: &str = r"['’]";

lazy_static! {
    pub static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(PARENTHETICAL_PATTERN).expect("Parenthetical pattern should be valid");
    pub static ref NON_ALPHANUMERIC_REGEX: Regex =
        Regex::new(NON_ALPHANUMERIC_PATTERN).expect("Non-alphanumeric pattern should be valid");
    pub static ref APOSTROPHE_REGEX: Regex =
        Regex::new(APOSTROPHE_PATTERN).expect("Apostrophe pattern should be valid");
}

/// Build one whole-word alternation from a descriptor list
///
/// Longer phrases are tried first so "rinsed and drained" wins over "rinsed".
/// Returns `Ok(None)` for an empty list.
pub fn build_descriptor_regex(descriptors: &[String]) -> Result<Option<Regex>, regex::Error> {
    let mut phrases: Vec<String> = descriptors
        .iter()
        .map(|d| d.split_whitespace().collect::<Vec<&str>>().join(" ").to_lowercase())
        .filter(|d| !d.is_empty())
        .collect();
    if phrases.is_empty() {
        return Ok(None);
    }
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    phrases.dedup();

    let alternation = phrases
        .iter()
        .map(|phrase| regex::escape(phrase).replace(' ', r"\s+"))
        .collect::<Vec<String>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthetical_regex() {
        assert_eq!(PARENTHETICAL_REGEX.replace_all("flour (sifted)", ""), "flour ");
        assert_eq!(PARENTHETICAL_REGEX.replace_all("milk (about 2", ""), "milk ");
    }

    #[test]
    fn test_non_alphanumeric_regex() {
        assert_eq!(NON_ALPHANUMERIC_REGEX.replace_all("all-purpose, flour", " "), "all purpose  flour");
        assert_eq!(NON_ALPHANUMERIC_REGEX.replace_all("jalapeño", " "), "jalapeño");
    }

    #[test]
    fn test_descriptor_regex_prefers_longest_phrase() {
        let descriptors = vec!["rinsed".to_string(), "rinsed and drained".to_string()];
        let regex = build_descriptor_regex(&descriptors).unwrap().unwrap();
        assert_eq!(regex.replace_all("beans rinsed and drained", ""), "beans ");
    }

    #[test]
    fn test_descriptor_regex_matches_whole_words_only() {
        let descriptors = vec!["raw".to_string(), "cut".to_string()];
        let regex = build_descriptor_regex(&descriptors).unwrap().unwrap();
        assert_eq!(regex.replace_all("strawberries", ""), "strawberries");
        assert_eq!(regex.replace_all("veal cutlet", ""), "veal cutlet");
        assert_eq!(regex.replace_all("raw honey", ""), " honey");
    }

    #[test]
    fn test_empty_descriptor_list() {
        assert!(build_descriptor_regex(&[]).unwrap().is_none());
    }
}
