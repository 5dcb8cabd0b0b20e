//! # Name Canonicalizer
//!
//! Reduces free-text ingredient names to keys used for grouping.
//!
//! ## Strategy
//!
//! 1. Clean: lowercase, drop parenthetical asides and punctuation
//! 2. Name patterns: the first matching `(regex, concept)` pair decides the key
//! 3. Strip descriptor words ("boneless", "chopped", "to taste", ...)
//! 4. Match against keys already produced in this session:
//!    - a known key containing every token (a lone token must be its first token)
//!    - a known key with the same first token and enough token overlap
//!    - the most similar known key above the similarity threshold
//! 5. Otherwise the stripped name is a new key
//!
//! Matching depends on the [`KnownNames`] accumulated so far, so the same set of
//! records can produce different keys when they arrive in a different order.
//!
//! ```rust
//! use ingredient_combiner::combiner_config::CombinerConfig;
//! use ingredient_combiner::name_canonicalizer::{KnownNames, NameCanonicalizer};
//!
//! let canonicalizer = NameCanonicalizer::with_config(&CombinerConfig::default())?;
//! let mut known = KnownNames::new();
//!
//! assert_eq!(canonicalizer.canonicalize("2 boneless, skinless chicken breasts", &mut known), "chicken");
//! assert_eq!(canonicalizer.canonicalize("Fresh basil leaves (packed)", &mut known), "basil leaves");
//! assert_eq!(canonicalizer.canonicalize("basil", &mut known), "basil leaves");
//! # Ok::<(), ingredient_combiner::combiner_errors::CombinerError>(())
//! ```

use log::{debug, trace};
use regex::Regex;
use std::collections::HashSet;

use crate::combiner_config::CombinerConfig;
use crate::combiner_errors::CombinerError;
use crate::name_patterns::{
    build_descriptor_regex, APOSTROPHE_REGEX, NON_ALPHANUMERIC_REGEX, PARENTHETICAL_REGEX,
};

/// Canonical keys produced so far in a session, in the order first produced
#[derive(Debug, Clone, Default)]
pub struct KnownNames {
    keys: Vec<String>,
    seen: HashSet<String>,
}

impl KnownNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key; returns `false` if it was already known
    pub fn insert(&mut self, key: &str) -> bool {
        if key.is_empty() || self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.keys.push(key.to_string());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in first-produced order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.seen.clear();
    }
}

/// Ingredient name canonicalizer with compiled pattern and descriptor tables
#[derive(Debug, Clone)]
pub struct NameCanonicalizer {
    /// Ordered `(pattern, concept)` pairs
    patterns: Vec<(Regex, String)>,
    /// Whole-word alternation of descriptor phrases
    descriptors: Option<Regex>,
    similarity_threshold: f64,
    first_token_min_overlap: f64,
}

impl NameCanonicalizer {
    /// Compile the name patterns and descriptor list of a configuration
    ///
    /// # Errors
    ///
    /// `CombinerError::InvalidPattern` if a name pattern does not compile.
    pub fn with_config(config: &CombinerConfig) -> Result<Self, CombinerError> {
        let patterns = config
            .name_patterns
            .iter()
            .map(|p| {
                debug!("Compiling name pattern '{}' -> '{}'", p.pattern, p.concept);
                Ok((Regex::new(&p.pattern)?, p.concept.clone()))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        let descriptors = build_descriptor_regex(&config.descriptors)?;

        Ok(Self {
            patterns,
            descriptors,
            similarity_threshold: config.similarity_threshold,
            first_token_min_overlap: config.first_token_min_overlap,
        })
    }

    /// Canonical key for an ingredient name, recording it in `known`
    ///
    /// Blank names produce the empty key, which is never recorded.
    pub fn canonicalize(&self, name: &str, known: &mut KnownNames) -> String {
        let cleaned = clean_name(name);
        if cleaned.is_empty() {
            return String::new();
        }

        let key = self.match_key(&cleaned, known);
        if known.insert(&key) {
            trace!("New canonical name '{}'", key);
        }
        debug!("Canonicalized '{}' -> '{}'", name, key);
        key
    }

    fn match_key(&self, cleaned: &str, known: &KnownNames) -> String {
        if let Some(concept) = self.pattern_concept(cleaned) {
            trace!("Name '{}' matched pattern concept '{}'", cleaned, concept);
            return concept;
        }

        let stripped = self.strip_descriptors(cleaned);
        // A name made only of descriptors ("fresh") keeps its cleaned text
        let base = if stripped.is_empty() {
            cleaned.to_string()
        } else {
            stripped
        };
        if let Some(concept) = self.pattern_concept(&base) {
            trace!("Stripped name '{}' matched pattern concept '{}'", base, concept);
            return concept;
        }
        let tokens: Vec<&str> = base.split_whitespace().collect();

        if let Some(key) = superset_match(&tokens, known) {
            trace!("'{}' is contained in known name '{}'", base, key);
            return key;
        }
        if let Some(key) = first_token_match(&tokens, known, self.first_token_min_overlap) {
            trace!("'{}' shares its first token with known name '{}'", base, key);
            return key;
        }
        if let Some(key) = similarity_match(&base, known, self.similarity_threshold) {
            trace!("'{}' is similar to known name '{}'", base, key);
            return key;
        }
        base
    }

    /// Concept of the first name pattern matching the cleaned name
    pub fn pattern_concept(&self, cleaned: &str) -> Option<String> {
        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(cleaned))
            .map(|(_, concept)| concept.clone())
    }

    /// Remove descriptor words and collapse whitespace
    pub fn strip_descriptors(&self, cleaned: &str) -> String {
        let stripped = match &self.descriptors {
            Some(regex) => regex.replace_all(cleaned, " ").into_owned(),
            None => cleaned.to_string(),
        };
        collapse_whitespace(&stripped)
    }
}

/// Lowercase, drop parenthetical asides and punctuation, collapse whitespace
pub fn clean_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let without_asides = PARENTHETICAL_REGEX.replace_all(&lowered, " ");
    let without_apostrophes = APOSTROPHE_REGEX.replace_all(&without_asides, "");
    let alphanumeric = NON_ALPHANUMERIC_REGEX.replace_all(&without_apostrophes, " ");
    collapse_whitespace(&alphanumeric)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// First known key containing every token; a single token must lead the key
fn superset_match(tokens: &[&str], known: &KnownNames) -> Option<String> {
    known
        .iter()
        .find(|candidate| {
            let candidate_tokens: Vec<&str> = candidate.split_whitespace().collect();
            if tokens.len() == 1 {
                return candidate_tokens.first() == tokens.first();
            }
            tokens.iter().all(|t| candidate_tokens.contains(t))
        })
        .map(str::to_string)
}

/// First known key led by the same token with enough overall token overlap
///
/// The known key must have at least as many tokens as the new name, so a
/// bare "garlic" never absorbs "garlic powder".
fn first_token_match(tokens: &[&str], known: &KnownNames, min_overlap: f64) -> Option<String> {
    let first = tokens.first()?;
    let token_set: HashSet<&str> = tokens.iter().copied().collect();

    known
        .iter()
        .find(|candidate| {
            let candidate_set: HashSet<&str> = candidate.split_whitespace().collect();
            candidate.split_whitespace().next() == Some(*first)
                && candidate_set.len() >= token_set.len()
                && jaccard(&token_set, &candidate_set) >= min_overlap
        })
        .map(str::to_string)
}

/// Most similar known key at or above the threshold; ties keep the earlier key
fn similarity_match(name: &str, known: &KnownNames, threshold: f64) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in known.iter() {
        let score = strsim::normalized_levenshtein(name, candidate);
        if score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best.map(|(candidate, _)| candidate.to_string())
}

fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiner_config::NamePattern;

    fn create_canonicalizer() -> NameCanonicalizer {
        NameCanonicalizer::with_config(&CombinerConfig::default()).unwrap()
    }

    fn known_from(keys: &[&str]) -> KnownNames {
        let mut known = KnownNames::new();
        for key in keys {
            known.insert(key);
        }
        known
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Boneless, Skinless Chicken  "), "boneless skinless chicken");
        assert_eq!(clean_name("Flour (sifted)"), "flour");
        assert_eq!(clean_name("all-purpose flour"), "all purpose flour");
        assert_eq!(clean_name("Baker's chocolate"), "bakers chocolate");
        assert_eq!(clean_name("!!!"), "");
    }

    #[test]
    fn test_known_names_keep_order_and_dedupe() {
        let mut known = KnownNames::new();
        assert!(known.insert("sugar"));
        assert!(known.insert("flour"));
        assert!(!known.insert("sugar"));
        assert!(!known.insert(""));
        assert_eq!(known.iter().collect::<Vec<_>>(), vec!["sugar", "flour"]);
        assert!(known.contains("flour"));
        known.clear();
        assert!(known.is_empty());
    }

    #[test]
    fn test_pattern_table_wins() {
        let canonicalizer = create_canonicalizer();
        let mut known = KnownNames::new();
        assert_eq!(canonicalizer.canonicalize("Chicken Breasts", &mut known), "chicken");
        assert_eq!(canonicalizer.canonicalize("large eggs", &mut known), "egg");
        assert_eq!(canonicalizer.canonicalize("3 cloves garlic, minced", &mut known), "garlic");
        assert_eq!(canonicalizer.canonicalize("all-purpose flour", &mut known), "flour");
        assert_eq!(canonicalizer.canonicalize("unsalted butter, softened", &mut known), "butter");
        assert_eq!(canonicalizer.canonicalize("extra-virgin olive oil", &mut known), "olive oil");
        assert!(known.contains("chicken"));
    }

    #[test]
    fn test_descriptor_stripping() {
        let canonicalizer = create_canonicalizer();
        let mut known = KnownNames::new();
        assert_eq!(canonicalizer.canonicalize("salt to taste", &mut known), "salt");
        assert_eq!(canonicalizer.canonicalize("finely chopped fresh parsley", &mut known), "parsley");
        assert_eq!(canonicalizer.canonicalize("strawberries, halved", &mut known), "strawberries");
    }

    #[test]
    fn test_descriptor_only_name_keeps_cleaned_text() {
        let canonicalizer = create_canonicalizer();
        let mut known = KnownNames::new();
        assert_eq!(canonicalizer.canonicalize("Fresh", &mut known), "fresh");
    }

    #[test]
    fn test_blank_name_is_not_recorded() {
        let canonicalizer = create_canonicalizer();
        let mut known = KnownNames::new();
        assert_eq!(canonicalizer.canonicalize("  ", &mut known), "");
        assert!(known.is_empty());
    }

    #[test]
    fn test_superset_match() {
        let canonicalizer = create_canonicalizer();
        let mut known = known_from(&["parmesan cheese"]);
        assert_eq!(canonicalizer.canonicalize("parmesan", &mut known), "parmesan cheese");
        assert_eq!(canonicalizer.canonicalize("cheese parmesan", &mut known), "parmesan cheese");
    }

    #[test]
    fn test_single_adjective_token_does_not_merge() {
        let canonicalizer = create_canonicalizer();
        let mut known = known_from(&["brown sugar", "olive oil"]);
        assert_eq!(canonicalizer.canonicalize("sugar", &mut known), "sugar");
        assert_eq!(canonicalizer.canonicalize("oil", &mut known), "oil");
    }

    #[test]
    fn test_first_token_requires_overlap() {
        let canonicalizer = create_canonicalizer();
        let mut known = known_from(&["red pepper flakes"]);
        assert_eq!(canonicalizer.canonicalize("red chili flakes", &mut known), "red pepper flakes");

        let mut known = known_from(&["lemon juice"]);
        assert_eq!(canonicalizer.canonicalize("lemon zest", &mut known), "lemon zest");
    }

    #[test]
    fn test_shorter_key_does_not_absorb_longer_names() {
        let canonicalizer = create_canonicalizer();
        let mut known = known_from(&["garlic"]);
        assert_eq!(canonicalizer.canonicalize("garlic powder", &mut known), "garlic powder");
        assert_eq!(canonicalizer.canonicalize("garlic salt", &mut known), "garlic salt");

        let mut known = known_from(&["lemon"]);
        assert_eq!(canonicalizer.canonicalize("lemon juice", &mut known), "lemon juice");
    }

    #[test]
    fn test_patterns_match_after_stripping() {
        let canonicalizer = create_canonicalizer();
        let mut known = KnownNames::new();
        assert_eq!(canonicalizer.canonicalize("eggs", &mut known), "egg");
        assert_eq!(canonicalizer.canonicalize("large eggs, beaten", &mut known), "egg");
        assert_eq!(canonicalizer.canonicalize("sea salt, to taste", &mut known), "salt");
        assert_eq!(canonicalizer.canonicalize("butter", &mut known), "butter");
    }

    #[test]
    fn test_patterns_do_not_swallow_other_ingredients() {
        let canonicalizer = create_canonicalizer();
        let mut known = KnownNames::new();
        assert_eq!(canonicalizer.canonicalize("butter", &mut known), "butter");
        assert_eq!(canonicalizer.canonicalize("butter beans, rinsed", &mut known), "butter beans");
        assert_eq!(canonicalizer.canonicalize("eggs", &mut known), "egg");
        assert_eq!(canonicalizer.canonicalize("duck eggs", &mut known), "duck eggs");
    }

    #[test]
    fn test_similarity_match() {
        let canonicalizer = create_canonicalizer();
        let mut known = known_from(&["tomatoes"]);
        assert_eq!(canonicalizer.canonicalize("tomatos", &mut known), "tomatoes");
        assert_eq!(canonicalizer.canonicalize("potatoes", &mut known), "potatoes");
    }

    #[test]
    fn test_order_dependence() {
        let canonicalizer = create_canonicalizer();

        let mut known = KnownNames::new();
        let keys: Vec<String> = ["lemon", "lemon juice", "lemon zest"]
            .iter()
            .map(|name| canonicalizer.canonicalize(name, &mut known))
            .collect();
        assert_eq!(keys, vec!["lemon", "lemon juice", "lemon zest"]);

        let mut known = KnownNames::new();
        let keys: Vec<String> = ["lemon juice", "lemon zest", "lemon"]
            .iter()
            .map(|name| canonicalizer.canonicalize(name, &mut known))
            .collect();
        assert_eq!(keys, vec!["lemon juice", "lemon zest", "lemon juice"]);
    }

    #[test]
    fn test_deterministic_for_same_state() {
        let canonicalizer = create_canonicalizer();
        let names = ["red onion", "onion", "yellow onions", "green onions"];
        let run = || {
            let mut known = KnownNames::new();
            names
                .iter()
                .map(|name| canonicalizer.canonicalize(name, &mut known))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = CombinerConfig::default();
        config.name_patterns.push(NamePattern {
            pattern: "(unclosed".to_string(),
            concept: "broken".to_string(),
        });
        assert!(matches!(
            NameCanonicalizer::with_config(&config),
            Err(CombinerError::InvalidPattern(_))
        ));
    }
}
