//! # Unit Normalizer
//!
//! Maps the many spellings recipes use for a unit ("Tbsp.", "tablespoons",
//! "tbs") to one canonical token ("tablespoon").
//!
//! Spellings that are not in the alias table are not an error: the cleaned
//! spelling becomes its own token, so two records that both say "handful"
//! still group together.

use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};

use crate::combiner_errors::{CombinerError, UnitError};

/// Alias lookup for canonical unit tokens
#[derive(Debug, Clone)]
pub struct UnitNormalizer {
    /// Cleaned spelling -> canonical unit
    canonical: HashMap<String, String>,
    /// Canonical unit -> display label
    display: HashMap<String, String>,
}

impl UnitNormalizer {
    /// Build the spelling -> canonical map from a canonical -> spellings table
    ///
    /// # Errors
    ///
    /// Returns `CombinerError::DuplicateAlias` when one spelling (after
    /// cleaning) is listed under two canonical units.
    pub fn new(
        aliases: &BTreeMap<String, Vec<String>>,
        display: &BTreeMap<String, String>,
    ) -> Result<Self, CombinerError> {
        let mut canonical: HashMap<String, String> = HashMap::new();

        for (unit, spellings) in aliases {
            let unit_key = clean_unit(unit);
            for spelling in std::iter::once(unit).chain(spellings.iter()) {
                let cleaned = clean_unit(spelling);
                if cleaned.is_empty() {
                    continue;
                }
                match canonical.get(&cleaned) {
                    Some(existing) if *existing != unit_key => {
                        return Err(CombinerError::DuplicateAlias {
                            alias: cleaned,
                            first: existing.clone(),
                            second: unit_key,
                        });
                    }
                    Some(_) => {}
                    None => {
                        canonical.insert(cleaned, unit_key.clone());
                    }
                }
            }
        }

        let display = display
            .iter()
            .map(|(unit, label)| (clean_unit(unit), label.clone()))
            .collect();

        debug!("Unit normalizer built with {} spellings", canonical.len());
        Ok(Self { canonical, display })
    }

    /// Look up a unit spelling
    ///
    /// # Errors
    ///
    /// `UnitError::Unknown` carries the cleaned spelling when the alias table
    /// has no entry for it. Empty units resolve to the empty token.
    pub fn resolve(&self, text: &str) -> Result<String, UnitError> {
        let cleaned = clean_unit(text);
        if cleaned.is_empty() {
            return Ok(String::new());
        }
        self.canonical
            .get(&cleaned)
            .cloned()
            .ok_or(UnitError::Unknown(cleaned))
    }

    /// Canonical token for a unit spelling, passing unknown spellings through
    ///
    /// ```rust
    /// use ingredient_combiner::combiner_config::CombinerConfig;
    /// use ingredient_combiner::unit_normalizer::UnitNormalizer;
    ///
    /// let config = CombinerConfig::default();
    /// let units = UnitNormalizer::new(&config.unit_aliases, &config.unit_display)?;
    /// assert_eq!(units.normalize("Tbsp."), "tablespoon");
    /// assert_eq!(units.normalize("Handfuls"), "handfuls");
    /// assert_eq!(units.normalize(""), "");
    /// # Ok::<(), ingredient_combiner::combiner_errors::CombinerError>(())
    /// ```
    pub fn normalize(&self, text: &str) -> String {
        match self.resolve(text) {
            Ok(unit) => {
                trace!("Normalized unit '{}' -> '{}'", text, unit);
                unit
            }
            Err(UnitError::Unknown(cleaned)) => {
                debug!("Unknown unit '{}', passing through as '{}'", text, cleaned);
                cleaned
            }
        }
    }

    /// Whether the alias table knows this spelling
    pub fn is_known(&self, text: &str) -> bool {
        self.resolve(text).is_ok()
    }

    /// Label to print for a canonical unit token
    pub fn display(&self, unit: &str) -> String {
        self.display
            .get(unit)
            .cloned()
            .unwrap_or_else(|| unit.to_string())
    }
}

/// Lowercase, drop periods and anything outside `[a-z ]`, collapse spaces
pub fn clean_unit(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect();
    lowered.split_whitespace().collect::<Vec<&str>>().join(" ")
}
