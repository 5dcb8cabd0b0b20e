//! # Ingredient Combiner
//!
//! Merges raw ingredient records that name the same ingredient in the same
//! unit into single line items.
//!
//! ## Algorithm
//!
//! For each record, in order:
//!
//! 1. Canonicalize the name, normalize the unit, parse the quantity
//! 2. Quantities that are not numeric go to a side list, merged only with
//!    records of the same key and unit; their names are joined with `"; "`,
//!    each prefixed by its own quantity text when that differs from the first
//! 3. Numeric quantities of counted items may be weighed first ("2 chicken
//!    breasts" -> 8 oz), then are converted to the ingredient's target unit
//! 4. When no conversion exists, the record is grouped under its own unit
//! 5. The quantity is added to the `(key, unit)` group; the longest original
//!    name becomes the group's display name
//!
//! Numeric groups are emitted first, then the side list, each in the order the
//! group was first seen. Malformed input never fails and no record is dropped.
//!
//! ## Usage
//!
//! ```rust
//! use ingredient_combiner::combiner_config::CombinerConfig;
//! use ingredient_combiner::ingredient_combiner::IngredientCombiner;
//! use ingredient_combiner::ingredient_model::IngredientRecord;
//! use ingredient_combiner::name_canonicalizer::KnownNames;
//!
//! let combiner = IngredientCombiner::new(&CombinerConfig::default())?;
//! let mut known = KnownNames::new();
//! let records = vec![
//!     IngredientRecord::new("1/2", "tbsp", "olive oil"),
//!     IngredientRecord::new("1", "Tbsp.", "olive oil"),
//! ];
//! let combined = combiner.combine(&records, &mut known);
//! assert_eq!(combined, vec![IngredientRecord::new("1 1/2", "tbsp", "olive oil")]);
//! # Ok::<(), ingredient_combiner::combiner_errors::CombinerError>(())
//! ```

use log::{debug, info, trace, warn};
use std::collections::{HashMap, HashSet};

use crate::combiner_config::CombinerConfig;
use crate::combiner_errors::CombinerError;
use crate::fraction::Fraction;
use crate::ingredient_model::{CombinedIngredient, IngredientRecord};
use crate::name_canonicalizer::{KnownNames, NameCanonicalizer};
use crate::quantity_parser::{format_quantity, QuantityParser};
use crate::unit_converter::UnitConverter;
use crate::unit_normalizer::UnitNormalizer;

/// Running sum for one `(key, unit)` group
#[derive(Debug)]
struct NumericGroup {
    key: String,
    unit: String,
    total: Fraction,
    display_name: String,
    contributions: usize,
}

/// Records whose quantities could not be summed, merged by exact key and unit
#[derive(Debug)]
struct TextGroup {
    key: String,
    unit: String,
    quantity: String,
    names: Vec<String>,
    contributions: usize,
}

/// Groups in first-seen order with a lookup index
#[derive(Debug)]
struct Groups<G> {
    items: Vec<G>,
    index: HashMap<(String, String), usize>,
}

impl<G> Default for Groups<G> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<G> Groups<G> {
    fn get_or_insert_with(&mut self, key: &str, unit: &str, create: impl FnOnce() -> G) -> &mut G {
        let lookup = (key.to_string(), unit.to_string());
        let existing = self.index.get(&lookup).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                self.items.push(create());
                let slot = self.items.len() - 1;
                self.index.insert(lookup, slot);
                slot
            }
        };
        &mut self.items[slot]
    }
}

/// Weight of one counted item
#[derive(Debug, Clone)]
struct CountWeightRule {
    amount: Fraction,
    unit: String,
}

/// The combining engine: immutable tables plus the aggregation algorithm
#[derive(Debug, Clone)]
pub struct IngredientCombiner {
    quantities: QuantityParser,
    units: UnitNormalizer,
    converter: UnitConverter,
    names: NameCanonicalizer,
    /// Canonical name key -> canonical target unit
    target_units: HashMap<String, String>,
    count_weights: HashMap<String, CountWeightRule>,
    count_units: HashSet<String>,
}

impl IngredientCombiner {
    /// Build a combiner from a configuration
    ///
    /// Unit names used anywhere in the configuration (conversion table, target
    /// units, count-weight rules) are normalized through the alias table, so
    /// `"tbsp"` and `"tablespoon"` are interchangeable there.
    ///
    /// # Errors
    ///
    /// Returns a `CombinerError` for duplicate unit aliases, name patterns that
    /// do not compile, or non-positive factors.
    pub fn new(config: &CombinerConfig) -> Result<Self, CombinerError> {
        let quantities = QuantityParser::new(&config.vulgar_fractions);
        let units = UnitNormalizer::new(&config.unit_aliases, &config.unit_display)?;
        let converter = UnitConverter::new(&config.conversions, &units)?;
        let names = NameCanonicalizer::with_config(config)?;

        let target_units = config
            .target_units
            .iter()
            .map(|(ingredient, unit)| (ingredient.clone(), units.normalize(unit)))
            .collect();

        let mut count_weights = HashMap::new();
        for rule in &config.count_weights {
            let unit = units.normalize(&rule.unit);
            if rule.amount <= Fraction::ZERO {
                return Err(CombinerError::InvalidFactor {
                    from: rule.ingredient.clone(),
                    to: unit,
                });
            }
            count_weights.insert(
                rule.ingredient.clone(),
                CountWeightRule {
                    amount: rule.amount,
                    unit,
                },
            );
        }

        let count_units = config.count_units.iter().map(|u| units.normalize(u)).collect();

        info!(
            "Created IngredientCombiner: {} conversions, {} name patterns, {} target units, {} count weights",
            config.conversions.len(),
            config.name_patterns.len(),
            config.target_units.len(),
            config.count_weights.len()
        );

        Ok(Self {
            quantities,
            units,
            converter,
            names,
            target_units,
            count_weights,
            count_units,
        })
    }

    /// Combine records into formatted line items
    pub fn combine(&self, records: &[IngredientRecord], known: &mut KnownNames) -> Vec<IngredientRecord> {
        self.combine_detailed(records, known)
            .into_iter()
            .map(|item| item.record)
            .collect()
    }

    /// Combine records, keeping the exact totals and grouping keys
    pub fn combine_detailed(
        &self,
        records: &[IngredientRecord],
        known: &mut KnownNames,
    ) -> Vec<CombinedIngredient> {
        let mut numeric: Groups<NumericGroup> = Groups::default();
        let mut text: Groups<TextGroup> = Groups::default();

        for record in records {
            let key = self.names.canonicalize(&record.name, known);
            let unit = self.units.normalize(&record.unit);

            let quantity = match self.quantities.parse(&record.quantity) {
                Ok(quantity) => quantity,
                Err(err) => {
                    debug!("Quantity '{}' of '{}' is not numeric: {}", record.quantity, record.name, err);
                    add_text(&mut text, &key, &unit, record);
                    continue;
                }
            };

            let (unit_used, amount) = self.to_group_unit(&key, &unit, quantity);
            let group = numeric.get_or_insert_with(&key, &unit_used, || NumericGroup {
                key: key.clone(),
                unit: unit_used.clone(),
                total: Fraction::ZERO,
                display_name: record.name.trim().to_string(),
                contributions: 0,
            });

            match group.total.checked_add(&amount) {
                Some(total) => {
                    group.total = total;
                    group.contributions += 1;
                    let name = record.name.trim();
                    if name.chars().count() > group.display_name.chars().count() {
                        group.display_name = name.to_string();
                    }
                    trace!("Group ({}, {}) total now {}", key, unit_used, total);
                }
                None => {
                    warn!(
                        "Sum for ({}, {}) overflows; keeping '{} {} {}' unsummed",
                        key, unit_used, record.quantity, record.unit, record.name
                    );
                    add_text(&mut text, &key, &unit, record);
                }
            }
        }

        let mut combined: Vec<CombinedIngredient> = numeric
            .items
            .into_iter()
            // A group created for a record whose sum then overflowed absorbed nothing
            .filter(|group| group.contributions > 0)
            .map(|group| CombinedIngredient {
                record: IngredientRecord {
                    quantity: format_quantity(&group.total),
                    unit: self.units.display(&group.unit),
                    name: group.display_name,
                },
                key: group.key,
                unit: group.unit,
                total: Some(group.total),
                contributions: group.contributions,
            })
            .collect();

        combined.extend(text.items.into_iter().map(|group| CombinedIngredient {
            record: IngredientRecord {
                quantity: group.quantity,
                unit: self.units.display(&group.unit),
                name: group.names.join("; "),
            },
            contributions: group.contributions,
            key: group.key,
            unit: group.unit,
            total: None,
        }));

        info!("Combined {} records into {} items", records.len(), combined.len());
        combined
    }

    /// Unit a numeric quantity is summed in, and the quantity in that unit
    fn to_group_unit(&self, key: &str, unit: &str, quantity: Fraction) -> (String, Fraction) {
        let (unit, quantity) = self.apply_count_weight(key, unit, quantity);
        let target = self
            .target_units
            .get(key)
            .cloned()
            .unwrap_or_else(|| unit.clone());

        match self.converter.convert(&quantity, &unit, &target) {
            Ok(converted) => (target, converted),
            Err(err) => {
                debug!("{}; grouping '{}' by '{}' instead of '{}'", err, key, unit, target);
                (unit, quantity)
            }
        }
    }

    /// Weigh counted items when a rule exists for the ingredient
    fn apply_count_weight(&self, key: &str, unit: &str, quantity: Fraction) -> (String, Fraction) {
        if !self.count_units.contains(unit) {
            return (unit.to_string(), quantity);
        }
        let Some(rule) = self.count_weights.get(key) else {
            return (unit.to_string(), quantity);
        };
        match quantity.checked_mul(&rule.amount) {
            Some(weight) => {
                debug!("Weighed {} x '{}' as {} {}", quantity, key, weight, rule.unit);
                (rule.unit.clone(), weight)
            }
            None => (unit.to_string(), quantity),
        }
    }

    pub fn units(&self) -> &UnitNormalizer {
        &self.units
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    pub fn names(&self) -> &NameCanonicalizer {
        &self.names
    }

    pub fn quantities(&self) -> &QuantityParser {
        &self.quantities
    }
}

fn add_text(text: &mut Groups<TextGroup>, key: &str, unit: &str, record: &IngredientRecord) {
    let quantity = record.quantity.trim();
    let name = record.name.trim();
    let group = text.get_or_insert_with(key, unit, || TextGroup {
        key: key.to_string(),
        unit: unit.to_string(),
        quantity: quantity.to_string(),
        names: Vec::new(),
        contributions: 0,
    });
    group.contributions += 1;

    let entry = if quantity == group.quantity {
        name.to_string()
    } else {
        [quantity, name]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<&str>>()
            .join(" ")
    };
    if !entry.is_empty() {
        group.names.push(entry);
    }
}
