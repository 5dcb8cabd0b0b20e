//! # Combiner Configuration Module
//!
//! Every table the combiner consults lives here: unit aliases and display
//! labels, conversion factors, vulgar fractions, descriptor words, name
//! patterns, per-ingredient target units and count-to-weight rules.
//!
//! `CombinerConfig::default()` carries the built-in tables. A JSON file can
//! replace any subset of them; fields it does not name keep their defaults.
//!
//! ```rust
//! use ingredient_combiner::combiner_config::CombinerConfig;
//!
//! let config = CombinerConfig::from_json_str(r#"{ "target_units": { "flour": "cup" } }"#)?;
//! assert_eq!(config.target_units.get("flour").map(String::as_str), Some("cup"));
//! assert!(!config.unit_aliases.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::fraction::Fraction;

// Constants for name matching
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;
pub const DEFAULT_FIRST_TOKEN_MIN_OVERLAP: f64 = 0.5;

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "INGREDIENT_COMBINER_CONFIG";

/// A directed conversion factor: `1 from = factor to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionFactor {
    pub from: String,
    pub to: String,
    pub factor: Fraction,
}

/// Maps any name matching `pattern` to the canonical `concept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePattern {
    pub pattern: String,
    pub concept: String,
}

/// Weight of one counted item of an ingredient (e.g. one chicken breast = 4 oz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountWeight {
    /// Canonical name key the rule applies to
    pub ingredient: String,
    /// Amount per counted item, in `unit`
    pub amount: Fraction,
    pub unit: String,
}

/// Configuration structure for the ingredient combiner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinerConfig {
    /// Canonical unit -> accepted spellings
    pub unit_aliases: BTreeMap<String, Vec<String>>,
    /// Canonical unit -> label printed in combined records
    pub unit_display: BTreeMap<String, String>,
    /// Directed conversion table; inverses are never derived
    pub conversions: Vec<ConversionFactor>,
    /// Single-character fractions and their `a/b` text
    pub vulgar_fractions: Vec<(char, String)>,
    /// Words and phrases removed from names before matching
    pub descriptors: Vec<String>,
    /// Ordered name patterns, first match wins
    pub name_patterns: Vec<NamePattern>,
    /// Canonical name key -> unit its quantities are summed in
    pub target_units: BTreeMap<String, String>,
    pub count_weights: Vec<CountWeight>,
    /// Units that mean "this many items" for count-weight rules
    pub count_units: Vec<String>,
    /// Minimum normalized Levenshtein similarity for a fuzzy name match
    pub similarity_threshold: f64,
    /// Minimum token overlap (Jaccard) for a shared-first-token match
    pub first_token_min_overlap: f64,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            unit_aliases: default_unit_aliases(),
            unit_display: default_unit_display(),
            conversions: default_conversions(),
            vulgar_fractions: default_vulgar_fractions(),
            descriptors: default_descriptors(),
            name_patterns: default_name_patterns(),
            target_units: BTreeMap::new(),
            count_weights: Vec::new(),
            count_units: ["", "piece", "large", "medium", "small"]
                .iter()
                .map(|u| u.to_string())
                .collect(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            first_token_min_overlap: DEFAULT_FIRST_TOKEN_MIN_OVERLAP,
        }
    }
}

impl CombinerConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid combiner configuration JSON")
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Load the file named by `INGREDIENT_COMBINER_CONFIG`, or the defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Sum the quantities of `ingredient` in `unit`
    pub fn with_target_unit(mut self, ingredient: &str, unit: &str) -> Self {
        self.target_units
            .insert(ingredient.to_string(), unit.to_string());
        self
    }

    /// Weigh each counted `ingredient` as `amount` of `unit`
    pub fn with_count_weight(mut self, ingredient: &str, amount: Fraction, unit: &str) -> Self {
        self.count_weights.push(CountWeight {
            ingredient: ingredient.to_string(),
            amount,
            unit: unit.to_string(),
        });
        self
    }

    /// Add (or replace) a directed conversion factor
    pub fn with_conversion(mut self, from: &str, to: &str, factor: Fraction) -> Self {
        self.conversions
            .retain(|c| !(c.from == from && c.to == to));
        self.conversions.push(ConversionFactor {
            from: from.to_string(),
            to: to.to_string(),
            factor,
        });
        self
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_unit_aliases() -> BTreeMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        // Volume units
        ("teaspoon", &["teaspoons", "tsp", "tsps", "t"]),
        ("tablespoon", &["tablespoons", "tbsp", "tbsps", "tbs", "tbl", "tbls"]),
        ("fluid ounce", &["fluid ounces", "fl oz", "floz"]),
        ("cup", &["cups", "c"]),
        ("pint", &["pints", "pt", "pts"]),
        ("quart", &["quarts", "qt", "qts"]),
        ("gallon", &["gallons", "gal", "gals"]),
        ("milliliter", &["milliliters", "millilitre", "millilitres", "ml", "mls"]),
        ("liter", &["liters", "litre", "litres", "l", "ls"]),
        // Weight units
        ("gram", &["grams", "g", "gs", "gr"]),
        ("kilogram", &["kilograms", "kg", "kgs"]),
        ("ounce", &["ounces", "oz", "ozs"]),
        ("pound", &["pounds", "lb", "lbs"]),
        // Count units
        ("clove", &["cloves"]),
        ("can", &["cans", "tin", "tins"]),
        ("package", &["packages", "pkg", "pkgs", "packet", "packets"]),
        ("stick", &["sticks"]),
        ("slice", &["slices"]),
        ("piece", &["pieces", "pc", "pcs"]),
        ("bunch", &["bunches"]),
        ("head", &["heads"]),
        ("rib", &["ribs", "stalk", "stalks"]),
        ("sprig", &["sprigs"]),
        ("leaf", &["leaves"]),
        ("pinch", &["pinches"]),
        ("dash", &["dashes"]),
        // Size words written in the unit slot ("1 large egg")
        ("large", &["lg"]),
        ("medium", &["med"]),
        ("small", &["sm"]),
    ];
    table
        .iter()
        .map(|(unit, aliases)| (unit.to_string(), strings(aliases)))
        .collect()
}

pub fn default_unit_display() -> BTreeMap<String, String> {
    [
        ("teaspoon", "tsp"),
        ("tablespoon", "tbsp"),
        ("fluid ounce", "fl oz"),
        ("pint", "pt"),
        ("quart", "qt"),
        ("gallon", "gal"),
        ("milliliter", "ml"),
        ("liter", "l"),
        ("gram", "g"),
        ("kilogram", "kg"),
        ("ounce", "oz"),
        ("pound", "lb"),
    ]
    .iter()
    .map(|(unit, label)| (unit.to_string(), label.to_string()))
    .collect()
}

/// Built-in conversion factors.
///
/// Volume-to-volume and mass-to-mass entries are exact by definition or use
/// the usual kitchen roundings (1 cup = 237 ml, 1 oz = 28.35 g, 1 lb = 454 g).
/// `stick` is a stick of butter; that entry does not hold for other
/// ingredients.
pub fn default_conversions() -> Vec<ConversionFactor> {
    let table: &[(&str, &str, i64, i64)] = &[
        ("tablespoon", "teaspoon", 3, 1),
        ("teaspoon", "tablespoon", 1, 3),
        ("cup", "tablespoon", 16, 1),
        ("tablespoon", "cup", 1, 16),
        ("cup", "teaspoon", 48, 1),
        ("cup", "fluid ounce", 8, 1),
        ("fluid ounce", "cup", 1, 8),
        ("fluid ounce", "tablespoon", 2, 1),
        ("tablespoon", "fluid ounce", 1, 2),
        ("cup", "milliliter", 237, 1),
        ("liter", "milliliter", 1000, 1),
        ("milliliter", "liter", 1, 1000),
        ("gallon", "quart", 4, 1),
        ("quart", "pint", 2, 1),
        ("quart", "cup", 4, 1),
        ("pint", "cup", 2, 1),
        ("pound", "ounce", 16, 1),
        ("ounce", "pound", 1, 16),
        ("kilogram", "gram", 1000, 1),
        ("gram", "kilogram", 1, 1000),
        ("ounce", "gram", 567, 20),
        ("pound", "gram", 454, 1),
        ("stick", "tablespoon", 8, 1),
        ("stick", "cup", 1, 2),
    ];
    table
        .iter()
        .filter_map(|(from, to, numer, denom)| {
            Fraction::new(*numer, *denom).map(|factor| ConversionFactor {
                from: from.to_string(),
                to: to.to_string(),
                factor,
            })
        })
        .collect()
}

pub fn default_vulgar_fractions() -> Vec<(char, String)> {
    [
        ('½', "1/2"),
        ('¼', "1/4"),
        ('¾', "3/4"),
        ('⅓', "1/3"),
        ('⅔', "2/3"),
        ('⅛', "1/8"),
        ('⅜', "3/8"),
        ('⅝', "5/8"),
        ('⅞', "7/8"),
        ('⅕', "1/5"),
        ('⅖', "2/5"),
        ('⅗', "3/5"),
        ('⅘', "4/5"),
        ('⅙', "1/6"),
        ('⅚', "5/6"),
    ]
    .iter()
    .map(|(c, text)| (*c, text.to_string()))
    .collect()
}

pub fn default_descriptors() -> Vec<String> {
    strings(&[
        "boneless", "skinless", "dry", "fresh", "freshly", "extra", "low sodium", "reduced sodium",
        "large", "small", "medium", "whole", "ground", "sliced", "pieces", "breasts", "breast",
        "cut into", "cubed", "diced", "chopped", "minced", "shredded", "grated", "crushed",
        "peeled", "seeded", "halved", "quartered", "rinsed and drained", "rinsed", "drained",
        "thinly", "thickly", "coarsely", "finely", "roughly", "lightly", "packed", "prepared",
        "cooked", "raw", "uncooked", "frozen", "thawed", "room temperature", "at room temperature",
        "softened", "melted", "beaten", "divided", "for garnish", "for serving", "to taste",
        "as needed", "plus more", "or more", "optional", "about",
    ])
}

pub fn default_name_patterns() -> Vec<NamePattern> {
    let table: &[(&str, &str)] = &[
        (r"\bchicken breasts?\b", "chicken"),
        (r"\bchicken thighs?\b", "chicken thigh"),
        (r"^(?:\d+ )?eggs?$", "egg"),
        (r"\bgarlic cloves?\b|\bcloves? (?:of )?garlic\b", "garlic"),
        (r"^(?:unsalted |salted )?butter$", "butter"),
        (r"\b(?:all purpose|plain) flour\b", "flour"),
        (r"^(?:kosher |sea |table )?salt$", "salt"),
        (r"\b(?:extra virgin )?olive oil\b", "olive oil"),
    ];
    table
        .iter()
        .map(|(pattern, concept)| NamePattern {
            pattern: pattern.to_string(),
            concept: concept.to_string(),
        })
        .collect()
}
