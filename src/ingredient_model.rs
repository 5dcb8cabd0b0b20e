//! # Ingredient Record Data Model
//!
//! This module defines the records that flow in and out of the combiner.
//!
//! ## Core Concepts
//!
//! - **IngredientRecord**: A raw `(quantity, unit, name)` triple as scraped from a
//!   recipe page, or a formatted line item produced by the combiner
//! - **CombinedIngredient**: One merged line item together with the exact total and
//!   grouping key it was built from
//!
//! ## Usage
//!
//! ```rust
//! use ingredient_combiner::ingredient_model::IngredientRecord;
//!
//! let record = IngredientRecord::new("1 1/2", "cups", "flour");
//! assert_eq!(record.to_string(), "1 1/2 cups flour");
//!
//! let bare = IngredientRecord::new("", "", "salt to taste");
//! assert_eq!(bare.to_string(), "salt to taste");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fraction::Fraction;

/// A free-text ingredient line split into its three parts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngredientRecord {
    /// Quantity text (e.g., "1 1/2", "½", "to taste")
    pub quantity: String,

    /// Unit text (e.g., "Tbsp.", "cups", "")
    pub unit: String,

    /// Ingredient name text (e.g., "boneless, skinless chicken breasts")
    pub name: String,
}

impl IngredientRecord {
    pub fn new(quantity: &str, unit: &str, name: &str) -> Self {
        Self {
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            name: name.to_string(),
        }
    }

    /// Check whether all three parts are blank
    pub fn is_blank(&self) -> bool {
        self.quantity.trim().is_empty() && self.unit.trim().is_empty() && self.name.trim().is_empty()
    }
}

impl From<(&str, &str, &str)> for IngredientRecord {
    fn from((quantity, unit, name): (&str, &str, &str)) -> Self {
        Self::new(quantity, unit, name)
    }
}

/// One merged line item with the data it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedIngredient {
    /// Grouping key produced by the name canonicalizer
    pub key: String,

    /// Canonical unit token the total is expressed in
    pub unit: String,

    /// Exact total, or `None` for records whose quantities are not numeric
    pub total: Option<Fraction>,

    /// Number of input records merged into this item
    pub contributions: usize,

    /// The formatted line item
    pub record: IngredientRecord,
}

impl CombinedIngredient {
    /// Check if this item sums numeric quantities
    pub fn is_numeric(&self) -> bool {
        self.total.is_some()
    }
}

impl fmt::Display for IngredientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.quantity, &self.unit, &self.name]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl fmt::Display for CombinedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)
    }
}
