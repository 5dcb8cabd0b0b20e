//! # Grocery List Session
//!
//! A running grocery list built from several recipes. Records are kept per
//! recipe source (usually the page URL) so a recipe can be taken off the list
//! again; the combined view is recomputed from whatever remains.
//!
//! Every recomputation starts from an empty [`KnownNames`] and feeds the
//! records in arrival order, so names introduced only by a removed recipe no
//! longer influence how the remaining names are matched.
//!
//! ```rust
//! use ingredient_combiner::combiner_config::CombinerConfig;
//! use ingredient_combiner::grocery_list::GroceryList;
//! use ingredient_combiner::ingredient_combiner::IngredientCombiner;
//! use ingredient_combiner::ingredient_model::IngredientRecord;
//!
//! let combiner = IngredientCombiner::new(&CombinerConfig::default())?;
//! let mut list = GroceryList::new(combiner);
//! list.add_recipe("https://example.com/pancakes", vec![IngredientRecord::new("1", "cup", "milk")]);
//! list.add_recipe("https://example.com/cocoa", vec![IngredientRecord::new("2", "cups", "milk")]);
//! assert_eq!(list.combined(), vec![IngredientRecord::new("3", "cup", "milk")]);
//!
//! list.remove_recipe("https://example.com/cocoa");
//! assert_eq!(list.combined(), vec![IngredientRecord::new("1", "cup", "milk")]);
//! # Ok::<(), ingredient_combiner::combiner_errors::CombinerError>(())
//! ```

use log::{debug, info};

use crate::ingredient_combiner::IngredientCombiner;
use crate::ingredient_model::{CombinedIngredient, IngredientRecord};
use crate::name_canonicalizer::KnownNames;

/// Records contributed by one recipe
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeEntry {
    pub source: String,
    pub records: Vec<IngredientRecord>,
}

/// Recipes in the order they were added, combined on demand
#[derive(Debug, Clone)]
pub struct GroceryList {
    combiner: IngredientCombiner,
    recipes: Vec<RecipeEntry>,
}

impl GroceryList {
    pub fn new(combiner: IngredientCombiner) -> Self {
        Self {
            combiner,
            recipes: Vec::new(),
        }
    }

    /// Add the records of a recipe
    ///
    /// Adding to a source that is already on the list appends to it and keeps
    /// its original position.
    pub fn add_recipe(&mut self, source: &str, records: Vec<IngredientRecord>) {
        info!("Adding {} records from '{}'", records.len(), source);
        match self.recipes.iter().position(|r| r.source == source) {
            Some(slot) => self.recipes[slot].records.extend(records),
            None => self.recipes.push(RecipeEntry {
                source: source.to_string(),
                records,
            }),
        }
    }

    /// Remove a recipe; returns how many records it contributed
    pub fn remove_recipe(&mut self, source: &str) -> usize {
        let before = self.len();
        self.recipes.retain(|r| r.source != source);
        let removed = before - self.len();
        if removed == 0 {
            debug!("No recipe '{}' on the list", source);
        } else {
            info!("Removed {} records from '{}'", removed, source);
        }
        removed
    }

    /// Sources in the order they were added
    pub fn sources(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.source.as_str()).collect()
    }

    pub fn recipes(&self) -> &[RecipeEntry] {
        &self.recipes
    }

    /// All records in arrival order
    pub fn records(&self) -> Vec<IngredientRecord> {
        self.recipes
            .iter()
            .flat_map(|r| r.records.iter().cloned())
            .collect()
    }

    /// Total number of raw records
    pub fn len(&self) -> usize {
        self.recipes.iter().map(|r| r.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    /// Combined line items for the current list
    pub fn combined(&self) -> Vec<IngredientRecord> {
        self.combined_detailed()
            .into_iter()
            .map(|item| item.record)
            .collect()
    }

    /// Combined line items with totals and grouping keys
    pub fn combined_detailed(&self) -> Vec<CombinedIngredient> {
        let mut known = KnownNames::new();
        self.combiner.combine_detailed(&self.records(), &mut known)
    }

    pub fn combiner(&self) -> &IngredientCombiner {
        &self.combiner
    }
}
