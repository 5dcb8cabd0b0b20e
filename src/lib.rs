//! # Ingredient Combiner
//!
//! Normalizes ingredient records scraped from recipe pages and merges the ones
//! naming the same ingredient in the same unit into single grocery list items,
//! summing their quantities exactly.

pub mod combiner_config;
pub mod combiner_errors;
pub mod fraction;
pub mod grocery_list;
pub mod ingredient_combiner;
pub mod ingredient_model;
pub mod name_canonicalizer;
pub mod name_patterns;
pub mod quantity_parser;
pub mod unit_converter;
pub mod unit_normalizer;

pub use combiner_config::CombinerConfig;
pub use combiner_errors::{CombinerError, ConversionError, QuantityError, UnitError};
pub use fraction::Fraction;
pub use grocery_list::GroceryList;
pub use ingredient_combiner::IngredientCombiner;
pub use ingredient_model::{CombinedIngredient, IngredientRecord};
pub use name_canonicalizer::KnownNames;
