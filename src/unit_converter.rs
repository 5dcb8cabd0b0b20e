//! # Unit Converter
//!
//! Converts quantities between canonical units using a directed factor table.
//! Only pairs listed in the table convert; inverse and chained conversions are
//! never derived, so `cup -> milliliter` existing says nothing about
//! `milliliter -> cup`.

use log::{debug, trace};
use std::collections::HashMap;

use crate::combiner_config::ConversionFactor;
use crate::combiner_errors::{CombinerError, ConversionError};
use crate::fraction::Fraction;
use crate::unit_normalizer::UnitNormalizer;

/// Directed conversion factors between canonical units
#[derive(Debug, Clone, Default)]
pub struct UnitConverter {
    factors: HashMap<(String, String), Fraction>,
}

impl UnitConverter {
    /// Build the converter, normalizing both unit names of every entry
    ///
    /// Later entries for the same pair replace earlier ones.
    ///
    /// # Errors
    ///
    /// `CombinerError::InvalidFactor` for a zero or negative factor.
    pub fn new(
        conversions: &[ConversionFactor],
        units: &UnitNormalizer,
    ) -> Result<Self, CombinerError> {
        let mut factors = HashMap::new();
        for conversion in conversions {
            let from = units.normalize(&conversion.from);
            let to = units.normalize(&conversion.to);
            if conversion.factor <= Fraction::ZERO {
                return Err(CombinerError::InvalidFactor { from, to });
            }
            factors.insert((from, to), conversion.factor);
        }
        debug!("Unit converter built with {} factors", factors.len());
        Ok(Self { factors })
    }

    /// Convert `quantity` from one canonical unit to another
    ///
    /// # Errors
    ///
    /// `ConversionError::Unconvertible` when the table has no `(from, to)`
    /// entry; `ConversionError::Overflow` if the exact result does not fit.
    pub fn convert(&self, quantity: &Fraction, from: &str, to: &str) -> Result<Fraction, ConversionError> {
        if from == to {
            return Ok(*quantity);
        }
        let factor = self
            .factors
            .get(&(from.to_string(), to.to_string()))
            .ok_or_else(|| ConversionError::Unconvertible {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        let converted = quantity
            .checked_mul(factor)
            .ok_or_else(|| ConversionError::Overflow {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        trace!("Converted {} {} -> {} {}", quantity, from, converted, to);
        Ok(converted)
    }

    /// Factor for a directed pair, if configured
    pub fn factor(&self, from: &str, to: &str) -> Option<Fraction> {
        self.factors.get(&(from.to_string(), to.to_string())).copied()
    }
}
