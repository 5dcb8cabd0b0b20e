//! # Combiner Error Types Module
//!
//! Most of these are not failures at all: an unparseable quantity, an unknown
//! unit or a missing conversion factor are states the aggregator branches on.
//! Only [`CombinerError`] is returned to callers, when a configuration cannot be
//! turned into a working combiner.

/// Why a quantity text has no exact numeric reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Nothing but whitespace
    Empty,
    /// A token that is neither a fraction, an integer nor a decimal
    InvalidToken(String),
    /// A fraction token such as `1/0`
    ZeroDenominator(String),
    /// The value does not fit the fraction representation
    Overflow(String),
}

impl std::fmt::Display for QuantityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityError::Empty => write!(f, "Empty quantity"),
            QuantityError::InvalidToken(token) => write!(f, "Not a number: '{token}'"),
            QuantityError::ZeroDenominator(token) => {
                write!(f, "Zero denominator in fraction: '{token}'")
            }
            QuantityError::Overflow(text) => write!(f, "Quantity too large: '{text}'"),
        }
    }
}

impl std::error::Error for QuantityError {}

/// Unit spelling that is not in the alias table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    Unknown(String),
}

impl std::fmt::Display for UnitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitError::Unknown(unit) => write!(f, "Unknown unit: '{unit}'"),
        }
    }
}

impl std::error::Error for UnitError {}

/// A quantity that could not be expressed in the requested unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// No factor is configured for this directed unit pair
    Unconvertible { from: String, to: String },
    /// The converted value does not fit the fraction representation
    Overflow { from: String, to: String },
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::Unconvertible { from, to } => {
                write!(f, "No conversion from '{from}' to '{to}'")
            }
            ConversionError::Overflow { from, to } => {
                write!(f, "Overflow converting '{from}' to '{to}'")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// Invalid combiner configuration
#[derive(Debug)]
pub enum CombinerError {
    /// A name pattern or descriptor failed to compile
    InvalidPattern(regex::Error),
    /// The same spelling is listed under two canonical units
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
    /// A conversion or count-weight factor that is zero or negative
    InvalidFactor { from: String, to: String },
}

impl std::fmt::Display for CombinerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombinerError::InvalidPattern(err) => write!(f, "Invalid name pattern: {err}"),
            CombinerError::DuplicateAlias {
                alias,
                first,
                second,
            } => write!(
                f,
                "Unit alias '{alias}' maps to both '{first}' and '{second}'"
            ),
            CombinerError::InvalidFactor { from, to } => {
                write!(f, "Factor from '{from}' to '{to}' must be positive")
            }
        }
    }
}

impl std::error::Error for CombinerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CombinerError::InvalidPattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for CombinerError {
    fn from(err: regex::Error) -> Self {
        CombinerError::InvalidPattern(err)
    }
}
