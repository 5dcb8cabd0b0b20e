//! # Quantity Parser
//!
//! Turns free-text recipe quantities into exact [`Fraction`]s and back.
//!
//! ## Supported formats
//!
//! - Integers and decimals: `"2"`, `"1.5"`, `".25"`
//! - Simple fractions: `"1/2"`, `"3⁄4"`
//! - Mixed numbers: `"1 1/2"`, `"1-1/2"`
//! - Vulgar fraction characters: `"½"`, `"1½"`, `"2 ¾"`
//!
//! Anything else (`"to taste"`, `"1 to 2"`, `"a pinch"`) is rejected as a whole:
//! a partial reading would silently drop meaning.
//!
//! ## Usage
//!
//! ```rust
//! use ingredient_combiner::quantity_parser::{format_quantity, parse_quantity};
//!
//! let qty = parse_quantity("1 ½").unwrap();
//! assert_eq!(format_quantity(&qty), "1 1/2");
//! assert!(parse_quantity("to taste").is_err());
//! ```

use lazy_static::lazy_static;
use log::trace;

use crate::combiner_config::default_vulgar_fractions;
use crate::combiner_errors::QuantityError;
use crate::fraction::Fraction;

lazy_static! {
    static ref DEFAULT_PARSER: QuantityParser = QuantityParser::new(&default_vulgar_fractions());
}

/// Quantity parser with a configurable vulgar fraction table
#[derive(Debug, Clone)]
pub struct QuantityParser {
    /// Single characters and the `" a/b"` text they stand for
    replacements: Vec<(char, String)>,
}

impl QuantityParser {
    /// Create a parser from `(character, "a/b")` pairs
    pub fn new(vulgar_fractions: &[(char, String)]) -> Self {
        let replacements = vulgar_fractions
            .iter()
            .map(|(c, text)| (*c, format!(" {} ", text.trim())))
            .collect();
        Self { replacements }
    }

    /// Parse a quantity text into an exact fraction
    ///
    /// # Errors
    ///
    /// Every error means "not numeric"; the variant only says why.
    pub fn parse(&self, text: &str) -> Result<Fraction, QuantityError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(QuantityError::Empty);
        }

        let mut expanded = String::with_capacity(trimmed.len() + 8);
        for c in trimmed.chars() {
            match c {
                '-' | '–' | '—' => expanded.push(' '),
                '⁄' => expanded.push('/'),
                _ => match self.replacements.iter().find(|(v, _)| *v == c) {
                    Some((_, replacement)) => expanded.push_str(replacement),
                    None => expanded.push(c),
                },
            }
        }
        trace!("Expanded quantity '{}' -> '{}'", trimmed, expanded);

        let mut total = Fraction::ZERO;
        for token in expanded.split_whitespace() {
            let value = parse_token(token)?;
            total = total
                .checked_add(&value)
                .ok_or_else(|| QuantityError::Overflow(trimmed.to_string()))?;
        }
        Ok(total)
    }
}

impl Default for QuantityParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

fn parse_token(token: &str) -> Result<Fraction, QuantityError> {
    if let Some((numer, denom)) = token.split_once('/') {
        let numer = parse_digits(numer, token)?;
        let denom = parse_digits(denom, token)?;
        if denom == 0 {
            return Err(QuantityError::ZeroDenominator(token.to_string()));
        }
        return Fraction::new(numer, denom).ok_or_else(|| QuantityError::Overflow(token.to_string()));
    }

    if let Some((whole, decimals)) = token.split_once('.') {
        if whole.is_empty() && decimals.is_empty() {
            return Err(QuantityError::InvalidToken(token.to_string()));
        }
        let whole = if whole.is_empty() { 0 } else { parse_digits(whole, token)? };
        if decimals.is_empty() {
            return Ok(Fraction::from_integer(whole));
        }
        let scale = u32::try_from(decimals.len())
            .ok()
            .and_then(|len| 10_i64.checked_pow(len))
            .ok_or_else(|| QuantityError::Overflow(token.to_string()))?;
        let decimals = parse_digits(decimals, token)?;
        let numer = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(decimals))
            .ok_or_else(|| QuantityError::Overflow(token.to_string()))?;
        return Fraction::new(numer, scale).ok_or_else(|| QuantityError::Overflow(token.to_string()));
    }

    parse_digits(token, token).map(Fraction::from_integer)
}

/// Parse an unsigned run of ASCII digits; signs and separators are rejected
fn parse_digits(digits: &str, token: &str) -> Result<i64, QuantityError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuantityError::InvalidToken(token.to_string()));
    }
    digits
        .parse::<i64>()
        .map_err(|_| QuantityError::Overflow(token.to_string()))
}

/// Parse a quantity with the built-in vulgar fraction table
pub fn parse_quantity(text: &str) -> Result<Fraction, QuantityError> {
    DEFAULT_PARSER.parse(text)
}

/// Format a fraction the way recipes write it
///
/// `0`, `3`, `3/4` and `1 1/2` are the only shapes produced, so the output
/// parses back to the same value.
pub fn format_quantity(value: &Fraction) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    let sign = if value.is_negative() { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude.is_integer() {
        return format!("{sign}{}", magnitude.numer());
    }

    let whole = magnitude.trunc();
    let rest = magnitude.fract();
    if whole == 0 {
        format!("{sign}{}/{}", rest.numer(), rest.denom())
    } else {
        format!("{sign}{whole} {}/{}", rest.numer(), rest.denom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_parse_integers_and_decimals() {
        assert_eq!(parse_quantity("2").unwrap(), frac(2, 1));
        assert_eq!(parse_quantity("  12 ").unwrap(), frac(12, 1));
        assert_eq!(parse_quantity("1.5").unwrap(), frac(3, 2));
        assert_eq!(parse_quantity(".25").unwrap(), frac(1, 4));
        assert_eq!(parse_quantity("2.").unwrap(), frac(2, 1));
        assert_eq!(parse_quantity("0.1").unwrap(), frac(1, 10));
    }

    #[test]
    fn test_parse_fractions_and_mixed_numbers() {
        assert_eq!(parse_quantity("1/2").unwrap(), frac(1, 2));
        assert_eq!(parse_quantity("3⁄4").unwrap(), frac(3, 4));
        assert_eq!(parse_quantity("1 1/2").unwrap(), frac(3, 2));
        assert_eq!(parse_quantity("1-1/2").unwrap(), frac(3, 2));
        assert_eq!(parse_quantity("2 2/4").unwrap(), frac(5, 2));
    }

    #[test]
    fn test_parse_vulgar_fractions() {
        assert_eq!(parse_quantity("½").unwrap(), frac(1, 2));
        assert_eq!(parse_quantity("1½").unwrap(), frac(3, 2));
        assert_eq!(parse_quantity("2 ¾").unwrap(), frac(11, 4));
        assert_eq!(parse_quantity("⅓").unwrap(), frac(1, 3));
        assert_eq!(parse_quantity("⅞").unwrap(), frac(7, 8));
    }

    #[test]
    fn test_custom_vulgar_table() {
        let parser = QuantityParser::new(&[('½', "1/2".to_string())]);
        assert_eq!(parser.parse("½").unwrap(), frac(1, 2));
        assert!(matches!(parser.parse("¼"), Err(QuantityError::InvalidToken(_))));
    }

    #[test]
    fn test_non_numeric_rejected_whole() {
        assert_eq!(parse_quantity(""), Err(QuantityError::Empty));
        assert_eq!(parse_quantity("   "), Err(QuantityError::Empty));
        assert!(matches!(parse_quantity("to taste"), Err(QuantityError::InvalidToken(_))));
        assert!(matches!(parse_quantity("1 to 2"), Err(QuantityError::InvalidToken(_))));
        assert!(matches!(parse_quantity("1,5"), Err(QuantityError::InvalidToken(_))));
        assert!(matches!(parse_quantity("a/2"), Err(QuantityError::InvalidToken(_))));
        assert!(matches!(parse_quantity("."), Err(QuantityError::InvalidToken(_))));
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(
            parse_quantity("1/0"),
            Err(QuantityError::ZeroDenominator("1/0".to_string()))
        );
    }

    #[test]
    fn test_overflow_is_not_numeric() {
        assert!(matches!(
            parse_quantity("99999999999999999999999"),
            Err(QuantityError::Overflow(_))
        ));
        assert!(matches!(
            parse_quantity("0.0000000000000000000001"),
            Err(QuantityError::Overflow(_))
        ));
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(&Fraction::ZERO), "0");
        assert_eq!(format_quantity(&frac(2, 1)), "2");
        assert_eq!(format_quantity(&frac(3, 4)), "3/4");
        assert_eq!(format_quantity(&frac(3, 2)), "1 1/2");
        assert_eq!(format_quantity(&frac(18, 16)), "1 1/8");
        assert_eq!(format_quantity(&frac(-3, 2)), "-1 1/2");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for numer in 0..=40 {
            for denom in [1, 2, 3, 4, 6, 8, 16, 20] {
                let q = frac(numer, denom);
                assert_eq!(parse_quantity(&format_quantity(&q)).unwrap(), q);
            }
        }
    }
}
