//! Product SKU type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SkuError {
    /// The input string is empty.
    #[error("sku cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("sku must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace or a control character.
    #[error("sku cannot contain whitespace or control characters")]
    InvalidCharacter,
}

/// A stock keeping unit identifier.
///
/// SKUs identify both products and their purchasable variants. A variant SKU
/// (e.g. `A1-red`) is distinct from its parent product SKU (e.g. `A1`), and
/// wishlist membership is always keyed by the variant SKU.
///
/// ## Constraints
///
/// - Length: 1-64 characters (the Magento catalog limit)
/// - No whitespace or control characters
///
/// ## Examples
///
/// ```
/// use golden_fig_core::Sku;
///
/// assert!(Sku::parse("GF-TEE-001").is_ok());
/// assert!(Sku::parse("GF-TEE-001-red").is_ok());
///
/// assert!(Sku::parse("").is_err());         // empty
/// assert!(Sku::parse("GF TEE").is_err());   // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Maximum length of a SKU (Magento catalog limit).
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Sku` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 64 characters
    /// - Contains whitespace or control characters
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        if s.is_empty() {
            return Err(SkuError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(SkuError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Sku` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_skus() {
        assert!(Sku::parse("GF-TEE-001").is_ok());
        assert!(Sku::parse("GF-TEE-001-red").is_ok());
        assert!(Sku::parse("24-MB01").is_ok());
        assert!(Sku::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Sku::parse(""), Err(SkuError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(Sku::parse(&long), Err(SkuError::TooLong { .. })));
    }

    #[test]
    fn test_parse_whitespace() {
        assert!(matches!(
            Sku::parse("GF TEE"),
            Err(SkuError::InvalidCharacter)
        ));
        assert!(matches!(
            Sku::parse("GF\tTEE"),
            Err(SkuError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_control_character() {
        assert!(matches!(
            Sku::parse("GF\u{1}TEE"),
            Err(SkuError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_display() {
        let sku = Sku::parse("GF-TEE-001").unwrap();
        assert_eq!(format!("{sku}"), "GF-TEE-001");
    }

    #[test]
    fn test_from_str() {
        let sku: Sku = "GF-TEE-001".parse().unwrap();
        assert_eq!(sku.as_str(), "GF-TEE-001");
    }

    #[test]
    fn test_serde_roundtrip() {
        let sku = Sku::parse("GF-TEE-001").unwrap();
        let json = serde_json::to_string(&sku).unwrap();
        assert_eq!(json, "\"GF-TEE-001\"");

        let parsed: Sku = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sku);
    }

    #[test]
    fn test_usable_as_map_key() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Sku::parse("A1-red").unwrap(), 9);
        assert_eq!(map.get(&Sku::parse("A1-red").unwrap()), Some(&9));
    }
}
