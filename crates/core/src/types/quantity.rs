//! Item quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum QuantityError {
    /// The quantity was zero.
    #[error("quantity must be at least 1")]
    Zero,
    /// The quantity exceeds the maximum.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// A non-zero item quantity.
///
/// Defaults to 1, matching the quantity a wishlist or cart action carries
/// when the shopper has not chosen one explicitly.
///
/// ## Examples
///
/// ```
/// use golden_fig_core::Quantity;
///
/// assert_eq!(Quantity::default().get(), 1);
/// assert!(Quantity::new(3).is_ok());
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Maximum quantity accepted for a single line item.
    pub const MAX: u32 = 10_000;

    /// Create a new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero or exceeds [`Self::MAX`].
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        if value > Self::MAX {
            return Err(QuantityError::TooLarge { max: Self::MAX });
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one() {
        assert_eq!(Quantity::default().get(), 1);
    }

    #[test]
    fn test_new_valid() {
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
        assert_eq!(Quantity::new(Quantity::MAX).unwrap().get(), Quantity::MAX);
    }

    #[test]
    fn test_new_zero() {
        assert!(matches!(Quantity::new(0), Err(QuantityError::Zero)));
    }

    #[test]
    fn test_new_too_large() {
        assert!(matches!(
            Quantity::new(Quantity::MAX + 1),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let qty = Quantity::new(2).unwrap();
        let json = serde_json::to_string(&qty).unwrap();
        assert_eq!(json, "2");
    }
}
