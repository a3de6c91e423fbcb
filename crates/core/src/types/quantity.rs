//! Line item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A positive item quantity (always at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for `0`.
    pub const fn new(quantity: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(quantity) {
            Some(q) => Ok(Self(q)),
            None => Err(QuantityError::Zero),
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(quantity: u32) -> Result<Self, Self::Error> {
        Self::new(quantity)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}
