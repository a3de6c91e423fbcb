//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Money};
pub use product::*;
pub use quantity::{Quantity, QuantityError};
