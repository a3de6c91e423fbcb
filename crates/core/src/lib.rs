//! Shopfront Core - Cart engine and variant resolver.
//!
//! This crate provides the pieces of the storefront that carry real state
//! machine structure:
//! - `cart` - Line items, cart state, and the cart store with its checkout lifecycle
//! - `variant` - Resolving selected option values to a purchasable variant
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure state transitions - no
//! I/O, no HTTP clients. Persistence and checkout submission are reached
//! through the [`cart::CartStorage`] trait and the [`cart::Checkout`] outcome
//! type, implemented by the `storefront` crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, quantities, and catalog products
//! - [`cart`] - Cart store
//! - [`variant`] - Variant resolver

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;
pub mod variant;

pub use cart::{
    CartAction, CartError, CartState, CartStorage, CartStore, Checkout, CheckoutError,
    CheckoutLineInput, EphemeralStorage, LineItem, LineItemError, PersistedCart,
};
pub use types::*;
pub use variant::{OptionSelection, OptionState, OptionValueState, VariantSelector};
