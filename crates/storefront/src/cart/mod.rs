//! Server-side cart plumbing around `shopfront_core::cart`.
//!
//! - [`persistence`]: durable slot for the cart record
//! - [`checkout`]: checkout submission through the Storefront API
//! - [`service`]: async, lock-guarded access to the one cart store

pub mod checkout;
pub mod persistence;
pub mod service;

pub use checkout::CheckoutSubmitter;
pub use persistence::{CART_KEY, CartPersistence, FileSlotStore, MemorySlotStore, SlotStore};
pub use service::CartService;

use crate::shopify::StorefrontClient;

/// The cart service the binaries run: file-backed, submitting to Shopify.
pub type StorefrontCartService = CartService<CartPersistence<FileSlotStore>, StorefrontClient>;
