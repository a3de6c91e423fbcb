//! Client-side shopping cart.
//!
//! # State Machine
//!
//! ```text
//! add / update / remove / clear ──► CartState ──► CartStorage::save
//!
//! checkout:
//!   idle ──begin_checkout──► loading ──complete_checkout(Ok)──► idle + checkout_url
//!                                   └─complete_checkout(Err)─► idle + error
//! ```
//!
//! The [`CartStore`] owns the [`CartState`]; nothing else mutates it. Every
//! mutation and every checkout outcome is followed by a write through the
//! [`CartStorage`] implementation the store was built with. Storage is an
//! optimization: implementations swallow their own failures, so the store
//! behaves identically whether or not writes succeed.

mod checkout;
mod line_item;
mod state;
mod store;

pub use checkout::{Checkout, CheckoutError, CheckoutLineInput};
pub use line_item::{LineItem, LineItemError};
pub use state::{CartState, PersistedCart};
pub use store::{CartAction, CartError, CartStorage, CartStore, EphemeralStorage};
