//! Shopfront storefront library.
//!
//! Catalog client for the Shopify Storefront API, the server-side cart
//! (persistence, checkout, async service) and the JSON API served by the
//! `shopfront-storefront` binary. The CLI reuses the same pieces.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
