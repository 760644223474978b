//! Store API client and types
//!
//! Covers the session, product lookup, add-to-cart and web-checkout calls.

pub mod client;
pub mod types;

pub use client::{cache_bust, redact_query, StoreClient, StoreError};
pub use types::{AddToCartResponse, Product, ProductsResponse};
