//! Teakworld
//!
//! Storefront core for the Teakworld furniture shop: a persisted shopping cart,
//! the three-phase checkout flow and the order submission pipeline that talks to
//! the commerce backend.

pub mod blocks;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod money;
pub mod orders;
pub mod prelude;
