//! Checkout
//!
//! Order summary figures and the review → checkout → success flow.

pub mod phase;
pub mod summary;

pub use phase::{
    Checkout, CheckoutError, CheckoutPhase, OrderSnapshot, PendingOrder, PhaseError,
};
pub use summary::{OrderSummary, PricingPolicy};
