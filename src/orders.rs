//! Orders
//!
//! Turning a checkout form and cart lines into a validated order payload, and
//! submitting it to the commerce backend.

pub mod client;
pub mod form;
pub mod payload;
pub mod validation;

pub use client::{HttpOrderClient, MockOrderClient, OrderClient, OrderConfirmation, OrderError};
pub use form::CheckoutForm;
pub use payload::{Delivery, OrderLine, OrderPayload, build_payload, prepare_order};
pub use validation::{ValidationError, ValidationIssue, validate_payload};
