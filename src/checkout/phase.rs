//! Checkout phases
//!
//! `Review` → `Checkout` → `Success`, with a single way back from `Checkout`
//! to `Review`. `Success` is terminal.
//!
//! Placing an order is split in two so callers can observe
//! [`Checkout::is_submitting`] while the request is in flight:
//! [`Checkout::begin_submission`] validates and raises the flag, and
//! [`Checkout::complete_submission`] applies the outcome. The snapshot shown on
//! success is the cart as it was submitted, even if the cart changed while the
//! request was in flight.

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, CartItem, CartStore},
    checkout::summary::{OrderSummary, PricingPolicy},
    orders::{
        client::{OrderClient, OrderConfirmation, OrderError},
        form::CheckoutForm,
        payload::{OrderPayload, prepare_order},
        validation::ValidationError,
    },
};

/// Errors raised by phase transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    /// Checkout needs at least one cart item.
    #[error("cannot proceed to checkout with an empty cart")]
    EmptyCart,

    /// The transition is not allowed from the current phase.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current phase.
        from: &'static str,

        /// Requested phase.
        to: &'static str,
    },
}

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Not in a phase that allows submission.
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// A submission is already in flight.
    #[error("an order is already being submitted")]
    AlreadySubmitting,

    /// An outcome arrived with no submission in flight.
    #[error("no order submission is in flight")]
    NotSubmitting,

    /// The payload failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Frozen view of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    items: Vec<CartItem>,
    summary: OrderSummary,
    confirmation: OrderConfirmation,
}

impl OrderSnapshot {
    /// Lines as they were when the order was placed.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Figures as they were when the order was placed.
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Backend acknowledgement.
    pub fn confirmation(&self) -> &OrderConfirmation {
        &self.confirmation
    }

    /// Total units ordered.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }
}

/// Which checkout view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Editable cart; the entry phase.
    Review,

    /// Contact/address form with a read-only summary.
    Checkout,

    /// Order placed.
    Success(Box<OrderSnapshot>),
}

impl CheckoutPhase {
    /// Short name for messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutPhase::Review => "review",
            CheckoutPhase::Checkout => "checkout",
            CheckoutPhase::Success(_) => "success",
        }
    }
}

/// A validated payload waiting for its submission outcome, with the cart
/// lines and figures it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    payload: OrderPayload,
    items: Vec<CartItem>,
    summary: OrderSummary,
}

impl PendingOrder {
    /// The payload to submit.
    pub fn payload(&self) -> &OrderPayload {
        &self.payload
    }

    /// Cart lines at submission time.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Order figures at submission time.
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    fn into_snapshot(self, confirmation: OrderConfirmation) -> OrderSnapshot {
        OrderSnapshot {
            items: self.items,
            summary: self.summary,
            confirmation,
        }
    }
}

/// The checkout phase controller.
#[derive(Debug)]
pub struct Checkout {
    phase: CheckoutPhase,
    is_submitting: bool,
    pricing: PricingPolicy,
}

impl Default for Checkout {
    fn default() -> Self {
        Self::new(PricingPolicy::default())
    }
}

impl Checkout {
    /// A controller in the review phase.
    pub fn new(pricing: PricingPolicy) -> Self {
        Self {
            phase: CheckoutPhase::Review,
            is_submitting: false,
            pricing,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// Whether an order submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Shipping and tax parameters.
    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// The placed order, once in the success phase.
    pub fn snapshot(&self) -> Option<&OrderSnapshot> {
        match &self.phase {
            CheckoutPhase::Success(snapshot) => Some(snapshot.as_ref()),
            CheckoutPhase::Review | CheckoutPhase::Checkout => None,
        }
    }

    /// Order figures: live from `cart` before success, frozen afterwards.
    pub fn summary(&self, cart: &Cart) -> OrderSummary {
        self.snapshot().map_or_else(
            || OrderSummary::for_cart(cart, &self.pricing),
            |snapshot| snapshot.summary,
        )
    }

    /// Move from review to the checkout form.
    ///
    /// # Errors
    ///
    /// - [`PhaseError::EmptyCart`] if `cart` has no items.
    /// - [`PhaseError::InvalidTransition`] outside the review phase.
    pub fn proceed_to_checkout(&mut self, cart: &Cart) -> Result<(), PhaseError> {
        self.require(&CheckoutPhase::Review, "checkout")?;

        if cart.is_empty() {
            return Err(PhaseError::EmptyCart);
        }

        self.phase = CheckoutPhase::Checkout;

        Ok(())
    }

    /// Go back from the checkout form to the editable cart.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidTransition`] outside the checkout phase or
    /// while a submission is in flight.
    pub fn back_to_review(&mut self) -> Result<(), PhaseError> {
        self.require(&CheckoutPhase::Checkout, "review")?;

        if self.is_submitting {
            return Err(self.invalid("review"));
        }

        self.phase = CheckoutPhase::Review;

        Ok(())
    }

    /// Validate an order for `cart` and mark a submission as in flight.
    ///
    /// Validation failures leave the flag down; nothing should be sent.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Phase`] outside the checkout phase.
    /// - [`CheckoutError::AlreadySubmitting`] while another submission is in flight.
    /// - [`CheckoutError::Validation`] if the built payload is invalid.
    pub fn begin_submission(
        &mut self,
        form: &CheckoutForm,
        cart: &Cart,
    ) -> Result<PendingOrder, CheckoutError> {
        self.require(&CheckoutPhase::Checkout, "success")?;

        if self.is_submitting {
            return Err(CheckoutError::AlreadySubmitting);
        }

        let payload = prepare_order(form, cart.items())?;

        self.is_submitting = true;

        Ok(PendingOrder {
            payload,
            items: cart.items().to_vec(),
            summary: OrderSummary::for_cart(cart, &self.pricing),
        })
    }

    /// Apply the outcome of a submission started with [`Checkout::begin_submission`].
    ///
    /// On success the snapshot is built from `pending`, the cart is cleared and
    /// the phase moves to success. On failure the phase stays at checkout and
    /// the cart is untouched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotSubmitting`] if no submission is in flight.
    /// - [`CheckoutError::Order`] carrying the submission failure.
    pub fn complete_submission(
        &mut self,
        pending: PendingOrder,
        outcome: Result<OrderConfirmation, OrderError>,
        store: &mut CartStore,
    ) -> Result<OrderSnapshot, CheckoutError> {
        if !self.is_submitting {
            return Err(CheckoutError::NotSubmitting);
        }

        self.is_submitting = false;

        let confirmation = outcome.inspect_err(|error| {
            warn!("order submission failed: {error}");
        })?;

        let snapshot = pending.into_snapshot(confirmation);

        store.clear_cart();

        info!(
            order = %snapshot.confirmation.document_id,
            lines = snapshot.items.len(),
            total = snapshot.summary.total(),
            "checkout complete"
        );

        self.phase = CheckoutPhase::Success(Box::new(snapshot.clone()));

        Ok(snapshot)
    }

    /// Validate, submit through `client` and apply the outcome.
    ///
    /// # Errors
    ///
    /// Any error of [`Checkout::begin_submission`] or
    /// [`Checkout::complete_submission`].
    pub async fn place_order(
        &mut self,
        form: &CheckoutForm,
        store: &mut CartStore,
        client: &dyn OrderClient,
    ) -> Result<OrderSnapshot, CheckoutError> {
        let pending = self.begin_submission(form, store.cart())?;

        let outcome = client.submit(pending.payload()).await;

        self.complete_submission(pending, outcome, store)
    }

    fn require(&self, expected: &CheckoutPhase, to: &'static str) -> Result<(), PhaseError> {
        if &self.phase == expected {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    fn invalid(&self, to: &'static str) -> PhaseError {
        PhaseError::InvalidTransition {
            from: self.phase.name(),
            to,
        }
    }
}
