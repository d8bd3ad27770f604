//! Order summary

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::{
    cart::Cart,
    money::{percent_of_minor, progress_points},
};

/// Shipping and tax parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Subtotal, in minor units, at or above which shipping is free.
    pub free_shipping_threshold: i64,

    /// Flat shipping fee below the threshold, in minor units.
    pub shipping_fee: i64,

    /// Tax charged on the subtotal.
    pub tax_rate: Percentage,
}

impl Default for PricingPolicy {
    /// MUR 2,000.00 free-shipping threshold, MUR 50.00 flat fee, 8 % tax.
    fn default() -> Self {
        Self {
            free_shipping_threshold: 200_000,
            shipping_fee: 5_000,
            tax_rate: Percentage::from(Decimal::new(8, 2)),
        }
    }
}

/// Subtotal, shipping, tax and total for a cart, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    subtotal: i64,
    shipping: i64,
    tax: i64,
    total: i64,
    free_shipping_threshold: i64,
}

impl OrderSummary {
    /// Apply `policy` to a subtotal.
    pub fn from_subtotal(subtotal: i64, policy: &PricingPolicy) -> Self {
        let shipping = if subtotal >= policy.free_shipping_threshold {
            0
        } else {
            policy.shipping_fee
        };

        let tax = percent_of_minor(&policy.tax_rate, subtotal);

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
            free_shipping_threshold: policy.free_shipping_threshold,
        }
    }

    /// Summary of the cart as it is right now.
    pub fn for_cart(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self::from_subtotal(cart.subtotal(), policy)
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> i64 {
        self.subtotal
    }

    /// Shipping charge, zero once the threshold is reached.
    pub fn shipping(&self) -> i64 {
        self.shipping
    }

    /// Whether shipping is free.
    pub fn ships_free(&self) -> bool {
        self.shipping == 0
    }

    /// Tax on the subtotal.
    pub fn tax(&self) -> i64 {
        self.tax
    }

    /// Subtotal plus shipping plus tax.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// How much more must be spent for free shipping; zero once reached.
    pub fn amount_until_free_shipping(&self) -> i64 {
        self.free_shipping_threshold
            .saturating_sub(self.subtotal)
            .max(0)
    }

    /// Progress towards free shipping in percent points, capped at 100.
    pub fn free_shipping_progress(&self) -> u8 {
        progress_points(self.subtotal, self.free_shipping_threshold)
    }
}
