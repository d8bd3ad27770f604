//! Teakworld prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    blocks::{ContentBlock, Page, parse_blocks},
    cart::{
        Cart, CartItem, CartKey, CartStorage, CartStore, FileStorage, MemoryStorage, NewCartItem,
        StorageError,
    },
    catalog::{Catalog, CatalogError, FixtureCatalog, FixtureError, HttpCatalog, Product},
    checkout::{
        Checkout, CheckoutError, CheckoutPhase, OrderSnapshot, OrderSummary, PhaseError,
        PricingPolicy,
    },
    money::{CURRENCY, format_minor},
    orders::{
        CheckoutForm, Delivery, HttpOrderClient, OrderClient, OrderConfirmation, OrderError,
        OrderPayload, ValidationError, prepare_order,
    },
};
