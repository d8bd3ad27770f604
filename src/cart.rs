//! Cart
//!
//! Line items keyed by `(product, variant)`, plus the derived reads every view
//! of the cart needs. [`CartStore`] wraps a [`Cart`] with persistence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money;

pub mod storage;
pub mod store;

pub use storage::{CartStorage, FileStorage, MemoryStorage, PersistedCart, StorageError};
pub use store::CartStore;

/// Variant label used in keys and order lines when an item has none.
pub const DEFAULT_VARIANT: &str = "default";

/// Identity of a cart line item, `"{product_id}-{variant}"`.
///
/// A missing or empty variant is spelled `default`, so adding the same product
/// twice without a variant merges into one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(String);

impl CartKey {
    /// Derive the key for a product and optional variant.
    pub fn new(product_id: &str, variant: Option<&str>) -> Self {
        let variant = variant
            .filter(|variant| !variant.is_empty())
            .unwrap_or(DEFAULT_VARIANT);

        Self(format!("{product_id}-{variant}"))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CartKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A product about to be added to the cart.
///
/// Title, price and image are snapshotted into the line item; later catalog
/// changes do not reach items already in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Catalog identifier of the product.
    pub product_id: String,

    /// Display name.
    pub title: String,

    /// Unit price in minor units.
    pub unit_price: i64,

    /// Image URL.
    pub image: String,

    /// Colour or category the customer picked.
    pub variant: Option<String>,

    /// Units to add. Zero is treated as one.
    pub quantity: u32,
}

impl NewCartItem {
    /// A single unit of a product with no variant and no image.
    pub fn new(product_id: impl Into<String>, title: impl Into<String>, unit_price: i64) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            unit_price,
            image: String::new(),
            variant: None,
            quantity: 1,
        }
    }

    /// Set the variant.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the number of units to add.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// The key this item will be stored under.
    pub fn key(&self) -> CartKey {
        CartKey::new(&self.product_id, self.variant.as_deref())
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "cartId")]
    key: CartKey,

    #[serde(rename = "documentId")]
    product_id: String,

    title: String,

    #[serde(rename = "price")]
    unit_price: i64,

    quantity: u32,

    image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
}

impl CartItem {
    fn from_new(item: NewCartItem, quantity: u32) -> Self {
        Self {
            key: item.key(),
            product_id: item.product_id,
            title: item.title,
            unit_price: item.unit_price,
            quantity,
            image: item.image,
            variant: item.variant.filter(|variant| !variant.is_empty()),
        }
    }

    /// Line item key.
    pub fn key(&self) -> &CartKey {
        &self.key
    }

    /// Catalog identifier of the product.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Display name captured when the item was added.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price in minor units captured when the item was added.
    pub fn unit_price(&self) -> i64 {
        self.unit_price
    }

    /// Units of this line, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Image URL captured when the item was added.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Variant, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Unit price times quantity, in minor units.
    pub fn line_total(&self) -> i64 {
        money::line_total(self.unit_price, self.quantity)
    }
}

/// Cart contents and sidebar visibility.
///
/// Items keep insertion order. Derived values are recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,

    #[serde(default, rename = "isOpen")]
    sidebar_open: bool,
}

impl Cart {
    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line item by key.
    pub fn get(&self, key: &CartKey) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.key == key)
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart sidebar is showing.
    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Sum of price times quantity over all lines, in minor units.
    pub fn subtotal(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |sum, item| sum.saturating_add(item.line_total()))
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Units of a product/variant in the cart, zero when absent.
    pub fn item_quantity(&self, product_id: &str, variant: Option<&str>) -> u32 {
        self.get(&CartKey::new(product_id, variant))
            .map_or(0, CartItem::quantity)
    }

    pub(crate) fn add(&mut self, item: NewCartItem) {
        let quantity = item.quantity.max(1);
        let key = item.key();

        if let Some(existing) = self.items.iter_mut().find(|line| line.key == key) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem::from_new(item, quantity));
        }

        self.sidebar_open = true;
    }

    pub(crate) fn remove(&mut self, key: &CartKey) {
        self.items.retain(|item| &item.key != key);
    }

    pub(crate) fn set_quantity(&mut self, key: &CartKey, quantity: i64) {
        if quantity <= 0 {
            self.remove(key);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(item) = self.items.iter_mut().find(|item| &item.key == key) {
            item.quantity = quantity;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    /// Drop lines that break the quantity invariant, e.g. from a hand-edited record.
    pub(crate) fn drop_empty_lines(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.quantity > 0);
        before - self.items.len()
    }
}
