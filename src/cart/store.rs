//! Cart store

use std::fmt;

use tracing::{debug, warn};

use crate::cart::{
    Cart, CartItem, CartKey, NewCartItem,
    storage::{CartStorage, PersistedCart, SCHEMA_VERSION},
};

/// The single source of truth for cart contents.
///
/// Every mutation goes through one commit point that writes the new state to
/// the storage backend. Mutations never fail: bad quantities degrade to
/// removals, unknown keys are no-ops and storage failures are logged.
pub struct CartStore {
    cart: Cart,
    storage: Box<dyn CartStorage>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// An empty store over `storage`, ignoring anything already stored.
    pub fn new(storage: impl CartStorage + 'static) -> Self {
        Self {
            cart: Cart::default(),
            storage: Box::new(storage),
        }
    }

    /// A store restored from `storage`.
    ///
    /// A missing, unreadable or outdated record starts an empty cart.
    pub fn open(storage: impl CartStorage + 'static) -> Self {
        let cart = restore(&storage);

        Self {
            cart,
            storage: Box::new(storage),
        }
    }

    /// Current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Whether the sidebar is showing.
    pub fn is_sidebar_open(&self) -> bool {
        self.cart.is_sidebar_open()
    }

    /// Sum of price times quantity, in minor units.
    pub fn subtotal(&self) -> i64 {
        self.cart.subtotal()
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Units of a product/variant in the cart, zero when absent.
    pub fn item_quantity(&self, product_id: &str, variant: Option<&str>) -> u32 {
        self.cart.item_quantity(product_id, variant)
    }

    /// Add an item, merging with an existing line of the same key, and open the
    /// sidebar.
    pub fn add_item(&mut self, item: NewCartItem) {
        debug!(key = %item.key(), quantity = item.quantity, "adding item to cart");

        self.commit(|cart| cart.add(item));
    }

    /// Remove a line. Unknown keys are ignored.
    pub fn remove_item(&mut self, key: &CartKey) {
        debug!(%key, "removing item from cart");

        self.commit(|cart| cart.remove(key));
    }

    /// Replace a line's quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, key: &CartKey, quantity: i64) {
        debug!(%key, quantity, "updating cart quantity");

        self.commit(|cart| cart.set_quantity(key, quantity));
    }

    /// Add one unit to an existing line.
    pub fn increment(&mut self, key: &CartKey) {
        if let Some(quantity) = self.cart.get(key).map(CartItem::quantity) {
            self.update_quantity(key, i64::from(quantity) + 1);
        }
    }

    /// Take one unit off an existing line, removing it at zero.
    pub fn decrement(&mut self, key: &CartKey) {
        if let Some(quantity) = self.cart.get(key).map(CartItem::quantity) {
            self.update_quantity(key, i64::from(quantity) - 1);
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        debug!("clearing cart");

        self.commit(Cart::clear);
    }

    /// Flip sidebar visibility.
    pub fn toggle_sidebar(&mut self) {
        let open = !self.cart.is_sidebar_open();

        self.commit(|cart| cart.set_sidebar_open(open));
    }

    /// Show the sidebar.
    pub fn open_sidebar(&mut self) {
        self.commit(|cart| cart.set_sidebar_open(true));
    }

    /// Hide the sidebar.
    pub fn close_sidebar(&mut self) {
        self.commit(|cart| cart.set_sidebar_open(false));
    }

    fn commit(&mut self, mutation: impl FnOnce(&mut Cart)) {
        mutation(&mut self.cart);

        let written = PersistedCart::new(self.cart.clone())
            .encode()
            .and_then(|record| self.storage.save(&record));

        if let Err(error) = written {
            warn!("failed to persist cart: {error}");
        }
    }
}

fn restore(storage: &impl CartStorage) -> Cart {
    let record = match storage.load() {
        Ok(Some(record)) => record,
        Ok(None) => return Cart::default(),
        Err(error) => {
            warn!("failed to read stored cart, starting empty: {error}");
            return Cart::default();
        }
    };

    let persisted = match PersistedCart::decode(&record) {
        Ok(persisted) => persisted,
        Err(error) => {
            warn!("stored cart is unreadable, starting empty: {error}");
            return Cart::default();
        }
    };

    if persisted.version != SCHEMA_VERSION {
        warn!(
            found = persisted.version,
            expected = SCHEMA_VERSION,
            "stored cart has an unknown schema version, starting empty"
        );
        return Cart::default();
    }

    let mut cart = persisted.state;
    let dropped = cart.drop_empty_lines();

    if dropped > 0 {
        warn!(dropped, "dropped stored cart lines with zero quantity");
    }

    cart
}
