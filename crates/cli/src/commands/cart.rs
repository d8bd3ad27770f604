//! `cart`

use std::io::Write;

use tracing::info;

use teakworld::{
    cart::{CartKey, CartStore},
    catalog::Catalog,
    checkout::{OrderSummary, PricingPolicy},
};

use crate::{config::CartCommand, errors::CliError, render};

pub(super) async fn run(
    command: CartCommand,
    store: &mut CartStore,
    catalog: &dyn Catalog,
    base_url: &str,
    policy: &PricingPolicy,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        CartCommand::Show => {}
        CartCommand::Add {
            document_id,
            colour,
            quantity,
        } => {
            let product = catalog
                .product(&document_id)
                .await?
                .ok_or_else(|| CliError::UnknownProduct(document_id.clone()))?;

            let item = product
                .to_cart_item(colour.as_deref(), base_url)
                .with_quantity(quantity);

            info!(cart_id = %item.key(), quantity, "adding to cart");

            store.add_item(item);
        }
        CartCommand::Remove { cart_id } => {
            let key = existing_key(store, cart_id)?;

            store.remove_item(&key);
        }
        CartCommand::Update { cart_id, quantity } => {
            let key = existing_key(store, cart_id)?;

            store.update_quantity(&key, quantity);
        }
        CartCommand::Clear => store.clear_cart(),
    }

    let summary = OrderSummary::for_cart(store.cart(), policy);

    render::write_cart(out, store.items(), &summary)?;

    Ok(())
}

fn existing_key(store: &CartStore, cart_id: String) -> Result<CartKey, CliError> {
    let key = CartKey::from(cart_id);

    if store.cart().get(&key).is_some() {
        Ok(key)
    } else {
        Err(CliError::UnknownCartLine(key.to_string()))
    }
}
