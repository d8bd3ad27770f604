//! Command dispatch

use std::io::Write;

use teakworld::{
    cart::{CartStore, FileStorage},
    catalog::{FixtureCatalog, HttpCatalog},
    orders::HttpOrderClient,
};

use crate::{
    config::{CliConfig, Command},
    errors::CliError,
};

mod cart;
mod checkout;
mod page;
mod products;

/// Run the configured command, writing its output to `out`.
pub(crate) async fn run(config: CliConfig, out: &mut impl Write) -> Result<(), CliError> {
    let policy = config.pricing.policy();
    let base_url = config.storefront.strapi_url;

    match config.command {
        Command::Products => {
            let catalog = HttpCatalog::new(&base_url, FixtureCatalog::bundled()?);

            products::run(&catalog, out).await
        }
        Command::Page { slug } => {
            let catalog = HttpCatalog::new(&base_url, FixtureCatalog::bundled()?);

            page::run(&catalog, &slug, out).await
        }
        Command::Cart(command) => {
            let catalog = HttpCatalog::new(&base_url, FixtureCatalog::bundled()?);
            let mut store = CartStore::open(FileStorage::new(&config.storefront.cart_dir));

            cart::run(command, &mut store, &catalog, &base_url, &policy, out).await
        }
        Command::Checkout(command) => {
            let client = HttpOrderClient::new(&base_url);
            let mut store = CartStore::open(FileStorage::new(&config.storefront.cart_dir));

            checkout::run(command, &mut store, &client, &policy, out).await
        }
    }
}
