//! `checkout`

use std::io::Write;

use teakworld::{
    cart::CartStore,
    checkout::{Checkout, OrderSummary, PricingPolicy},
    orders::{CheckoutForm, OrderClient},
};

use crate::{
    config::{CheckoutCommand, OrderArgs},
    errors::CliError,
    render,
};

impl From<OrderArgs> for CheckoutForm {
    fn from(args: OrderArgs) -> Self {
        Self {
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            address: args.address,
            apartment: args.apartment,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
        }
    }
}

pub(super) async fn run(
    command: CheckoutCommand,
    store: &mut CartStore,
    client: &dyn OrderClient,
    policy: &PricingPolicy,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        CheckoutCommand::Summary => {
            render::write_summary(out, &OrderSummary::for_cart(store.cart(), policy))?;
        }
        CheckoutCommand::PlaceOrder(args) => {
            let form = CheckoutForm::from(args);

            form.validate()?;

            let mut checkout = Checkout::new(policy.clone());

            checkout.proceed_to_checkout(store.cart())?;

            let snapshot = checkout.place_order(&form, store, client).await?;

            render::write_confirmation(out, &snapshot)?;
        }
    }

    Ok(())
}
