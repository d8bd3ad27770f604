//! Order payload
//!
//! The wire shape of the create-order request and the mapping from checkout
//! form and cart lines onto it.

use serde::{Deserialize, Serialize};

use crate::{
    cart::{CartItem, DEFAULT_VARIANT},
    orders::{
        form::CheckoutForm,
        validation::{ValidationError, validate_payload},
    },
};

/// Phone number sent while the checkout form does not collect one.
pub const PLACEHOLDER_PHONE: &str = "0000000000";

/// National id sent while the checkout form does not collect one.
pub const PLACEHOLDER_NID: &str = "N/A";

/// Delivery options accepted by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delivery {
    /// Standard free delivery, the cheapest option.
    #[default]
    Free,

    /// Paid express delivery.
    Express,

    /// Collection from the showroom.
    PickUp,
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Catalog identifier of the product.
    #[serde(rename = "documentId")]
    pub product_id: String,

    /// Units ordered.
    pub quantity: u32,

    /// Colour/variant, `default` when the cart line had none.
    pub color: String,
}

/// Body of a create-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Customer first name.
    pub first_name: String,

    /// Customer last name.
    pub last_name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    pub phone: String,

    /// National identity number.
    pub nid: String,

    /// Street address.
    pub street: String,

    /// City.
    pub city: String,

    /// Country.
    pub country: String,

    /// State or region, omitted when blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Postal code.
    pub post_code: String,

    /// Delivery option.
    pub delivery: Delivery,

    /// Ordered products.
    pub items: Vec<OrderLine>,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id().to_string(),
            quantity: item.quantity(),
            color: item.variant().unwrap_or(DEFAULT_VARIANT).to_string(),
        }
    }
}

/// Map form fields and cart lines onto the backend payload.
///
/// Fields the form does not collect get placeholder values; the result still
/// has to go through [`validate_payload`].
pub fn build_payload(form: &CheckoutForm, items: &[CartItem]) -> OrderPayload {
    let state = Some(form.state.trim())
        .filter(|state| !state.is_empty())
        .map(str::to_string);

    OrderPayload {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        phone: PLACEHOLDER_PHONE.to_string(),
        nid: PLACEHOLDER_NID.to_string(),
        street: form.address.clone(),
        city: form.city.clone(),
        country: form.country.clone(),
        state,
        post_code: form.zip_code.clone(),
        delivery: Delivery::default(),
        items: items.iter().map(OrderLine::from).collect(),
    }
}

/// Build the payload, then validate it as a whole.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violated field.
pub fn prepare_order(
    form: &CheckoutForm,
    items: &[CartItem],
) -> Result<OrderPayload, ValidationError> {
    validate_payload(build_payload(form, items))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::cart::{Cart, NewCartItem};

    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: "12 Elm St".to_string(),
            apartment: None,
            city: "Beverly Hills".to_string(),
            state: "CA".to_string(),
            zip_code: "90210".to_string(),
            country: "United States".to_string(),
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::default();
        cart.add(NewCartItem::new("prod-003", "Teak Coffee Table", 74_900));
        cart.add(NewCartItem::new("prod-002", "Teak Lounge Chair", 76_415).with_variant("Honey"));
        cart
    }

    #[test]
    fn maps_renamed_fields() {
        let payload = build_payload(&form(), cart().items());

        assert_eq!(payload.street, "12 Elm St");
        assert_eq!(payload.post_code, "90210");
        assert_eq!(payload.state.as_deref(), Some("CA"));
    }

    #[test]
    fn variant_becomes_color_with_default() {
        let payload = build_payload(&form(), cart().items());

        let colors: Vec<&str> = payload.items.iter().map(|line| line.color.as_str()).collect();

        assert_eq!(colors, ["default", "Honey"]);
        assert_eq!(payload.items.first().map(|line| line.quantity), Some(1));
    }

    #[test]
    fn fills_placeholders_for_uncollected_fields() {
        let payload = build_payload(&form(), cart().items());

        assert_eq!(payload.phone, PLACEHOLDER_PHONE);
        assert_eq!(payload.nid, PLACEHOLDER_NID);
        assert_eq!(payload.delivery, Delivery::Free);
    }

    #[test]
    fn blank_state_is_omitted() -> TestResult {
        let mut form = form();
        form.state = "  ".to_string();

        let payload = build_payload(&form, cart().items());
        let value = serde_json::to_value(&payload)?;

        assert_eq!(payload.state, None);
        assert!(value.get("state").is_none());

        Ok(())
    }

    #[test]
    fn serialises_with_backend_field_names() -> TestResult {
        let payload = build_payload(&form(), cart().items());
        let value = serde_json::to_value(&payload)?;

        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["postCode"], "90210");
        assert_eq!(value["delivery"], "free");
        assert_eq!(value["items"][1]["documentId"], "prod-002");
        assert_eq!(value["items"][1]["color"], "Honey");

        Ok(())
    }

    #[test]
    fn pick_up_is_kebab_case() -> TestResult {
        assert_eq!(serde_json::to_value(Delivery::PickUp)?, "pick-up");

        Ok(())
    }

    #[test]
    fn prepare_order_validates_the_built_payload() {
        assert!(prepare_order(&form(), cart().items()).is_ok());

        let empty = Cart::default();
        let result = prepare_order(&form(), empty.items());

        assert!(result.is_err_and(|error| error.mentions("items")));
    }
}
