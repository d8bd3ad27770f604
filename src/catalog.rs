//! Catalog
//!
//! Products as the CMS delivers them and the conversions the storefront needs
//! from them: minor-unit prices, discounts, images and cart lines.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::{
    blocks::Page,
    cart::NewCartItem,
    money::{minor_from_major, percent_of_minor, percentage_from_points},
};

pub mod fixtures;
pub mod http;

pub use fixtures::{FixtureCatalog, FixtureError};
pub use http::HttpCatalog;

/// Shown for products without a featured image.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?w=600&q=80";

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never completed or returned a non-2xx status.
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not a product document.
    #[error("unexpected catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No product with this document id.
    #[error("product not found: {0}")]
    NotFound(String),
}

/// An uploaded media file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    /// Absolute URL, or a path relative to the CMS.
    pub url: String,

    /// Alt text.
    #[serde(default, rename = "alternativeText")]
    pub alternative_text: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    /// Display name, e.g. `Seating`.
    pub name: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,
}

/// Product description, either plain text or CMS rich-text blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Description {
    /// Plain text.
    Text(String),

    /// Rich-text blocks.
    Blocks(Vec<RichTextBlock>),
}

/// A rich-text paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichTextBlock {
    /// Text runs.
    #[serde(default)]
    pub children: Vec<RichTextRun>,
}

/// A run of text inside a rich-text paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichTextRun {
    /// The text.
    #[serde(default)]
    pub text: String,
}

impl Description {
    /// The leading text: the plain text, or the first run of the first block.
    pub fn summary(&self) -> Option<&str> {
        let text = match self {
            Description::Text(text) => Some(text.as_str()),
            Description::Blocks(blocks) => blocks
                .first()
                .and_then(|block| block.children.first())
                .map(|run| run.text.as_str()),
        };

        text.filter(|text| !text.is_empty())
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// CMS identifier.
    pub document_id: String,

    /// Display name.
    pub title: String,

    /// Description.
    #[serde(default)]
    pub description: Option<Description>,

    /// List price in major units.
    pub price: f64,

    /// Discount in percent points, `0` for none.
    #[serde(default, alias = "PercentageDiscount")]
    pub percentage_discount: f64,

    /// Main image.
    #[serde(default)]
    pub featured_image: Option<Image>,

    /// Gallery.
    #[serde(default)]
    pub images: Vec<Image>,

    /// Available colours, in display order.
    #[serde(default, rename = "colour", deserialize_with = "deserialize_colours")]
    pub colours: Vec<String>,

    /// Category.
    #[serde(default, rename = "product_category")]
    pub category: Option<Category>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Colours {
    Single(String),
    Named(Vec<NamedColour>),
}

#[derive(Deserialize)]
struct NamedColour {
    name: String,
}

fn deserialize_colours<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let colours = Option::<Colours>::deserialize(deserializer)?;

    Ok(match colours {
        None => Vec::new(),
        Some(Colours::Single(name)) => vec![name],
        Some(Colours::Named(named)) => named.into_iter().map(|colour| colour.name).collect(),
    })
}

impl Product {
    /// List price in minor units.
    pub fn price_minor(&self) -> i64 {
        minor_from_major(self.price)
    }

    /// Whether a discount applies.
    pub fn is_discounted(&self) -> bool {
        self.percentage_discount > 0.0
    }

    /// Price after the percentage discount, in minor units.
    pub fn discounted_price(&self) -> i64 {
        let price = self.price_minor();

        if !self.is_discounted() {
            return price;
        }

        let discount = percent_of_minor(&percentage_from_points(self.percentage_discount), price);

        price - discount
    }

    /// The variant a cart line gets: the selected colour, else the first
    /// colour, else the category name.
    pub fn default_variant<'a>(&'a self, selected_colour: Option<&'a str>) -> Option<&'a str> {
        selected_colour
            .filter(|colour| !colour.is_empty())
            .or_else(|| self.colours.first().map(String::as_str))
            .or_else(|| self.category.as_ref().map(|category| category.name.as_str()))
    }

    /// Images to show, falling back to the featured image.
    pub fn gallery(&self) -> Vec<&Image> {
        if self.images.is_empty() {
            self.featured_image.iter().collect()
        } else {
            self.images.iter().collect()
        }
    }

    /// Featured image URL resolved against `base_url`, or the placeholder.
    pub fn image_url(&self, base_url: &str) -> String {
        self.featured_image
            .as_ref()
            .map(|image| resolve_image_url(base_url, &image.url))
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }

    /// A cart line for one unit of this product at its discounted price.
    pub fn to_cart_item(&self, selected_colour: Option<&str>, base_url: &str) -> NewCartItem {
        let item = NewCartItem::new(&self.document_id, &self.title, self.discounted_price())
            .with_image(self.image_url(base_url));

        match self.default_variant(selected_colour) {
            Some(variant) => item.with_variant(variant),
            None => item,
        }
    }
}

/// Resolve a media URL: absolute URLs pass through, relative ones are prefixed
/// with `base_url`.
pub fn resolve_image_url(base_url: &str, url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if url.starts_with("http") {
        return url.to_string();
    }

    let base_url = base_url.trim_end_matches('/');

    if url.starts_with('/') {
        format!("{base_url}{url}")
    } else {
        format!("{base_url}/{url}")
    }
}

/// A source of products and pages.
#[automock]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Every product.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;

    /// The product with `document_id`, if any.
    async fn product(&self, document_id: &str) -> Result<Option<Product>, CatalogError>;

    /// The page published under `slug`, if any.
    async fn page(&self, slug: &str) -> Result<Option<Page>, CatalogError>;
}
