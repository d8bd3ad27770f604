//! Content blocks
//!
//! CMS pages are a list of blocks tagged by `__component`. Blocks this crate
//! does not know, or cannot read, are skipped with a warning so one bad block
//! never takes the whole page down.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::catalog::{Description, Image, Product};

const TAG: &str = "__component";

/// Slug of the landing page.
pub const HOME_SLUG: &str = "home";

/// A CMS page and the blocks that make it up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// CMS document id.
    pub document_id: String,

    /// Page title.
    pub title: String,

    /// Short description.
    #[serde(default)]
    pub description: Option<String>,

    /// URL slug, e.g. `home`.
    pub slug: String,

    /// Blocks in display order. Unreadable blocks are already dropped.
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub blocks: Vec<ContentBlock>,
}

fn lenient_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;

    Ok(parse_blocks(values.unwrap_or_default()))
}

/// A call-to-action link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    /// Button label.
    #[serde(default = "default_cta_text")]
    pub text: String,

    /// Link target.
    #[serde(default = "default_cta_href")]
    pub href: String,

    /// Whether the link leaves the storefront.
    #[serde(default)]
    pub is_external: bool,
}

impl Default for CallToAction {
    fn default() -> Self {
        Self {
            text: default_cta_text(),
            href: default_cta_href(),
            is_external: false,
        }
    }
}

/// A brand shown in the brands strip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brand {
    /// Brand name.
    pub name: String,

    /// Logo.
    #[serde(default)]
    pub logo: Option<Image>,
}

/// A headline figure in the about block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stat {
    /// What is counted, e.g. `Years of Excellence`.
    pub label: String,

    /// The figure, e.g. `50+`.
    pub value: String,
}

/// A page block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__component")]
pub enum ContentBlock {
    /// Full-width hero with headline and call to action.
    #[serde(rename = "blocks.hero-banner", rename_all = "camelCase")]
    HeroBanner {
        /// Headline.
        text: String,

        /// Supporting line.
        #[serde(default)]
        subtitle: Option<String>,

        /// Background image.
        #[serde(default)]
        background_image: Option<Image>,

        /// Call to action.
        #[serde(default)]
        cta: CallToAction,
    },

    /// Strip of brand logos.
    #[serde(rename = "blocks.brands")]
    Brands {
        /// Heading.
        #[serde(default = "default_brands_title")]
        title: String,

        /// Brands in display order.
        #[serde(default)]
        brands: Vec<Brand>,
    },

    /// Grid of product cards.
    #[serde(rename = "blocks.products-grid")]
    ProductsGrid {
        /// Heading.
        #[serde(default = "default_products_title")]
        title: String,

        /// Kicker above the heading.
        #[serde(default = "default_products_subtitle")]
        subtitle: String,

        /// Products in display order.
        #[serde(default)]
        products: Vec<Product>,
    },

    /// Story section.
    #[serde(rename = "blocks.about")]
    About {
        /// Heading.
        title: String,

        /// Kicker above the heading.
        #[serde(default = "default_about_subtitle")]
        subtitle: String,

        /// Body copy.
        content: Description,

        /// Side image.
        #[serde(default)]
        image: Option<Image>,

        /// Headline figures.
        #[serde(default)]
        stats: Vec<Stat>,
    },

    /// Contact call to action.
    #[serde(rename = "blocks.contact", rename_all = "camelCase")]
    Contact {
        /// Heading.
        title: String,

        /// Supporting copy.
        #[serde(default)]
        subtitle: Option<String>,

        /// Button label.
        #[serde(default = "default_button_text")]
        button_text: String,
    },
}

const KNOWN: [&str; 5] = [
    "blocks.hero-banner",
    "blocks.brands",
    "blocks.products-grid",
    "blocks.about",
    "blocks.contact",
];

fn default_cta_text() -> String {
    "Shop Now".to_string()
}

fn default_cta_href() -> String {
    "#products".to_string()
}

fn default_brands_title() -> String {
    "As seen in".to_string()
}

fn default_products_title() -> String {
    "Featured Products".to_string()
}

fn default_products_subtitle() -> String {
    "New Arrivals".to_string()
}

fn default_about_subtitle() -> String {
    "Our Story".to_string()
}

fn default_button_text() -> String {
    "Get in Touch".to_string()
}

impl ContentBlock {
    /// Read one block. Unknown or malformed blocks are logged and give `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        let Some(component) = value.get(TAG).and_then(Value::as_str).map(str::to_string) else {
            warn!("skipping block without a {TAG} tag");
            return None;
        };

        if !KNOWN.contains(&component.as_str()) {
            warn!(%component, "unknown block type");
            return None;
        }

        match serde_json::from_value(value) {
            Ok(block) => Some(block),
            Err(error) => {
                warn!(%component, "skipping malformed block: {error}");
                None
            }
        }
    }

    /// The `__component` tag of this block.
    pub fn component(&self) -> &'static str {
        match self {
            ContentBlock::HeroBanner { .. } => "blocks.hero-banner",
            ContentBlock::Brands { .. } => "blocks.brands",
            ContentBlock::ProductsGrid { .. } => "blocks.products-grid",
            ContentBlock::About { .. } => "blocks.about",
            ContentBlock::Contact { .. } => "blocks.contact",
        }
    }
}

/// Read a page's blocks, keeping the ones that parse in their original order.
pub fn parse_blocks(values: impl IntoIterator<Item = Value>) -> Vec<ContentBlock> {
    values
        .into_iter()
        .filter_map(ContentBlock::from_value)
        .collect()
}
