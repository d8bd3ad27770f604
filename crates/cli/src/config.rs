//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use teakworld::{checkout::PricingPolicy, money};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Teakworld storefront CLI configuration
#[derive(Debug, Parser)]
#[command(name = "teakworld", about = "Teakworld storefront CLI", long_about = None)]
pub struct CliConfig {
    /// Backend settings.
    #[command(flatten)]
    pub storefront: StorefrontConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Shipping and tax settings.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Backend settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// CMS / order backend base URL
    #[arg(long, env = "STRAPI_URL", default_value = "http://localhost:1337")]
    pub strapi_url: String,

    /// Directory the cart is persisted in
    #[arg(long, env = "TEAKWORLD_CART_DIR", default_value = ".teakworld")]
    pub cart_dir: PathBuf,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Shipping and tax settings, in major units and percent points.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Subtotal at or above which shipping is free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD", default_value_t = 2_000.0)]
    pub free_shipping_threshold: f64,

    /// Flat shipping fee below the threshold
    #[arg(long, env = "SHIPPING_FEE", default_value_t = 50.0)]
    pub shipping_fee: f64,

    /// Tax rate in percent
    #[arg(long, env = "TAX_RATE", default_value_t = 8.0)]
    pub tax_rate: f64,
}

impl PricingConfig {
    /// The pricing policy these settings describe.
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: money::minor_from_major(self.free_shipping_threshold),
            shipping_fee: money::minor_from_major(self.shipping_fee),
            tax_rate: money::percentage_from_points(self.tax_rate),
        }
    }
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog products
    Products,

    /// Show a storefront page and its blocks
    Page {
        /// Page slug
        #[arg(default_value = teakworld::blocks::HOME_SLUG)]
        slug: String,
    },

    /// Inspect or change the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Review totals or place an order
    #[command(subcommand)]
    Checkout(CheckoutCommand),
}

/// Cart commands.
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show cart lines and totals
    Show,

    /// Add a product to the cart
    Add {
        /// Product document id, e.g. `prod-002`
        document_id: String,

        /// Colour to order; defaults to the product's first colour
        #[arg(long)]
        colour: Option<String>,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove a cart line
    Remove {
        /// Cart line id, e.g. `prod-002-Honey`
        cart_id: String,
    },

    /// Set the quantity of a cart line; zero or less removes it
    Update {
        /// Cart line id, e.g. `prod-002-Honey`
        cart_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,
}

/// Checkout commands.
#[derive(Debug, Subcommand)]
pub enum CheckoutCommand {
    /// Show subtotal, shipping, tax and total
    Summary,

    /// Submit the cart as an order
    PlaceOrder(OrderArgs),
}

/// Contact and shipping details for an order.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Contact email
    #[arg(long)]
    pub email: String,

    /// First name
    #[arg(long)]
    pub first_name: String,

    /// Last name
    #[arg(long)]
    pub last_name: String,

    /// Street address
    #[arg(long)]
    pub address: String,

    /// Apartment, suite, etc.
    #[arg(long)]
    pub apartment: Option<String>,

    /// City
    #[arg(long)]
    pub city: String,

    /// State or region
    #[arg(long)]
    pub state: String,

    /// ZIP/postal code
    #[arg(long)]
    pub zip_code: String,

    /// Country
    #[arg(long, default_value = "United States")]
    pub country: String,
}
