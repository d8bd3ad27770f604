//! CLI errors

use std::io;

use thiserror::Error;

use teakworld::{
    catalog::{CatalogError, FixtureError},
    checkout::{CheckoutError, PhaseError},
    orders::ValidationError,
};

/// Errors a command can end with.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// The bundled fixtures are broken.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The catalog could not answer.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The checkout form is incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The checkout flow refused the step.
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Placing the order failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// No product with this document id.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// No page with this slug, not even a fallback.
    #[error("unknown page: {0}")]
    UnknownPage(String),

    /// No cart line with this id.
    #[error("no cart line with id {0}")]
    UnknownCartLine(String),
}
