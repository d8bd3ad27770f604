//! Fixture catalog

use std::{fs, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    blocks::{HOME_SLUG, Page},
    catalog::{Catalog, CatalogError, Product},
};

const BUNDLED: &str = include_str!("../../fixtures/products.yml");
const BUNDLED_PAGES: &str = include_str!("../../fixtures/pages.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share a document id
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),

    /// Two pages share a slug
    #[error("Duplicate page: {0}")]
    DuplicatePage(String),
}

#[derive(Debug, Deserialize)]
struct ProductsFixture {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct PagesFixture {
    pages: Vec<Page>,
}

/// A fixed set of products and pages loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureCatalog {
    products: Vec<Product>,
    pages: Vec<Page>,
}

impl FixtureCatalog {
    /// The bundled products and pages, used when the CMS is unreachable.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled fixture does not parse.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_yaml(BUNDLED)?.with_pages_yaml(BUNDLED_PAGES)
    }

    /// Parse a `products:` YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a document id repeats.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(contents)?;

        for (index, product) in fixture.products.iter().enumerate() {
            let repeated = fixture
                .products
                .iter()
                .skip(index + 1)
                .any(|other| other.document_id == product.document_id);

            if repeated {
                return Err(FixtureError::DuplicateProduct(product.document_id.clone()));
            }
        }

        Ok(Self {
            products: fixture.products,
            pages: Vec::new(),
        })
    }

    /// Add the pages of a `pages:` YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a slug repeats.
    pub fn with_pages_yaml(mut self, contents: &str) -> Result<Self, FixtureError> {
        let fixture: PagesFixture = serde_norway::from_str(contents)?;

        for page in fixture.pages {
            if self.pages.iter().any(|other| other.slug == page.slug) {
                return Err(FixtureError::DuplicatePage(page.slug));
            }

            self.pages.push(page);
        }

        Ok(self)
    }

    /// Load a `products:` YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Products in fixture order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by document id.
    pub fn find(&self, document_id: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|product| product.document_id == document_id)
    }

    /// Look up a page by slug. `shop` is an alias of `shop-page`, and any
    /// other unknown slug gets the home page.
    pub fn find_page(&self, slug: &str) -> Option<&Page> {
        let slug = match slug {
            "" => HOME_SLUG,
            "shop" => "shop-page",
            other => other,
        };

        self.pages
            .iter()
            .find(|page| page.slug == slug)
            .or_else(|| self.pages.iter().find(|page| page.slug == HOME_SLUG))
    }
}

#[async_trait]
impl Catalog for FixtureCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }

    async fn product(&self, document_id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.find(document_id).cloned())
    }

    async fn page(&self, slug: &str) -> Result<Option<Page>, CatalogError> {
        Ok(self.find_page(slug).cloned())
    }
}
