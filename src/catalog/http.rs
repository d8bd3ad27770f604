//! HTTP catalog

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    blocks::Page,
    catalog::{Catalog, CatalogError, Product, fixtures::FixtureCatalog},
};

const POPULATE: [(&str, &str); 4] = [
    ("populate[0]", "featuredImage"),
    ("populate[1]", "images"),
    ("populate[2]", "colour"),
    ("populate[3]", "product_category"),
];

const PAGE_POPULATE: (&str, &str) = ("populate[blocks][populate]", "*");

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Products and pages from the CMS, answered from a fixture catalog whenever the CMS
/// cannot be used.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    http: Client,
    fallback: FixtureCatalog,
}

impl HttpCatalog {
    /// A catalog for the CMS at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, fallback: FixtureCatalog) -> Self {
        Self::with_client(base_url, Client::new(), fallback)
    }

    /// A catalog reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: Client, fallback: FixtureCatalog) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            fallback,
        }
    }

    /// CMS base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every product from the CMS, without falling back.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = format!("{}/api/products", self.base_url);

        self.get::<Vec<Product>>(&url, &POPULATE).await
    }

    /// Fetch a single product from the CMS, without falling back.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] on a 404, or another error if the
    /// request fails or the body is not a product.
    pub async fn fetch_product(&self, document_id: &str) -> Result<Product, CatalogError> {
        let url = format!("{}/api/products/{document_id}", self.base_url);

        match self.get::<Product>(&url, &POPULATE).await {
            Err(CatalogError::Transport(error)) if error.status() == Some(StatusCode::NOT_FOUND) => {
                Err(CatalogError::NotFound(document_id.to_string()))
            }
            other => other,
        }
    }

    /// Fetch the page published under `slug` from the CMS, without falling
    /// back. `Ok(None)` means the CMS has no such page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a page list.
    pub async fn fetch_page(&self, slug: &str) -> Result<Option<Page>, CatalogError> {
        let url = format!("{}/api/pages", self.base_url);
        let query = [("filters[slug][$eq]", slug), PAGE_POPULATE];

        let pages = self.get::<Vec<Page>>(&url, &query).await?;

        Ok(pages.into_iter().next())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        debug!(url, "fetching from catalog");

        let body = self
            .http
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        match self.fetch_products().await {
            Ok(products) => Ok(products),
            Err(error) => {
                warn!("failed to fetch products, using fixtures: {error}");

                self.fallback.products().await
            }
        }
    }

    async fn product(&self, document_id: &str) -> Result<Option<Product>, CatalogError> {
        match self.fetch_product(document_id).await {
            Ok(product) => Ok(Some(product)),
            Err(error) => {
                warn!(document_id, "failed to fetch product, using fixtures: {error}");

                self.fallback.product(document_id).await
            }
        }
    }

    async fn page(&self, slug: &str) -> Result<Option<Page>, CatalogError> {
        match self.fetch_page(slug).await {
            Ok(Some(page)) => Ok(Some(page)),
            Ok(None) => {
                warn!(slug, "page not found in CMS, using fixtures");

                self.fallback.page(slug).await
            }
            Err(error) => {
                warn!(slug, "failed to fetch page, using fixtures: {error}");

                self.fallback.page(slug).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn base_url_ignores_trailing_slash() {
        let catalog = HttpCatalog::new("http://localhost:1337/", FixtureCatalog::default());

        assert_eq!(catalog.base_url(), "http://localhost:1337");
    }

    #[tokio::test]
    async fn unreachable_cms_falls_back_to_fixtures() -> TestResult {
        // Nothing listens on the discard port.
        let catalog = HttpCatalog::new("http://127.0.0.1:9", FixtureCatalog::bundled()?);

        assert_eq!(catalog.products().await?.len(), 4);
        assert_eq!(
            catalog
                .product("prod-001")
                .await?
                .map(|product| product.title),
            Some("Teak Dining Table".to_string())
        );
        assert!(catalog.product("prod-999").await?.is_none());
        assert_eq!(
            catalog.page("home").await?.map(|page| page.document_id),
            Some("home-page".to_string())
        );

        Ok(())
    }

    #[test]
    fn page_envelope_skips_unknown_blocks() -> TestResult {
        let envelope: Envelope<Vec<Page>> = serde_json::from_str(
            r#"{"data":[{"documentId":"home-page","title":"Home","slug":"home","blocks":[
                {"__component":"blocks.contact-form","title":"Custom project?"},
                {"__component":"blocks.brands","brands":[{"name":"iSleep"}]}
            ]}]}"#,
        )?;

        let page = envelope.data.first().ok_or("no page")?;

        assert_eq!(page.blocks.len(), 1);
        assert_eq!(
            page.blocks.first().map(crate::blocks::ContentBlock::component),
            Some("blocks.brands")
        );

        Ok(())
    }

    #[test]
    fn envelope_unwraps_data() -> TestResult {
        let envelope: Envelope<Vec<Product>> = serde_json::from_str(
            r#"{"data":[{"documentId":"prod-001","title":"Teak Dining Table","price":2499}],
                "meta":{"pagination":{"page":1,"pageSize":25,"pageCount":1,"total":1}}}"#,
        )?;

        assert_eq!(envelope.data.len(), 1);

        Ok(())
    }
}
