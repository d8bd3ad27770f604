//! `products`

use std::io::Write;

use teakworld::catalog::Catalog;

use crate::{errors::CliError, render};

pub(super) async fn run(catalog: &dyn Catalog, out: &mut impl Write) -> Result<(), CliError> {
    let products = catalog.products().await?;

    render::write_products(out, &products)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use teakworld::catalog::{CatalogError, MockCatalog};

    use super::*;

    #[tokio::test]
    async fn lists_catalog_products() -> TestResult {
        let mut catalog = MockCatalog::new();
        catalog.expect_products().times(1).returning(|| Ok(Vec::new()));

        let mut out = Vec::new();

        run(&catalog, &mut out).await?;

        assert_eq!(String::from_utf8(out)?, "No products found.\n");

        Ok(())
    }

    #[tokio::test]
    async fn catalog_errors_surface() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_products()
            .returning(|| Err(CatalogError::NotFound("everything".to_string())));

        let result = run(&catalog, &mut Vec::new()).await;

        assert!(matches!(result, Err(CliError::Catalog(_))));
    }
}
