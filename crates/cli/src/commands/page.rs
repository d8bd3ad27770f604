//! `page`

use std::io::Write;

use teakworld::catalog::Catalog;

use crate::{errors::CliError, render};

pub(super) async fn run(
    catalog: &dyn Catalog,
    slug: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let page = catalog
        .page(slug)
        .await?
        .ok_or_else(|| CliError::UnknownPage(slug.to_string()))?;

    render::write_page(out, &page)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use teakworld::catalog::{FixtureCatalog, MockCatalog};

    use super::*;

    #[tokio::test]
    async fn renders_bundled_home_page() -> TestResult {
        let catalog = FixtureCatalog::bundled()?;
        let mut out = Vec::new();

        run(&catalog, "home", &mut out).await?;

        let output = String::from_utf8(out)?;

        assert!(output.starts_with("Home\n"), "{output}");
        assert!(output.contains("Handcrafted Teak Furniture"), "{output}");
        assert!(output.contains("Simple Life, Rug Culture"), "{output}");
        assert!(output.contains("Teak Outdoor Bench"), "{output}");
        assert!(output.contains("50+ Years of Excellence"), "{output}");
        assert!(output.contains("[Get in Touch]"), "{output}");

        Ok(())
    }

    #[tokio::test]
    async fn missing_page_is_an_error() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_page()
            .times(1)
            .returning(|_slug| Ok(None));

        let result = run(&catalog, "about-us", &mut Vec::new()).await;

        assert!(matches!(result, Err(CliError::UnknownPage(slug)) if slug == "about-us"));
    }
}
