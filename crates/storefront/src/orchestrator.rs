//! # Storefront Orchestrator
//!
//! Coordinates one catalog page:
//! 1. Fetch products, categories and seasons (concurrently)
//! 2. Normalize the raw records into a `Catalog` (on a blocking thread)
//! 3. Derive the visible listing for a filter state
//! 4. Summarize facets for the sidebar
//!
//! The catalog is loaded once and shared read-only; every listing is derived
//! from it without touching the base list.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use api_client::ApiClient;
use catalog::{Catalog, Product};
use pipeline::{FilterPipeline, FilterState};

use crate::facets::Facets;

/// A loaded catalog plus the listing pipeline
#[derive(Clone)]
pub struct Storefront {
    catalog: Arc<Catalog>,
    pipeline: Arc<FilterPipeline>,
}

impl Storefront {
    /// Fetch and normalize the catalog from the product API.
    ///
    /// All three lists are required; the first failing fetch aborts the load.
    pub async fn load(client: &ApiClient) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading catalog from {}", client.base_url());

        let (products, categories, seasons) = tokio::try_join!(
            client.fetch_products(),
            client.fetch_categories(),
            client.fetch_seasons(),
        )
        .context("Failed to fetch catalog")?;
        debug!(
            "Fetched {} products, {} categories, {} seasons",
            products.len(),
            categories.len(),
            seasons.len()
        );

        let catalog = tokio::task::spawn_blocking(move || {
            Catalog::from_raw(products, categories, seasons)
        })
        .await
        .context("Normalization task panicked")?;

        let (products, categories, seasons) = catalog.counts();
        info!(
            "Catalog ready in {:.2?}: {} products, {} categories, {} seasons",
            start_time.elapsed(),
            products,
            categories,
            seasons
        );
        Ok(Self::from_catalog(catalog))
    }

    /// Wrap an already loaded catalog.
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::with_pipeline(catalog, FilterPipeline::standard())
    }

    /// Wrap a catalog with a custom listing pipeline.
    pub fn with_pipeline(catalog: Catalog, pipeline: FilterPipeline) -> Self {
        Self {
            catalog: Arc::new(catalog),
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The listing for `state`.
    pub fn visible(&self, state: &FilterState) -> Result<Vec<Product>> {
        let visible = self
            .pipeline
            .run(self.catalog.products(), state)
            .context("Failed to apply filters")?;
        debug!(
            "{} of {} products visible",
            visible.len(),
            self.catalog.products().len()
        );
        Ok(visible)
    }

    /// Facet counts over the whole (unfiltered) catalog.
    pub fn facets(&self) -> Facets {
        Facets::from_products(self.catalog.products(), &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Decimal;
    use pipeline::{Filter, SortOrder};

    fn test_catalog() -> Catalog {
        Catalog::from_parts(
            vec![
                Product::new(1, "Basic Tee")
                    .with_price(Decimal::new(50, 0))
                    .with_category(1),
                Product::new(2, "Parka")
                    .with_price(Decimal::new(150, 0))
                    .with_category(2),
                Product::new(3, "Oxford Shirt")
                    .with_price(Decimal::new(100, 0))
                    .with_category(1),
            ],
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_visible_applies_standard_pipeline() {
        let storefront = Storefront::from_catalog(test_catalog());
        let state = FilterState::new()
            .with_categories(&[1])
            .with_price_range("60", "200")
            .with_sort(SortOrder::PriceAsc);

        let ids: Vec<i64> = storefront
            .visible(&state)
            .unwrap()
            .iter()
            .map(|p| p.id.get())
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_visible_leaves_catalog_untouched() {
        let storefront = Storefront::from_catalog(test_catalog());
        let before = storefront.catalog().products().to_vec();

        let state = FilterState::new().with_sort(SortOrder::PriceDesc);
        let first = storefront.visible(&state).unwrap();
        let second = storefront.visible(&state).unwrap();

        assert_eq!(first, second);
        assert_eq!(storefront.catalog().products(), before.as_slice());
    }

    #[test]
    fn test_custom_pipeline_error_is_reported() {
        struct Broken;

        impl Filter for Broken {
            fn name(&self) -> &str {
                "Broken"
            }

            fn apply(&self, _: Vec<Product>, _: &FilterState) -> Result<Vec<Product>> {
                anyhow::bail!("stage failed")
            }
        }

        let storefront =
            Storefront::with_pipeline(test_catalog(), FilterPipeline::new().add_filter(Broken));
        let err = storefront.visible(&FilterState::new()).unwrap_err();
        assert!(format!("{err:#}").contains("stage failed"));
    }

    #[test]
    fn test_facets_cover_whole_catalog() {
        let storefront = Storefront::from_catalog(test_catalog());
        let facets = storefront.facets();
        assert_eq!(facets.total, 3);
        assert_eq!(facets.categories.len(), 2);
        assert_eq!(
            facets.price_range,
            Some((Decimal::new(50, 0), Decimal::new(150, 0)))
        );
    }
}
