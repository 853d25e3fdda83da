//! One-shot load orchestration: five sequential, independently-skippable
//! stages, each re-checking its target before running and rebuilding
//! wholesale when it does. Fail-fast with no compensating rollback.

use crate::config::LoaderConfig;
use crate::derive::{product_derivations, store_derivations};
use crate::error::{LoadError, Result};
use crate::facets;
use crate::import::{import_file, ImportRequest};
use crate::models::{LoadReport, Stage, StageOutcome};
use crate::normalizer::TextNormalizer;
use crate::schema::{fields, product_schema, store_schema};
use crate::traits::SearchEngine;
use chrono::Utc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct DataLoader<E: SearchEngine> {
    engine: E,
    config: LoaderConfig,
    normalizer: TextNormalizer,
}

impl<E: SearchEngine> DataLoader<E> {
    pub fn new(engine: E, config: LoaderConfig, normalizer: TextNormalizer) -> Self {
        Self {
            engine,
            config,
            normalizer,
        }
    }

    /// Run the pipeline once: stores, products, breweries, category and
    /// style facets, food pairings. The facet catalog comes back on the
    /// report as an owned value for whoever serves read traffic next.
    pub async fn execute(&self, cancel: &CancellationToken) -> Result<LoadReport> {
        let started_at = Utc::now();
        let mut stages = Vec::new();

        self.checkpoint(cancel)?;
        let outcome = self.load_stores(cancel).await?;
        stages.push((Stage::Stores, outcome));

        self.checkpoint(cancel)?;
        let outcome = self.load_products(cancel).await?;
        stages.push((Stage::Products, outcome));

        self.checkpoint(cancel)?;
        let outcome = facets::load_breweries(
            &self.engine,
            &self.config.product.index,
            &self.config.product.brewery.index,
        )
        .await?;
        stages.push((Stage::Breweries, outcome));

        self.checkpoint(cancel)?;
        let catalog =
            facets::load_categories_and_styles(&self.engine, &self.config.product.index).await?;
        stages.push((
            Stage::CategoriesStyles,
            StageOutcome::Loaded {
                written: catalog.categories.len() as u64,
            },
        ));

        self.checkpoint(cancel)?;
        let pairings = facets::load_food_pairings(
            &self.engine,
            &self.normalizer,
            &self.config.product.index,
            &self.config.product.food_pairings.index,
            self.config.product.food_pairings.limit,
        )
        .await?;
        stages.push((Stage::FoodPairings, StageOutcome::Loaded { written: pairings }));

        let report = LoadReport {
            started_at,
            finished_at: Utc::now(),
            stages,
            facets: catalog,
        };
        info!(
            categories = report.facets.categories.len(),
            "load pipeline finished"
        );
        Ok(report)
    }

    fn checkpoint(&self, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        Ok(())
    }

    async fn load_stores(&self, cancel: &CancellationToken) -> Result<StageOutcome> {
        let request = ImportRequest {
            schema: store_schema(),
            source: self.config.store.url.clone(),
            derivations: store_derivations(),
            key_field: fields::STORE_ID,
            index: self.config.store.index.clone(),
            min_count: self.config.store.count,
            sleep: None,
        };
        import_file(&self.engine, &request, cancel).await
    }

    async fn load_products(&self, cancel: &CancellationToken) -> Result<StageOutcome> {
        let request = ImportRequest {
            schema: product_schema(),
            source: self.config.product.url.clone(),
            derivations: product_derivations(),
            key_field: fields::PRODUCT_ID,
            index: self.config.product.index.clone(),
            min_count: self.config.product.load.count,
            sleep: self.config.product.load.sleep.map(Duration::from_millis),
        };
        import_file(&self.engine, &request, cancel).await
    }
}
