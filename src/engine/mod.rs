// src/engine/mod.rs
//! The catalog query engine.
//!
//! A request flows through five stages:
//!   1. Normalize raw parameters into `FilterCriteria`
//!   2. Plan: pick the endpoint that serves the criteria
//!   3. Execute the plan, degrading to a bounded recent listing when a
//!      specialized endpoint is unavailable
//!   4. Filter and sort locally
//!   5. Paginate
//!
//! Reference data (the category tree and the brand directory) lives in an
//! immutable snapshot. Reloading builds a new snapshot and swaps it in, so a
//! running query keeps the snapshot it started with.

mod filter;
mod normalize;
mod paginate;
mod planner;
mod tree;

pub use filter::{sort_products, FilterPipeline};
pub use normalize::{normalize, RawCriteria};
pub use paginate::paginate;
pub use planner::{plan, QueryPlan, ScopedDimension};
pub use tree::CategoryTree;

use crate::api::{
    CatalogHttpClient, CatalogSource, ListingQuery, ReliableCatalogSource,
};
use crate::config::EngineConfig;
use crate::constants::FALLBACK_LISTING_CAP;
use crate::error::AppError;
use crate::model::{Brand, Category, FilterCriteria, FilterResult, Product};
use crate::types::{BrandId, CategoryId};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

// --- Reference data ---

/// Category tree and brand directory as of the last reload.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub tree: CategoryTree,
    pub brands: IndexMap<BrandId, Brand>,
}

impl CatalogSnapshot {
    pub fn new(categories: Vec<Category>, brands: Vec<Brand>) -> Self {
        let mut directory = IndexMap::with_capacity(brands.len());
        for brand in brands {
            if directory.contains_key(&brand.id) {
                log::warn!("Ignoring duplicate brand id {}", brand.id);
                continue;
            }
            directory.insert(brand.id.clone(), brand);
        }

        Self {
            tree: CategoryTree::build(categories),
            brands: directory,
        }
    }

    pub fn brand_name(&self, id: &BrandId) -> Option<&str> {
        self.brands.get(id).map(|b| b.name.as_str())
    }

    pub fn category_name(&self, id: &CategoryId) -> Option<&str> {
        self.tree.name_of(id)
    }
}

// --- Execution ---

/// Products fetched for a plan, and whether they came from the fallback.
#[derive(Debug)]
pub enum Execution {
    /// The planned source answered.
    Fresh(Vec<Product>),
    /// The specialized source failed with `cause`; `products` is the bounded
    /// recent listing that replaced it.
    Degraded {
        products: Vec<Product>,
        cause: AppError,
    },
}

/// A served query: the page, the plan that produced it, and the failure that
/// forced a degraded answer, if any.
#[derive(Debug)]
pub struct QueryOutcome {
    pub result: FilterResult,
    pub plan: QueryPlan,
    pub degradation: Option<AppError>,
}

impl QueryOutcome {
    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }
}

// --- Engine ---

pub struct CatalogQueryEngine {
    source: Arc<dyn CatalogSource>,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
    fallback_cap: usize,
}

impl CatalogQueryEngine {
    /// An engine over `source` with an empty snapshot. The first query with a
    /// category filter loads reference data if nothing has been loaded yet.
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(CatalogSnapshot::default())),
            fallback_cap: FALLBACK_LISTING_CAP,
        }
    }

    pub fn with_fallback_cap(mut self, cap: usize) -> Self {
        self.fallback_cap = cap.max(1);
        self
    }

    /// Builds the HTTP source described by `config`, wrapped in the
    /// reliability layer.
    pub fn from_config(config: &EngineConfig) -> Result<Self, AppError> {
        let client = CatalogHttpClient::new(
            config.base_url.clone(),
            config.token.as_ref(),
            config.retry.attempt_timeout,
            config.connect_timeout,
        )?;
        let source = ReliableCatalogSource::new(client, config.rate_limit, config.retry.clone());
        Ok(Self::new(Arc::new(source)).with_fallback_cap(config.fallback_listing_cap))
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.snapshot.read())
    }

    /// Publishes `snapshot` for subsequent queries.
    pub fn install_snapshot(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write() = Arc::clone(&snapshot);
        snapshot
    }

    /// Fetches categories and brands concurrently and publishes a new
    /// snapshot. On failure the previous snapshot stays in place.
    pub async fn reload_reference_data(&self) -> Result<Arc<CatalogSnapshot>, AppError> {
        let (categories, brands) =
            futures::try_join!(self.source.list_categories(), self.source.list_brands())?;

        let snapshot = self.install_snapshot(CatalogSnapshot::new(categories, brands));
        log::info!(
            "Loaded reference data: {} categories ({} roots), {} brands",
            snapshot.tree.len(),
            snapshot.tree.roots().len(),
            snapshot.brands.len()
        );
        Ok(snapshot)
    }

    /// Normalizes `raw` and serves it.
    pub async fn query_raw(&self, raw: &RawCriteria) -> Result<QueryOutcome, AppError> {
        let criteria = normalize(raw)?;
        self.query(&criteria).await
    }

    /// Serves `criteria` against the current snapshot.
    ///
    /// A category filter needs the tree to tell main from sub categories, so
    /// an empty snapshot is loaded before planning such a query.
    pub async fn query(&self, criteria: &FilterCriteria) -> Result<QueryOutcome, AppError> {
        let mut snapshot = self.snapshot();
        if criteria.category_id.is_some() && snapshot.tree.is_empty() {
            log::info!("No categories loaded yet; loading reference data");
            snapshot = self.reload_reference_data().await?;
        }
        let plan = plan(criteria, &snapshot.tree);
        log::info!("Query plan: {}", plan);

        let execution = self.execute(&plan).await?;
        Ok(finish(&snapshot, criteria, plan, execution))
    }

    /// Reloads reference data and serves `criteria` against the new snapshot.
    ///
    /// Without a category filter the plan does not depend on the tree, so the
    /// reload and the product fetch run concurrently.
    pub async fn refresh_and_query(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<QueryOutcome, AppError> {
        if criteria.category_id.is_some() {
            self.reload_reference_data().await?;
            return self.query(criteria).await;
        }

        let plan = plan(criteria, &CategoryTree::default());
        log::info!("Query plan: {}", plan);
        let (snapshot, execution) =
            futures::try_join!(self.reload_reference_data(), self.execute(&plan))?;
        Ok(finish(&snapshot, criteria, plan, execution))
    }

    /// Runs the plan's fetch. A specialized fetch that fails transiently is
    /// replaced by the bounded recent listing; anything else propagates.
    pub async fn execute(&self, plan: &QueryPlan) -> Result<Execution, AppError> {
        let primary = match plan {
            QueryPlan::GenericListing | QueryPlan::GenericListingWithRollup(_) => {
                self.source.list_products(&ListingQuery::all()).await
            }
            QueryPlan::CategorySpecific(id) => self.source.products_in_category(id).await,
            QueryPlan::BrandSpecific(id) => self.source.products_of_brand(id).await,
        };

        match primary {
            Ok(products) => Ok(Execution::Fresh(products)),
            Err(cause) if plan.is_specialized() && cause.degrades_to_fallback() => {
                log::warn!(
                    "{} failed ({}); falling back to the {} most recent products",
                    plan,
                    cause,
                    self.fallback_cap
                );
                let mut products = self
                    .source
                    .list_products(&ListingQuery::most_recent(self.fallback_cap))
                    .await?;
                if products.len() > self.fallback_cap {
                    log::debug!(
                        "Recent listing returned {} products; keeping the newest {}",
                        products.len(),
                        self.fallback_cap
                    );
                    products.sort_by(Product::cmp_newest_first);
                    products.truncate(self.fallback_cap);
                }
                Ok(Execution::Degraded { products, cause })
            }
            Err(e) => Err(e),
        }
    }
}

/// Filters, sorts and paginates fetched products. Fresh results skip the
/// dimension their endpoint already applied; degraded results get every stage.
fn finish(
    snapshot: &CatalogSnapshot,
    criteria: &FilterCriteria,
    plan: QueryPlan,
    execution: Execution,
) -> QueryOutcome {
    let (products, scope, degradation) = match execution {
        Execution::Fresh(products) => (products, plan.server_scope(), None),
        Execution::Degraded { products, cause } => (products, None, Some(cause)),
    };

    let ordered = FilterPipeline::new(&snapshot.tree, criteria)
        .with_server_scope(scope)
        .run(products);
    let result = paginate(ordered, criteria.page, criteria.limit);

    log::debug!(
        "Page {}/{}: {} of {} products",
        result.page,
        result.total_pages,
        result.items.len(),
        result.total_count
    );

    QueryOutcome {
        result,
        plan,
        degradation,
    }
}
