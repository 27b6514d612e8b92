// ── Catalog Cache ──
//
// Products and categories fetched once per start and held as immutable
// snapshots. Filtering is local; the backend's query parameters are not
// used here.

mod filter;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use storefront_api::{ProductQuery, StorefrontClient};

use crate::error::CoreError;
use crate::model::{Product, ProductId};

pub use filter::{ALL_CATEGORIES, CatalogFilter, CategoryFilter, FilteredProducts};

pub struct CatalogCache {
    client: StorefrontClient,
    products: watch::Sender<Arc<Vec<Arc<Product>>>>,
    categories: watch::Sender<Arc<Vec<String>>>,
}

impl CatalogCache {
    pub fn new(client: StorefrontClient) -> Self {
        let (products, _) = watch::channel(Arc::new(Vec::new()));
        let (categories, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            client,
            products,
            categories,
        }
    }

    /// Fetch the full product list and replace the snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load_products(&self) -> Result<usize, CoreError> {
        let fetched = match self.client.list_products(&ProductQuery::default()).await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "failed to load products");
                return Err(e.into());
            }
        };

        let snapshot: Vec<Arc<Product>> = fetched
            .into_iter()
            .map(|p| Arc::new(Product::from(p)))
            .collect();
        let count = snapshot.len();
        self.products.send_replace(Arc::new(snapshot));
        debug!(count, "product catalog loaded");
        Ok(count)
    }

    /// Fetch the category list. Independent of the product load.
    pub async fn load_categories(&self) -> Result<usize, CoreError> {
        let fetched = match self.client.list_categories().await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "failed to load categories");
                return Err(e.into());
            }
        };

        let count = fetched.len();
        self.categories.send_replace(Arc::new(fetched));
        debug!(count, "categories loaded");
        Ok(count)
    }

    /// A lazy view of the current product snapshot under `filter`.
    pub fn filter(&self, filter: CatalogFilter) -> FilteredProducts {
        FilteredProducts::new(self.products_snapshot(), filter)
    }

    pub fn product(&self, id: &ProductId) -> Option<Arc<Product>> {
        self.products
            .borrow()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn products_snapshot(&self) -> Arc<Vec<Arc<Product>>> {
        self.products.borrow().clone()
    }

    pub fn categories_snapshot(&self) -> Arc<Vec<String>> {
        self.categories.borrow().clone()
    }

    pub fn subscribe_products(&self) -> watch::Receiver<Arc<Vec<Arc<Product>>>> {
        self.products.subscribe()
    }

    pub fn subscribe_categories(&self) -> watch::Receiver<Arc<Vec<String>>> {
        self.categories.subscribe()
    }
}
