// Catalog endpoints
//
// Products, categories, and the health check. None of these require a
// bearer token.

use tracing::debug;

use crate::client::StorefrontClient;
use crate::error::Error;
use crate::models::{CategoriesResponse, HealthResponse, ProductQuery, ProductResponse};

impl StorefrontClient {
    /// `GET /api/health`
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let url = self.api_url("health")?;
        self.get(url, None).await
    }

    /// List products, optionally filtered server-side.
    ///
    /// `GET /api/products?category=&search=`
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<ProductResponse>, Error> {
        let mut url = self.api_url("products")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref category) = query.category {
                pairs.append_pair("category", category);
            }
            if let Some(ref search) = query.search {
                pairs.append_pair("search", search);
            }
        }
        // `query_pairs_mut` leaves a dangling `?` when nothing was appended.
        if url.query() == Some("") {
            url.set_query(None);
        }
        debug!(?query, "listing products");
        self.get(url, None).await
    }

    /// `GET /api/products/{id}`
    pub async fn get_product(&self, product_id: &str) -> Result<ProductResponse, Error> {
        let mut url = self.api_url("products")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(product_id);
        self.get(url, None).await
    }

    /// `GET /api/categories`
    pub async fn list_categories(&self) -> Result<Vec<String>, Error> {
        let url = self.api_url("categories")?;
        let resp: CategoriesResponse = self.get(url, None).await?;
        Ok(resp.categories)
    }
}
