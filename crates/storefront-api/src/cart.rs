// Cart endpoints
//
// All cart calls are bearer-authenticated. Mutations carry their arguments
// as query parameters and return no payload the client relies on; callers
// re-read the cart afterwards.

use reqwest::Method;
use secrecy::SecretString;
use tracing::debug;

use crate::client::StorefrontClient;
use crate::error::Error;
use crate::models::CartResponse;

impl StorefrontClient {
    /// `GET /api/cart`
    pub async fn get_cart(&self, token: &SecretString) -> Result<CartResponse, Error> {
        let url = self.api_url("cart")?;
        self.get(url, Some(token)).await
    }

    /// `POST /api/cart/add?product_id=&quantity=`
    pub async fn add_to_cart(
        &self,
        token: &SecretString,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), Error> {
        let mut url = self.api_url("cart/add")?;
        url.query_pairs_mut()
            .append_pair("product_id", product_id)
            .append_pair("quantity", &quantity.to_string());
        debug!(product_id, quantity, "adding to cart");
        self.send_empty(Method::POST, url, token).await
    }

    /// `PUT /api/cart/update?product_id=&quantity=`
    ///
    /// The quantity is passed through untouched; zero or negative values are
    /// the backend's to interpret (it removes the line).
    pub async fn update_cart_item(
        &self,
        token: &SecretString,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), Error> {
        let mut url = self.api_url("cart/update")?;
        url.query_pairs_mut()
            .append_pair("product_id", product_id)
            .append_pair("quantity", &quantity.to_string());
        debug!(product_id, quantity, "updating cart item");
        self.send_empty(Method::PUT, url, token).await
    }

    /// `DELETE /api/cart/remove/{product_id}`
    pub async fn remove_from_cart(&self, token: &SecretString, product_id: &str) -> Result<(), Error> {
        let mut url = self.api_url("cart/remove")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(product_id);
        debug!(product_id, "removing from cart");
        self.send_empty(Method::DELETE, url, token).await
    }
}
