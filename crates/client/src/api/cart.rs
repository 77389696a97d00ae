//! Cart client: asks the backend to prepare a cart-add for one product.
//!
//! The backend does not touch the retailer's cart. A successful response
//! only means the product page is ready to be opened; navigation itself is
//! the caller's business.

use reqwest::Method;
use tracing::{debug, instrument, warn};

use super::CartService;
use super::client::ApiClient;
use super::error::ApiError;
use super::types::{CartAddRequest, CartAddResponse};

/// REST client for `POST /api/cart/add`.
#[derive(Debug, Clone)]
pub struct CartClient {
    api: ApiClient,
}

impl CartClient {
    /// Create a cart client on a shared transport.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CartService for CartClient {
    #[instrument(skip(self))]
    async fn request_cart_add(&self, product_url: &str) -> Result<bool, ApiError> {
        let url = self.api.endpoint("api/cart/add")?;
        let body = CartAddRequest {
            product_url: product_url.to_string(),
        };
        let response: CartAddResponse = self.api.send(Method::POST, url, Some(&body)).await?;

        if response.success {
            debug!("Cart add prepared");
        } else {
            warn!(message = ?response.message, "Backend declined cart add");
        }

        Ok(response.success)
    }
}
