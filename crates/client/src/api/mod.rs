//! REST clients for the Healthy Food Finder backend.
//!
//! Three narrow clients sit on one shared [`ApiClient`] transport:
//! - [`FilterStoreClient`] for the user's ingredient filters
//! - [`SearchClient`] for product searches
//! - [`CartClient`] for cart-add preparation
//!
//! Each implements a trait ([`FilterStore`], [`ProductSearch`],
//! [`CartService`]) so the orchestrator can be driven by in-memory fakes in
//! tests. Every failure is normalized into an [`ApiError`] at this boundary.
//!
//! # Endpoints
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET | `/api/filters?user_id=` | - | `{ filters }` |
//! | POST | `/api/filters` | `{ filter, user_id }` | `{ filters }` |
//! | DELETE | `/api/filters` | `{ filter, user_id }` | `{ filters }` |
//! | POST | `/api/search` | `{ query, user_id, store }` | `{ products, total_found, filtered_count }` |
//! | POST | `/api/cart/add` | `{ product_url }` | `{ success }` |
//! | GET | `/api/health` | - | `{ status }` |

mod cart;
mod client;
mod error;
mod filters;
mod search;
pub mod types;

use std::future::Future;

use healthy_food_core::{FilterSet, UserId};

pub use cart::CartClient;
pub use client::ApiClient;
pub use error::{ApiError, GENERIC_FAILURE};
pub use filters::FilterStoreClient;
pub use search::SearchClient;
pub use types::{SearchRequest, SearchResults};

/// Remote store of a user's ingredient filters.
///
/// Every method returns the backend's authoritative list after the call.
pub trait FilterStore {
    /// Fetch the user's current filters.
    fn load_filters(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<FilterSet, ApiError>> + Send;

    /// Add a filter. The term is trimmed and must not be blank.
    fn add_filter(
        &self,
        user_id: &UserId,
        term: &str,
    ) -> impl Future<Output = Result<FilterSet, ApiError>> + Send;

    /// Remove a filter. The term is trimmed and must not be blank.
    fn remove_filter(
        &self,
        user_id: &UserId,
        term: &str,
    ) -> impl Future<Output = Result<FilterSet, ApiError>> + Send;
}

/// Product search against a selectable store.
pub trait ProductSearch {
    /// Run one search. Zero products is a success.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResults, ApiError>> + Send;
}

/// Server-side preparation of a cart-add for a single product.
pub trait CartService {
    /// Returns whether the backend is ready for the product page to be opened.
    fn request_cart_add(
        &self,
        product_url: &str,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;
}
