//! Search client: runs a product search against one store.

use reqwest::Method;
use tracing::{debug, instrument};

use super::ProductSearch;
use super::client::ApiClient;
use super::error::ApiError;
use super::types::{SearchRequest, SearchResponse, SearchResults};

/// REST client for `POST /api/search`.
///
/// Each call is a single attempt; nothing is retried.
#[derive(Debug, Clone)]
pub struct SearchClient {
    api: ApiClient,
}

impl SearchClient {
    /// Create a search client on a shared transport.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl ProductSearch for SearchClient {
    #[instrument(skip(self, request), fields(query = %request.query, store = %request.store))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchResults, ApiError> {
        let url = self.api.endpoint("api/search")?;
        let response: SearchResponse = self.api.send(Method::POST, url, Some(request)).await?;
        let results = SearchResults::from(response);

        debug!(
            products = results.products.len(),
            total_found = results.stats.total_found,
            filtered_count = results.stats.filtered_count,
            "Search completed"
        );

        Ok(results)
    }
}
