//! Filter store client: loads and mutates a user's persisted filter list.

use healthy_food_core::{Filter, FilterSet, UserId};
use reqwest::Method;
use tracing::{debug, instrument};

use super::FilterStore;
use super::client::ApiClient;
use super::error::ApiError;
use super::types::{FilterMutationRequest, FiltersResponse};

const FILTERS_PATH: &str = "api/filters";

/// REST client for `/api/filters`.
#[derive(Debug, Clone)]
pub struct FilterStoreClient {
    api: ApiClient,
}

impl FilterStoreClient {
    /// Create a filter store client on a shared transport.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn mutate(
        &self,
        method: Method,
        user_id: &UserId,
        term: &str,
    ) -> Result<FilterSet, ApiError> {
        let filter = Filter::parse(term)?;
        let body = FilterMutationRequest {
            filter: filter.into_inner(),
            user_id: user_id.clone(),
        };
        let url = self.api.endpoint(FILTERS_PATH)?;
        let response: FiltersResponse = self.api.send(method, url, Some(&body)).await?;
        Ok(response.into())
    }
}

impl FilterStore for FilterStoreClient {
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    async fn load_filters(&self, user_id: &UserId) -> Result<FilterSet, ApiError> {
        let mut url = self.api.endpoint(FILTERS_PATH)?;
        url.query_pairs_mut().append_pair("user_id", user_id.as_str());

        let response: FiltersResponse = self.api.send(Method::GET, url, None::<&()>).await?;
        let filters = FilterSet::from(response);
        debug!(count = filters.len(), "Filters loaded");
        Ok(filters)
    }

    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    async fn add_filter(&self, user_id: &UserId, term: &str) -> Result<FilterSet, ApiError> {
        let filters = self.mutate(Method::POST, user_id, term).await?;
        debug!(count = filters.len(), "Filter added");
        Ok(filters)
    }

    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    async fn remove_filter(&self, user_id: &UserId, term: &str) -> Result<FilterSet, ApiError> {
        let filters = self.mutate(Method::DELETE, user_id, term).await?;
        debug!(count = filters.len(), "Filter removed");
        Ok(filters)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use healthy_food_core::FilterError;
    use url::Url;

    use super::*;

    fn unreachable_client() -> FilterStoreClient {
        // Port 9 (discard) is never contacted: blank terms fail before sending.
        let api = ApiClient::with_http(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9").unwrap(),
        );
        api.filters()
    }

    #[tokio::test]
    async fn test_blank_term_rejected_before_request() {
        let client = unreachable_client();
        let result = client.add_filter(&UserId::default(), "   ").await;
        assert_eq!(result, Err(ApiError::InvalidInput(FilterError::Blank)));

        let result = client.remove_filter(&UserId::default(), "").await;
        assert_eq!(result, Err(ApiError::InvalidInput(FilterError::Blank)));
    }
}
