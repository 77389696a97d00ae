//! Wire schemas for the backend REST endpoints.
//!
//! Each endpoint gets an explicit request and response type. Optional fields
//! are `Option<T>`; anything that does not fit is rejected at the client
//! boundary as a malformed response.

use healthy_food_core::{FilterSet, Product, SearchStats, Store, UserId};
use serde::{Deserialize, Serialize};

/// `POST /api/search` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Trimmed, non-blank search text.
    pub query: String,
    pub user_id: UserId,
    pub store: Store,
}

/// `POST /api/search` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_found: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_count: Option<u32>,
    /// Store the backend searched; echoed back, not used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A normalized, successful search outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub stats: SearchStats,
}

impl From<SearchResponse> for SearchResults {
    fn from(response: SearchResponse) -> Self {
        // No product list means no results, whatever the counts say.
        let Some(products) = response.products else {
            return Self::default();
        };
        Self {
            products,
            stats: SearchStats::new(
                response.total_found.unwrap_or(0),
                response.filtered_count.unwrap_or(0),
            ),
        }
    }
}

/// `POST /api/filters` and `DELETE /api/filters` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMutationRequest {
    pub filter: String,
    pub user_id: UserId,
}

/// Response body of every `/api/filters` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub filters: Vec<String>,
}

impl From<FiltersResponse> for FilterSet {
    fn from(response: FiltersResponse) -> Self {
        Self::from_server(response.filters)
    }
}

/// `POST /api/cart/add` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAddRequest {
    pub product_url: String,
}

/// `POST /api/cart/add` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAddResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
}

/// `GET /api/health` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body the backend sends alongside failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_wire_format() {
        let request = SearchRequest {
            query: "milk".to_string(),
            user_id: UserId::default(),
            store: Store::Heb,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"query": "milk", "user_id": "default", "store": "heb"})
        );
    }

    #[test]
    fn test_search_results_from_full_response() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"products":[{"name":"Oats"}],"total_found":12,"filtered_count":7,"store":"kroger"}"#,
        )
        .unwrap();
        let results = SearchResults::from(response);
        assert_eq!(results.products.len(), 1);
        assert_eq!(results.stats, SearchStats::new(12, 7));
        assert_eq!(
            results.stats.summary().as_deref(),
            Some("Found 7 healthy products out of 12 total")
        );
    }

    #[test]
    fn test_search_results_without_products_are_empty() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"total_found":3,"filtered_count":1}"#).unwrap();
        assert_eq!(SearchResults::from(response), SearchResults::default());
    }

    #[test]
    fn test_search_results_missing_counts_default_to_zero() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"products":[{"name":"Oats"}]}"#).unwrap();
        let results = SearchResults::from(response);
        assert_eq!(results.stats, SearchStats::ZERO);
        assert!(!results.stats.is_visible());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        assert!(serde_json::from_str::<SearchResponse>(r#"{"total_found":-1}"#).is_err());
    }

    #[test]
    fn test_filter_mutation_wire_format() {
        let request = FilterMutationRequest {
            filter: "sugar".to_string(),
            user_id: UserId::default(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"filter": "sugar", "user_id": "default"})
        );
    }

    #[test]
    fn test_cart_response_optional_fields() {
        let response: CartAddResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.message, None);
    }
}
