//! Integration tests for Healthy Food Finder.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p healthy-food-integration-tests
//! ```
//!
//! The tests drive the real REST clients and orchestrator against
//! [`MockBackend`], an in-process axum server that speaks the backend's
//! wire format. No external services are needed.
//!
//! # Test Categories
//!
//! - `filters` - Loading, adding and removing filters
//! - `search` - Search results, statistics and error normalization
//! - `cart` - Cart hand-off and navigation
//! - `session_flow` - Whole-session flows mixing all three plus health

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use healthy_food_client::api::types::{
    CartAddRequest, CartAddResponse, ErrorResponse, FilterMutationRequest, FiltersResponse,
    HealthResponse, SearchRequest, SearchResponse,
};
use healthy_food_client::{ApiClient, ApiOrchestrator, ClientConfig, Session};
use healthy_food_core::{Product, Store, UserId};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Filters every new user starts with.
pub const DEFAULT_FILTERS: &[&str] = &[
    "seed oil",
    "vegetable oil",
    "canola oil",
    "soybean oil",
    "corn oil",
    "sunflower oil",
    "safflower oil",
    "rapeseed oil",
    "palm oil",
    "high fructose corn syrup",
    "hfcs",
    "artificial sweetener",
    "artificial flavor",
    "artificial color",
    "red 40",
    "yellow 5",
    "blue 1",
    "sodium nitrite",
    "sodium nitrate",
    "bht",
    "bha",
    "tbhq",
    "monosodium glutamate",
    "msg",
    "carrageenan",
    "polysorbate",
];

/// A scripted backend failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Respond with this status and an optional `error` field.
    Status(u16, Option<String>),
    /// Respond 200 with an `error` field.
    ErrorField(String),
    /// Respond 200 with a body that is not JSON.
    Malformed,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Self::Status(code, error) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(ErrorResponse { error })).into_response()
            }
            Self::ErrorField(message) => Json(ErrorResponse {
                error: Some(message),
            })
            .into_response(),
            Self::Malformed => (StatusCode::OK, "<html>Service Unavailable</html>").into_response(),
        }
    }
}

#[derive(Default)]
struct Counters {
    filters: AtomicUsize,
    search: AtomicUsize,
    cart: AtomicUsize,
}

struct BackendState {
    filters: Mutex<HashMap<String, Vec<String>>>,
    catalog: Mutex<Vec<Product>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    search_failure: Mutex<Option<Failure>>,
    filters_failure: Mutex<Option<Failure>>,
    cart_failure: Mutex<Option<Failure>>,
    cart_success: AtomicBool,
    searches: Mutex<Vec<SearchRequest>>,
    counters: Counters,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BackendState {
    fn new() -> Self {
        Self {
            filters: Mutex::new(HashMap::new()),
            catalog: Mutex::new(sample_catalog()),
            search_delays: Mutex::new(HashMap::new()),
            search_failure: Mutex::new(None),
            filters_failure: Mutex::new(None),
            cart_failure: Mutex::new(None),
            cart_success: AtomicBool::new(true),
            searches: Mutex::new(Vec::new()),
            counters: Counters::default(),
        }
    }

    /// Run `f` on the user's filter list, creating it from the defaults.
    fn with_filters<R>(&self, user_id: &str, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        let mut filters = locked(&self.filters);
        let list = filters
            .entry(user_id.to_string())
            .or_insert_with(|| DEFAULT_FILTERS.iter().map(ToString::to_string).collect());
        f(list)
    }
}

/// A handful of products with and without filtered ingredients.
#[must_use]
pub fn sample_catalog() -> Vec<Product> {
    vec![
        Product::named("Simple Truth Organic Rolled Oats")
            .with_price("$3.49")
            .with_ingredients("Organic whole grain rolled oats")
            .with_url("https://www.kroger.com/p/simple-truth-organic-rolled-oats/0001111087740"),
        Product::named("Honey Nut Oat Crunch")
            .with_price("$4.29")
            .with_ingredients("Whole grain oats, sugar, canola oil, honey, BHT for freshness")
            .with_url("https://www.kroger.com/p/honey-nut-crunch/0001600027527"),
        Product::named("Steel Cut Oats")
            .with_price("N/A")
            .with_ingredients("Whole grain oats"),
        Product::named("Oat Milk")
            .with_price("$4.99")
            .with_url("https://www.kroger.com/p/oat-milk/0085000009999"),
    ]
}

#[derive(Deserialize)]
struct UserQuery {
    user_id: Option<String>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn load_filters(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<UserQuery>,
) -> Response {
    state.counters.filters.fetch_add(1, Ordering::SeqCst);
    if let Some(failure) = locked(&state.filters_failure).clone() {
        return failure.into_response();
    }

    let user_id = query.user_id.unwrap_or_else(|| UserId::default().to_string());
    let filters = state.with_filters(&user_id, |list| list.clone());
    Json(FiltersResponse { filters }).into_response()
}

async fn add_filter(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<FilterMutationRequest>,
) -> Response {
    mutate_filters(&state, &request, |list, term| {
        let lowered = term.to_lowercase();
        if !list.iter().any(|f| f.to_lowercase() == lowered) {
            list.push(term.to_string());
        }
    })
}

async fn remove_filter(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<FilterMutationRequest>,
) -> Response {
    mutate_filters(&state, &request, |list, term| {
        let lowered = term.to_lowercase();
        list.retain(|f| f.to_lowercase() != lowered);
    })
}

fn mutate_filters(
    state: &BackendState,
    request: &FilterMutationRequest,
    apply: impl FnOnce(&mut Vec<String>, &str),
) -> Response {
    state.counters.filters.fetch_add(1, Ordering::SeqCst);
    if let Some(failure) = locked(&state.filters_failure).clone() {
        return failure.into_response();
    }

    let term = request.filter.trim();
    if term.is_empty() {
        return Failure::Status(400, Some("Filter term required".to_string())).into_response();
    }

    let filters = state.with_filters(request.user_id.as_str(), |list| {
        apply(list, term);
        list.clone()
    });
    Json(FiltersResponse { filters }).into_response()
}

async fn search(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<SearchRequest>,
) -> Response {
    state.counters.search.fetch_add(1, Ordering::SeqCst);
    locked(&state.searches).push(request.clone());

    let delay = locked(&state.search_delays).get(&request.query).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(failure) = locked(&state.search_failure).clone() {
        return failure.into_response();
    }
    if request.query.trim().is_empty() {
        return Failure::Status(400, Some("Search term required".to_string())).into_response();
    }

    let filters: Vec<String> = state.with_filters(request.user_id.as_str(), |list| {
        list.iter().map(|f| f.to_lowercase()).collect()
    });
    let query = request.query.to_lowercase();
    let found: Vec<Product> = locked(&state.catalog)
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&query))
        .cloned()
        .collect();
    let total_found = found.len();
    let passing: Vec<Product> = found
        .into_iter()
        .filter(|p| passes_filters(p, &filters))
        .collect();

    Json(SearchResponse {
        total_found: u32::try_from(total_found).ok(),
        filtered_count: u32::try_from(passing.len()).ok(),
        products: Some(passing),
        store: Some(request.store.to_string()),
        error: None,
    })
    .into_response()
}

/// Products without an ingredient list are never filtered out.
fn passes_filters(product: &Product, filters: &[String]) -> bool {
    product.ingredients.as_deref().is_none_or(|ingredients| {
        let ingredients = ingredients.to_lowercase();
        !filters.iter().any(|f| ingredients.contains(f.as_str()))
    })
}

async fn cart_add(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<CartAddRequest>,
) -> Response {
    state.counters.cart.fetch_add(1, Ordering::SeqCst);
    if let Some(failure) = locked(&state.cart_failure).clone() {
        return failure.into_response();
    }

    let success = state.cart_success.load(Ordering::SeqCst);
    Json(CartAddResponse {
        success,
        message: Some(if success {
            "Redirecting to product page".to_string()
        } else {
            "Product is unavailable".to_string()
        }),
        product_url: Some(request.product_url),
    })
    .into_response()
}

/// An in-process backend bound to an ephemeral local port.
///
/// Filter lists live in memory per user and start from [`DEFAULT_FILTERS`].
/// Failures can be scripted per endpoint group, and every request is
/// counted so tests can assert that nothing was sent.
pub struct MockBackend {
    url: Url,
    state: Arc<BackendState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start the server on `127.0.0.1:0`.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let state = Arc::new(BackendState::new());
        let app = Router::new()
            .route("/api/health", get(health))
            .route(
                "/api/filters",
                get(load_filters).post(add_filter).delete(remove_filter),
            )
            .route("/api/search", post(search))
            .route("/api/cart/add", post(cart_add))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            url,
            state,
            server,
        })
    }

    /// Base URL of the running server.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.url.clone())
    }

    /// A REST client pointing at this server.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn client(&self) -> Result<ApiClient, healthy_food_client::ApiError> {
        ApiClient::new(&self.config())
    }

    /// An orchestrator over a fresh session for `store`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn orchestrator(
        &self,
        store: Store,
    ) -> Result<ApiOrchestrator, healthy_food_client::ApiError> {
        let api = self.client()?;
        Ok(ApiOrchestrator::from_api(
            Session::new(UserId::default(), store),
            &api,
        ))
    }

    /// Replace the searchable catalog.
    pub fn set_catalog(&self, products: Vec<Product>) {
        *locked(&self.state.catalog) = products;
    }

    /// Delay responses to searches for exactly `query`.
    pub fn delay_search(&self, query: &str, delay: Duration) {
        locked(&self.state.search_delays).insert(query.to_string(), delay);
    }

    /// Make every search fail, or succeed again with `None`.
    pub fn fail_search(&self, failure: Option<Failure>) {
        *locked(&self.state.search_failure) = failure;
    }

    /// Make every filter request fail, or succeed again with `None`.
    pub fn fail_filters(&self, failure: Option<Failure>) {
        *locked(&self.state.filters_failure) = failure;
    }

    /// Make every cart request fail, or succeed again with `None`.
    pub fn fail_cart(&self, failure: Option<Failure>) {
        *locked(&self.state.cart_failure) = failure;
    }

    /// Set the `success` flag cart responses carry.
    pub fn set_cart_success(&self, success: bool) {
        self.state.cart_success.store(success, Ordering::SeqCst);
    }

    /// Server-side filter list for a user.
    #[must_use]
    pub fn filters_of(&self, user_id: &str) -> Vec<String> {
        self.state.with_filters(user_id, |list| list.clone())
    }

    /// Every search request received, in arrival order.
    #[must_use]
    pub fn searches(&self) -> Vec<SearchRequest> {
        locked(&self.state.searches).clone()
    }

    #[must_use]
    pub fn filter_requests(&self) -> usize {
        self.state.counters.filters.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn search_requests(&self) -> usize {
        self.state.counters.search.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn cart_requests(&self) -> usize {
        self.state.counters.cart.load(Ordering::SeqCst)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}
