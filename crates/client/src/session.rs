//! The session aggregate and its reducer.
//!
//! A [`Session`] holds everything one running client knows: the user's
//! filters, the current results and statistics, and which requests are in
//! flight. It performs no I/O. Every intent is split in two:
//!
//! 1. a `begin_*` step that validates input, marks the request in flight, and
//!    hands back a ticket describing the request to send, and
//! 2. a `complete_*` step that reduces the response into state and returns the
//!    [`Effect`]s the presentation layer must carry out.
//!
//! # Search ordering
//!
//! Every search gets a sequence number. Only the response to the most
//! recently issued search is applied; older responses are dropped whenever
//! they arrive, so stale results can never overwrite fresh ones.
//!
//! # Filters
//!
//! Filter responses carry the backend's authoritative list and are applied
//! in the order they complete. A failed load keeps whatever filters were
//! already known; a failed add or remove also leaves them untouched but
//! raises a notification.

use std::collections::BTreeSet;
use std::fmt;

use healthy_food_core::{Filter, FilterSet, Product, SearchStats, Store, UserId};
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, SearchRequest, SearchResults};

/// A side effect the presentation layer must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a blocking, user-visible notification.
    Notify(Notification),
    /// Open the retailer's product page. Fire-and-forget; never retried.
    NavigateTo(String),
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Whether a search is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    Idle,
    Loading,
}

/// A search that has been started and awaits its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub request: SearchRequest,
}

/// Which way a filter mutation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterAction {
    Add,
    Remove,
}

impl FilterAction {
    const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding filter. Please try again.",
            Self::Remove => "Error removing filter. Please try again.",
        }
    }
}

/// A filter mutation that has been started and awaits its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTicket {
    pub seq: u64,
    pub action: FilterAction,
    pub filter: Filter,
}

/// A cart-add that has been started and awaits its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTicket {
    pub product_url: String,
    pub product_name: String,
}

const CART_FAILURE: &str = "Error adding to cart. Please try again.";

/// In-memory state owned by one running client.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: UserId,
    store: Store,
    filters: FilterSet,
    filters_revision: u64,
    filter_seq: u64,
    results: Vec<Product>,
    results_store: Option<Store>,
    stats: SearchStats,
    latest_search_seq: u64,
    search_in_flight: bool,
    cart_pending: BTreeSet<String>,
}

impl Session {
    /// A fresh session: no filters, no results, zero statistics.
    #[must_use]
    pub const fn new(user_id: UserId, store: Store) -> Self {
        Self {
            user_id,
            store,
            filters: FilterSet::new(),
            filters_revision: 0,
            filter_seq: 0,
            results: Vec::new(),
            results_store: None,
            stats: SearchStats::ZERO,
            latest_search_seq: 0,
            search_in_flight: false,
            cart_pending: BTreeSet::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Store selected for the next search.
    #[must_use]
    pub const fn store(&self) -> Store {
        self.store
    }

    pub const fn set_store(&mut self, store: Store) {
        self.store = store;
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Bumped every time a filter response is applied.
    #[must_use]
    pub const fn filters_revision(&self) -> u64 {
        self.filters_revision
    }

    #[must_use]
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Store the current results came from.
    #[must_use]
    pub const fn results_store(&self) -> Option<Store> {
        self.results_store
    }

    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    #[must_use]
    pub const fn phase(&self) -> SearchPhase {
        if self.search_in_flight {
            SearchPhase::Loading
        } else {
            SearchPhase::Idle
        }
    }

    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.search_in_flight
    }

    /// Whether a cart-add for this product is awaiting its response.
    #[must_use]
    pub fn is_cart_pending(&self, product: &Product) -> bool {
        product
            .cart_url()
            .is_some_and(|url| self.cart_pending.contains(url))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Start a search. Blank queries are ignored and return `None`.
    pub fn begin_search(&mut self, query: &str, store: Store) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search query");
            return None;
        }

        self.latest_search_seq += 1;
        self.search_in_flight = true;

        Some(SearchTicket {
            seq: self.latest_search_seq,
            request: SearchRequest {
                query: query.to_string(),
                user_id: self.user_id.clone(),
                store,
            },
        })
    }

    /// Apply a search response.
    ///
    /// Responses to anything but the latest search are dropped without
    /// touching state or raising notifications.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResults, ApiError>,
    ) -> Vec<Effect> {
        if ticket.seq != self.latest_search_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_search_seq,
                "Dropping stale search response"
            );
            return Vec::new();
        }

        self.search_in_flight = false;

        match outcome {
            Ok(results) => {
                info!(
                    query = %ticket.request.query,
                    store = %ticket.request.store,
                    products = results.products.len(),
                    "Search results applied"
                );
                self.results = results.products;
                self.stats = results.stats;
                self.results_store = Some(ticket.request.store);
                Vec::new()
            }
            Err(err) => {
                error!(error = %err, query = %ticket.request.query, "Error searching products");
                self.results.clear();
                self.stats = SearchStats::ZERO;
                self.results_store = None;
                vec![Effect::Notify(Notification::new(format!(
                    "Error searching products: {}",
                    err.user_message()
                )))]
            }
        }
    }

    /// Forget a search whose response will never be applied.
    ///
    /// Only the latest search leaves the loading phase; older tickets are
    /// already stale.
    pub fn abandon_search(&mut self, ticket: &SearchTicket) {
        if ticket.seq == self.latest_search_seq {
            debug!(seq = ticket.seq, "Search abandoned before completion");
            self.search_in_flight = false;
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Apply the result of the startup filter load.
    ///
    /// Failures are logged and swallowed; known filters are kept.
    pub fn apply_filters_loaded(&mut self, outcome: Result<FilterSet, ApiError>) {
        match outcome {
            Ok(filters) => self.replace_filters(filters),
            Err(err) => warn!(error = %err, "Error loading filters; keeping current filters"),
        }
    }

    /// Start adding or removing a filter. Blank terms are ignored.
    pub fn begin_filter_change(&mut self, action: FilterAction, term: &str) -> Option<FilterTicket> {
        let Ok(filter) = Filter::parse(term) else {
            debug!(?action, "Ignoring blank filter term");
            return None;
        };
        self.filter_seq += 1;
        Some(FilterTicket {
            seq: self.filter_seq,
            action,
            filter,
        })
    }

    /// Apply a filter mutation response.
    pub fn complete_filter_change(
        &mut self,
        ticket: &FilterTicket,
        outcome: Result<FilterSet, ApiError>,
    ) -> Vec<Effect> {
        match outcome {
            Ok(filters) => {
                debug!(seq = ticket.seq, action = ?ticket.action, filter = %ticket.filter, "Filter change applied");
                self.replace_filters(filters);
                Vec::new()
            }
            Err(err) => {
                error!(
                    error = %err,
                    action = ?ticket.action,
                    filter = %ticket.filter,
                    "Filter change failed; keeping current filters"
                );
                vec![Effect::Notify(Notification::new(
                    ticket.action.failure_message(),
                ))]
            }
        }
    }

    fn replace_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.filters_revision += 1;
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Start a cart-add for one product.
    ///
    /// Returns `None` when the product has no retailer URL or a cart-add for
    /// it is already pending. Other products are unaffected.
    pub fn begin_cart_add(&mut self, product: &Product) -> Option<CartTicket> {
        let Some(url) = product.cart_url() else {
            debug!(product = %product.name, "Product has no URL; cart action unavailable");
            return None;
        };
        if !self.cart_pending.insert(url.to_string()) {
            debug!(product = %product.name, "Cart add already pending");
            return None;
        }
        Some(CartTicket {
            product_url: url.to_string(),
            product_name: product.name.clone(),
        })
    }

    /// Apply a cart-add response. Never touches results or statistics.
    pub fn complete_cart_add(
        &mut self,
        ticket: &CartTicket,
        outcome: Result<bool, ApiError>,
    ) -> Vec<Effect> {
        self.cart_pending.remove(&ticket.product_url);

        match outcome {
            Ok(true) => {
                info!(product = %ticket.product_name, "Opening retailer product page");
                vec![Effect::NavigateTo(ticket.product_url.clone())]
            }
            Ok(false) => {
                warn!(product = %ticket.product_name, "Cart add declined");
                vec![Effect::Notify(Notification::new(CART_FAILURE))]
            }
            Err(err) => {
                error!(error = %err, product = %ticket.product_name, "Error adding to cart");
                vec![Effect::Notify(Notification::new(CART_FAILURE))]
            }
        }
    }

    /// Forget a cart-add whose response will never be applied.
    pub fn abandon_cart_add(&mut self, ticket: &CartTicket) {
        if self.cart_pending.remove(&ticket.product_url) {
            debug!(product = %ticket.product_name, "Cart add abandoned before completion");
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(UserId::default(), Store::default())
    }
}
