//! Presentation view-models derived from session state.
//!
//! These are pure functions so every front end renders the same labels and
//! enables the same actions for a given session.

use healthy_food_core::{Product, Store};

use crate::session::{SearchPhase, Session};

/// Text shown when the user has no filters.
pub const NO_FILTERS_TEXT: &str = "No filters active";

/// Text shown while a search is outstanding.
pub const LOADING_TEXT: &str = "Searching for healthy products...";

/// Text shown when there is nothing to list.
pub const EMPTY_RESULTS_TEXT: &str = "No products found. Try searching for something!";

/// Label for the button that expands or collapses the filter list.
#[must_use]
pub fn filter_toggle_label(expanded: bool, filter_count: usize) -> String {
    let verb = if expanded { "Hide" } else { "Show" };
    format!("{verb} Filters ({filter_count})")
}

/// State of the search submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// Search button for the text currently typed into the search box.
#[must_use]
pub fn search_button(session: &Session, query: &str) -> SearchButton {
    let loading = session.is_searching();
    SearchButton {
        label: if loading { "Searching..." } else { "Search" },
        enabled: !loading && !query.trim().is_empty(),
    }
}

/// Statistics panel line, when the last search found anything.
#[must_use]
pub fn stats_panel(session: &Session) -> Option<String> {
    session.stats().summary()
}

/// The cart action offered on a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartAction<'a> {
    pub label: String,
    pub enabled: bool,
    pub url: &'a str,
}

/// Everything a product card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard<'a> {
    pub name: &'a str,
    pub price: Option<&'a str>,
    pub ingredients: Option<&'a str>,
    pub image: Option<&'a str>,
    /// `None` when the product has no retailer URL.
    pub cart: Option<CartAction<'a>>,
}

impl<'a> ProductCard<'a> {
    #[must_use]
    pub fn new(session: &Session, product: &'a Product) -> Self {
        let store = session.results_store().unwrap_or_else(|| session.store());
        Self {
            name: &product.name,
            price: product.display_price(),
            ingredients: product.ingredients_text(),
            image: product.image_url(),
            cart: product.cart_url().map(|url| {
                let pending = session.is_cart_pending(product);
                CartAction {
                    label: cart_label(pending, store),
                    enabled: !pending,
                    url,
                }
            }),
        }
    }
}

fn cart_label(pending: bool, store: Store) -> String {
    if pending {
        "Opening...".to_string()
    } else {
        format!("View on {}", store.display_name())
    }
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView<'a> {
    Loading,
    Empty,
    Products(Vec<ProductCard<'a>>),
}

/// Results area for the session.
#[must_use]
pub fn results_view(session: &Session) -> ResultsView<'_> {
    if session.phase() == SearchPhase::Loading {
        return ResultsView::Loading;
    }
    if session.results().is_empty() {
        return ResultsView::Empty;
    }
    ResultsView::Products(
        session
            .results()
            .iter()
            .map(|product| ProductCard::new(session, product))
            .collect(),
    )
}
