//! Plain-text rendering of session state and effects.

use std::io::{self, Write};

use healthy_food_client::Effect;
use healthy_food_client::Session;
use healthy_food_client::view::{
    self, EMPTY_RESULTS_TEXT, LOADING_TEXT, NO_FILTERS_TEXT, ResultsView,
};

/// Write the results area and, when visible, the statistics line.
pub fn results(out: &mut impl Write, session: &Session) -> io::Result<()> {
    if let Some(summary) = view::stats_panel(session) {
        writeln!(out, "{summary}")?;
        writeln!(out)?;
    }

    match view::results_view(session) {
        ResultsView::Loading => writeln!(out, "{LOADING_TEXT}"),
        ResultsView::Empty => writeln!(out, "{EMPTY_RESULTS_TEXT}"),
        ResultsView::Products(cards) => {
            for (index, card) in cards.iter().enumerate() {
                writeln!(out, "{:>3}. {}", index + 1, card.name)?;
                if let Some(price) = card.price {
                    writeln!(out, "     {price}")?;
                }
                if let Some(ingredients) = card.ingredients {
                    writeln!(out, "     Ingredients: {ingredients}")?;
                }
                if let Some(cart) = &card.cart {
                    let marker = if cart.enabled { "" } else { " (busy)" };
                    writeln!(out, "     [{}]{marker} {}", cart.label, cart.url)?;
                }
            }
            Ok(())
        }
    }
}

/// Write the filter list.
pub fn filters(out: &mut impl Write, session: &Session) -> io::Result<()> {
    let filters = session.filters();
    writeln!(out, "{}", view::filter_toggle_label(true, filters.len()))?;
    if filters.is_empty() {
        return writeln!(out, "  {NO_FILTERS_TEXT}");
    }
    for filter in filters {
        writeln!(out, "  - {filter}")?;
    }
    Ok(())
}

/// Carry out effects and return how many were failure notifications.
///
/// Navigation prints the retailer URL for the user to open.
pub fn effects(out: &mut impl Write, effects: &[Effect]) -> io::Result<usize> {
    let mut failures = 0;
    for effect in effects {
        match effect {
            Effect::Notify(notification) => {
                failures += 1;
                writeln!(out, "! {notification}")?;
            }
            Effect::NavigateTo(url) => writeln!(out, "Open in your browser: {url}")?,
        }
    }
    Ok(failures)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use healthy_food_client::Notification;
    use healthy_food_client::api::SearchResults;
    use healthy_food_core::{FilterSet, Product, SearchStats, Store};

    use super::*;

    fn rendered<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_results_with_stats() {
        let mut session = Session::default();
        let ticket = session.begin_search("oats", Store::Kroger).unwrap();
        session.complete_search(
            &ticket,
            Ok(SearchResults {
                products: vec![
                    Product::named("Rolled Oats")
                        .with_price("$3.49")
                        .with_url("https://www.kroger.com/p/oats"),
                    Product::named("Oat Bar").with_price("N/A"),
                ],
                stats: SearchStats::new(12, 7),
            }),
        );

        let text = rendered(|out| results(out, &session));
        assert!(text.starts_with("Found 7 healthy products out of 12 total\n"));
        assert!(text.contains("  1. Rolled Oats\n     $3.49\n"));
        assert!(text.contains("[View on Kroger] https://www.kroger.com/p/oats"));
        assert!(!text.contains("N/A"));
    }

    #[test]
    fn test_empty_results() {
        let session = Session::default();
        let text = rendered(|out| results(out, &session));
        assert_eq!(text, format!("{EMPTY_RESULTS_TEXT}\n"));
    }

    #[test]
    fn test_filters() {
        let mut session = Session::default();
        assert!(rendered(|out| filters(out, &session)).contains(NO_FILTERS_TEXT));

        session.apply_filters_loaded(Ok(FilterSet::from_server(["msg", "bht"])));
        let text = rendered(|out| filters(out, &session));
        assert_eq!(text, "Hide Filters (2)\n  - msg\n  - bht\n");
    }

    #[test]
    fn test_effects_counts_failures() {
        let mut buf = Vec::new();
        let failures = effects(
            &mut buf,
            &[
                Effect::NavigateTo("https://www.heb.com/p/1".to_string()),
                Effect::Notify(Notification::new("Error adding to cart. Please try again.")),
            ],
        )
        .unwrap();
        assert_eq!(failures, 1);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Open in your browser: https://www.heb.com/p/1"));
        assert!(text.contains("! Error adding to cart. Please try again."));
    }
}
