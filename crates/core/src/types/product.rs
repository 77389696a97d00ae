//! Catalog products returned by a search.

use serde::{Deserialize, Serialize};

/// Price sentinel the backend uses when a retailer shows no price.
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// A read-only projection of a retailer catalog entry.
///
/// Only `name` is required. A product without a `url` cannot be sent to the
/// retailer's site, so it never offers a cart action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product name as shown by the retailer.
    pub name: String,
    /// Formatted price (e.g. `"$3.49"`), or `"N/A"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Free-text ingredient list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Retailer product page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Product {
    /// Create a product with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: None,
            ingredients: None,
            image: None,
            url: None,
        }
    }

    /// Set the retailer URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the price string.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Set the ingredient text.
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = Some(ingredients.into());
        self
    }

    /// The price to display, if any.
    ///
    /// An absent, blank, or `"N/A"` price means there is nothing to show.
    #[must_use]
    pub fn display_price(&self) -> Option<&str> {
        self.price
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != PRICE_UNAVAILABLE)
    }

    /// The ingredient text, if it is non-blank.
    #[must_use]
    pub fn ingredients_text(&self) -> Option<&str> {
        self.ingredients
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
    }

    /// The image URL, if it is non-blank.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|i| !i.trim().is_empty())
    }

    /// The retailer page URL, if the product can be sent to the cart flow.
    #[must_use]
    pub fn cart_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}
