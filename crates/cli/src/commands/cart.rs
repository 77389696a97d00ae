//! Cart hand-off for a single product page.
//!
//! # Usage
//!
//! ```bash
//! hff cart https://www.kroger.com/p/some-product/0001111
//! ```

use std::io::Write;

use healthy_food_core::Product;

use super::{CommandError, Context, finish};

/// Prepare a cart-add for a product URL and print the page to open.
///
/// # Errors
///
/// Returns error if output fails or the backend declines.
pub async fn run(
    ctx: &Context,
    out: &mut impl Write,
    product_url: &str,
) -> Result<(), CommandError> {
    let product = Product::named(product_url).with_url(product_url);
    if product.cart_url().is_none() {
        writeln!(out, "! A product URL is required")?;
        return Err(CommandError::Failed(1));
    }
    let effects = ctx.orchestrator.add_to_cart(&product).await;
    finish(out, &effects)
}
