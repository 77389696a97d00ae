//! One-shot product search.
//!
//! # Usage
//!
//! ```bash
//! hff search greek yogurt
//! hff --store heb search tortillas
//! ```

use std::io::Write;

use healthy_food_core::Store;

use super::{CommandError, Context, finish};
use crate::render;

/// Load filters, run one search, and print the results.
///
/// # Errors
///
/// Returns error if output fails or the search reports a failure.
pub async fn run(
    ctx: &Context,
    out: &mut impl Write,
    query: &str,
    store: Option<Store>,
) -> Result<(), CommandError> {
    ctx.orchestrator.start().await;

    let store = store.unwrap_or_else(|| ctx.orchestrator.store());
    tracing::info!(%store, query, "Searching");
    let effects = ctx.orchestrator.search_in(query, store).await;

    render::results(out, &ctx.orchestrator.session())?;
    finish(out, &effects)
}
