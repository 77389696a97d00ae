//! Filter management.
//!
//! # Usage
//!
//! ```bash
//! hff filters list
//! hff filters add "corn syrup"
//! hff filters remove msg
//! ```

use std::io::Write;

use super::{CommandError, Context, finish};
use crate::render;

/// Print the user's filters.
///
/// # Errors
///
/// Returns error if output fails.
pub async fn list(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    ctx.orchestrator.start().await;
    render::filters(out, &ctx.orchestrator.session())?;
    Ok(())
}

/// Add a filter and print the resulting list.
///
/// # Errors
///
/// Returns error if output fails or the backend rejects the change.
pub async fn add(ctx: &Context, out: &mut impl Write, term: &str) -> Result<(), CommandError> {
    let effects = ctx.orchestrator.add_filter(term).await;
    finish(out, &effects)?;
    render::filters(out, &ctx.orchestrator.session())?;
    Ok(())
}

/// Remove a filter and print the resulting list.
///
/// # Errors
///
/// Returns error if output fails or the backend rejects the change.
pub async fn remove(ctx: &Context, out: &mut impl Write, term: &str) -> Result<(), CommandError> {
    let effects = ctx.orchestrator.remove_filter(term).await;
    finish(out, &effects)?;
    render::filters(out, &ctx.orchestrator.session())?;
    Ok(())
}
