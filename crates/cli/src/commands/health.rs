//! Backend health check.

use std::io::Write;

use super::{CommandError, Context};

/// Print the backend's health status.
///
/// # Errors
///
/// Returns error if the backend cannot be reached.
pub async fn run(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    let health = ctx.api.health().await?;
    writeln!(out, "{} is {}", ctx.api.base_url(), health.status)?;
    Ok(())
}
