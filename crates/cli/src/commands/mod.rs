//! Command implementations.
//!
//! Each command drives the orchestrator through one or more intents and
//! renders the resulting session state to stdout.

pub mod cart;
pub mod filters;
pub mod health;
pub mod search;
pub mod shell;

use std::io::{self, Write};

use healthy_food_client::{
    ApiClient, ApiError, ApiOrchestrator, ClientConfig, ConfigError, Effect, Session,
};
use thiserror::Error;

use crate::render;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend could not be reached or answered badly.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// One or more operations reported a failure to the user.
    #[error("{0} operation(s) failed")]
    Failed(usize),
}

/// Everything a command needs.
pub struct Context {
    pub api: ApiClient,
    pub orchestrator: ApiOrchestrator,
}

impl Context {
    /// Build the clients and a fresh session from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, CommandError> {
        let api = ApiClient::new(config)?;
        let session = Session::new(config.user_id.clone(), config.default_store);
        let orchestrator = ApiOrchestrator::from_api(session, &api);
        Ok(Self { api, orchestrator })
    }
}

/// Render effects and turn any failure notification into an error.
fn finish(out: &mut impl Write, effects: &[Effect]) -> Result<(), CommandError> {
    match render::effects(out, effects)? {
        0 => Ok(()),
        failures => Err(CommandError::Failed(failures)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use healthy_food_client::Notification;

    use super::*;

    #[test]
    fn test_finish_fails_before_anything_else_is_rendered() {
        let mut buf = Vec::new();
        let result = finish(
            &mut buf,
            &[Effect::Notify(Notification::new(
                "Error adding filter. Please try again.",
            ))],
        );

        assert!(matches!(result, Err(CommandError::Failed(1))));
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "! Error adding filter. Please try again.\n"
        );
    }

    #[test]
    fn test_finish_without_notifications_succeeds() {
        let mut buf = Vec::new();
        assert!(finish(&mut buf, &[]).is_ok());
        assert!(buf.is_empty());
    }
}
