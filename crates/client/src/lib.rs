//! Healthy Food Finder client library.
//!
//! The search-filter-cart orchestration layer: REST clients for the backend,
//! the session state machine that reconciles their responses, and the
//! view-models a front end renders from.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`api`] - Filter store, search and cart clients over one HTTP transport
//! - [`session`] - Session aggregate and its reducer
//! - [`orchestrator`] - Async driver sequencing client calls around the session
//! - [`view`] - Labels and display predicates derived from session state
//!
//! # Example
//!
//! ```rust,ignore
//! use healthy_food_client::{ApiClient, ApiOrchestrator, ClientConfig, Effect, Session};
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config)?;
//! let orchestrator = ApiOrchestrator::from_api(
//!     Session::new(config.user_id.clone(), config.default_store),
//!     &api,
//! );
//!
//! orchestrator.start().await;
//! for effect in orchestrator.search("granola").await {
//!     match effect {
//!         Effect::Notify(note) => eprintln!("{note}"),
//!         Effect::NavigateTo(url) => open(url),
//!     }
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod orchestrator;
pub mod session;
pub mod view;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use orchestrator::{ApiOrchestrator, Orchestrator};
pub use session::{Effect, Notification, SearchPhase, Session};
