//! Healthy Food Finder CLI - search grocery catalogs with ingredient filters.
//!
//! # Usage
//!
//! ```bash
//! # Search the default store (kroger)
//! hff search peanut butter
//!
//! # Search HEB instead
//! hff --store heb search salsa
//!
//! # Manage ingredient filters
//! hff filters list
//! hff filters add "corn syrup"
//! hff filters remove msg
//!
//! # Prepare a cart hand-off for a product page
//! hff cart https://www.kroger.com/p/some-product/0001111
//!
//! # Interactive session
//! hff shell
//! ```
//!
//! # Commands
//!
//! - `search` - Run one search and print filtered results
//! - `filters` - List, add or remove ingredient filters
//! - `cart` - Ask the backend to prepare a cart-add and print the page to open
//! - `health` - Check that the backend is up
//! - `shell` - Interactive session with persistent results

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};
use healthy_food_client::ClientConfig;
use healthy_food_client::config::parse_api_url;
use healthy_food_core::{Store, UserId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::Context;

#[derive(Parser)]
#[command(name = "hff")]
#[command(author, version, about = "Healthy Food Finder CLI")]
struct Cli {
    /// Backend base URL (overrides `HEALTHY_FOOD_API_URL`)
    #[arg(long, global = true, value_parser = parse_api_url)]
    api_url: Option<url::Url>,

    /// Store to search (overrides `HEALTHY_FOOD_STORE`)
    #[arg(long, global = true)]
    store: Option<Store>,

    /// User whose filters are used (overrides `HEALTHY_FOOD_USER_ID`)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products and print the ones that pass your filters
    Search {
        /// Search text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage ingredient filters
    Filters {
        #[command(subcommand)]
        action: FilterAction,
    },
    /// Prepare a cart hand-off for a retailer product page
    Cart {
        /// Retailer product page URL
        product_url: String,
    },
    /// Check that the backend is up
    Health,
    /// Start an interactive session
    Shell,
}

#[derive(Subcommand)]
enum FilterAction {
    /// List active filters
    List,
    /// Add an ingredient filter
    Add {
        /// Ingredient text to exclude
        term: String,
    },
    /// Remove an ingredient filter
    Remove {
        /// Ingredient text to stop excluding
        term: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "healthy_food_cli=info,healthy_food_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, commands::CommandError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(store) = cli.store {
        config.default_store = store;
    }
    if let Some(user) = &cli.user {
        config.user_id = UserId::new(user.clone());
    }
    Ok(config)
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::new(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Search { query } => {
            commands::search::run(&ctx, &mut out, &query.join(" "), cli.store).await?;
        }
        Commands::Filters { action } => match action {
            FilterAction::List => commands::filters::list(&ctx, &mut out).await?,
            FilterAction::Add { term } => commands::filters::add(&ctx, &mut out, &term).await?,
            FilterAction::Remove { term } => {
                commands::filters::remove(&ctx, &mut out, &term).await?;
            }
        },
        Commands::Cart { product_url } => {
            commands::cart::run(&ctx, &mut out, &product_url).await?;
        }
        Commands::Health => commands::health::run(&ctx, &mut out).await?,
        Commands::Shell => commands::shell::run(&ctx, &mut out).await?,
    }

    out.flush()?;
    Ok(())
}
