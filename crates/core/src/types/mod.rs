//! Core types for Healthy Food Finder.
//!
//! This module provides type-safe wrappers for the catalog search domain.

pub mod filter;
pub mod id;
pub mod product;
pub mod stats;
pub mod store;

pub use filter::{Filter, FilterError, FilterSet};
pub use id::UserId;
pub use product::{PRICE_UNAVAILABLE, Product};
pub use stats::SearchStats;
pub use store::Store;
