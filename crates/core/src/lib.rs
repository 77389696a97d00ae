//! Healthy Food Finder Core - Shared types library.
//!
//! This crate provides the domain types used across all Healthy Food Finder
//! components:
//! - `client` - REST clients and the search/filter/cart session state machine
//! - `cli` - Terminal front end built on the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere, including by
//! test backends that speak the same wire format.
//!
//! # Modules
//!
//! - [`types`] - Products, filters, store selectors, search statistics and IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
