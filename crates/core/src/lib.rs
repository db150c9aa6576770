//! Verovista Core - Catalog store and search/history engine.
//!
//! This crate holds the product catalog and everything that operates on it:
//! - `storefront` - Web application serving search, product and history endpoints
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no logging. Reading the catalog file and owning the session are
//! the storefront's job; this crate only parses and queries.
//!
//! # Modules
//!
//! - [`types`] - Product records, IDs, view history and authenticated identity
//! - [`catalog`] - The immutable catalog with lookup, search and history operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use types::*;
