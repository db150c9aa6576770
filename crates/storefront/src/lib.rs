//! Verovista storefront library.
//!
//! Catalog search, Google sign-in and a session-held view history served
//! over axum. The binary in `main.rs` wires this up with Sentry; tests build
//! the same router through [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sanitize;
pub mod services;
pub mod state;
