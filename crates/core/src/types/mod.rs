//! Core types for Verovista.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod history;
pub mod id;
pub mod identity;
pub mod product;

pub use history::{HISTORY_LIMIT, ViewHistory};
pub use id::ProductId;
pub use identity::Identity;
pub use product::Product;
