//! Domain models for storefront.
//!
//! Catalog types live in `verovista-core`; this module only holds what the
//! web layer keeps per user.

pub mod session;

pub use session::{UserSession, keys as session_keys};
