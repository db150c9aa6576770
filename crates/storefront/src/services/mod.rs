//! External services used by the storefront.
//!
//! # Services
//!
//! - `identity` - Google `OpenID` Connect sign-in

pub mod identity;

pub use identity::{IdentityClient, IdentityError};
