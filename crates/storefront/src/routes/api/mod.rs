//! JSON API routes.

pub mod health;
pub mod history;
