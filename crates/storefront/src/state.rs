//! Application state shared across handlers.

use std::sync::Arc;

use verovista_core::Catalog;

use crate::config::StorefrontConfig;
use crate::services::IdentityClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, configuration and identity provider client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    identity: Option<IdentityClient>,
}

impl AppState {
    /// Create application state with the identity client derived from
    /// configuration (Google when credentials are set, none otherwise).
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let identity = config.identity.as_ref().map(IdentityClient::google);
        Self::with_identity(config, catalog, identity)
    }

    /// Create application state with an explicit identity client.
    #[must_use]
    pub fn with_identity(
        config: StorefrontConfig,
        catalog: Catalog,
        identity: Option<IdentityClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                identity,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the identity provider client, if login is configured.
    #[must_use]
    pub fn identity(&self) -> Option<&IdentityClient> {
        self.inner.identity.as_ref()
    }
}
