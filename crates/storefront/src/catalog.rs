//! One-time catalog load from the static product data file.
//!
//! The storefront prefers staying up over refusing to start: if the file is
//! missing or malformed it logs the problem and serves an empty catalog.

use std::path::Path;

use thiserror::Error;
use verovista_core::{Catalog, CatalogError};

/// The product data source could not be read or parsed.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: CatalogError,
    },
}

/// Read and parse the catalog file.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or is not a valid
/// JSON list of products.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: display.clone(),
        source,
    })?;

    Catalog::from_json(&source).map_err(|source| CatalogLoadError::Parse {
        path: display,
        source,
    })
}

/// Load the catalog, falling back to an empty one on any error.
#[must_use]
pub fn load_catalog_or_empty(path: &Path) -> Catalog {
    match load_catalog(path) {
        Ok(catalog) => {
            if catalog.duplicates_dropped() > 0 {
                tracing::warn!(
                    path = %path.display(),
                    dropped = catalog.duplicates_dropped(),
                    "Catalog contains repeated product IDs, keeping first occurrence"
                );
            }
            tracing::info!(products = catalog.len(), "Catalog loaded");
            catalog
        }
        Err(CatalogLoadError::Io { path, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::warn!("{path} not found, using empty catalog");
            Catalog::empty()
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not load catalog, using empty catalog");
            Catalog::empty()
        }
    }
}
