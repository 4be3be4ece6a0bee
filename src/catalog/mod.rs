//! Target catalog: several target documents in one file
//!
//! ```json
//! {"targets": [{"id": "catbox", "displayName": "Catbox", "request": {...}, "response": {...}}]}
//! ```
//!
//! Every entry is validated when the catalog is loaded, so a bad document is
//! reported up front instead of failing the first upload.

mod validation;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::target::TargetConfig;

pub use validation::{ValidationError, validate, validate_target};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown target '{0}'")]
    UnknownTarget(String),
}

/// One catalog entry: the target document plus a short description
///
/// Other presentation keys a catalog may carry are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntry {
    #[serde(flatten)]
    pub config: TargetConfig,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TargetCatalog {
    #[serde(default)]
    targets: Vec<TargetEntry>,
}

impl TargetCatalog {
    /// Read and validate a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&bytes)?;
        tracing::info!(path = %path.display(), targets = catalog.len(), "Loaded target catalog");
        Ok(catalog)
    }

    /// Parse and validate a catalog document
    pub fn from_json(bytes: &[u8]) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_slice(bytes)?;
        validate(&catalog.targets)?;
        Ok(catalog)
    }

    pub fn targets(&self) -> &[TargetEntry] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&TargetEntry, CatalogError> {
        self.targets
            .iter()
            .find(|entry| entry.config.id == id)
            .ok_or_else(|| CatalogError::UnknownTarget(id.to_string()))
    }
}
