//! Error types for cloudhost-inventory

use thiserror::Error;

use crate::types::ResourceKind;

/// Boxed error returned by the cloud SDK, carried through unchanged
pub type CloudSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during inventory operations
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A cloud API query failed (auth, network, malformed response)
    #[error("{kind} query failed in region {region}")]
    Cloud {
        /// Resource kind being queried
        kind: ResourceKind,
        /// Region the query was scoped to
        region: String,
        /// Underlying SDK error
        #[source]
        source: CloudSource,
    },
}

impl InventoryError {
    /// Wrap an SDK error for the given kind and region
    pub fn cloud(
        kind: ResourceKind,
        region: impl Into<String>,
        source: impl Into<CloudSource>,
    ) -> Self {
        InventoryError::Cloud {
            kind,
            region: region.into(),
            source: source.into(),
        }
    }

    /// Resource kind of the failed query
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            InventoryError::Cloud { kind, .. } => *kind,
        }
    }

    /// Region of the failed query
    #[must_use]
    pub fn region(&self) -> &str {
        match self {
            InventoryError::Cloud { region, .. } => region,
        }
    }
}
