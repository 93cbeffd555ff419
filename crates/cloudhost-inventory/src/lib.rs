//! cloudhost-inventory: dynamic Ansible inventory from cloud resources
//!
//! Turns compute instances, managed databases and load balancers into a
//! grouped inventory document keyed by region-qualified host names.

pub mod builder;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use builder::InventoryBuilder;
pub use error::{CloudSource, InventoryError};
pub use export::EnvExport;
pub use fetcher::{ComputeFetcher, DatabaseFetcher, LoadBalancerFetcher};
pub use traits::{CloudApi, ResourceFetcher};
pub use types::{
    ComputeInstance, ConnectionDefaults, DatabaseInstance, HostMap, HostRecord,
    InventoryDocument, LoadBalancer, PrimaryEndpoints, ResourceKind,
};
