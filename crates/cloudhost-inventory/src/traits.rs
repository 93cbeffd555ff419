//! Cloud query and resource fetcher traits

use async_trait::async_trait;

use crate::error::InventoryError;
use crate::types::{ComputeInstance, DatabaseInstance, HostMap, LoadBalancer, ResourceKind};

/// Region-scoped read access to the cloud provider
///
/// Implementations follow pagination to the end and return SDK failures as
/// [`InventoryError::Cloud`] without retrying.
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Compute instances in the `running` state
    async fn running_instances(&self, region: &str)
    -> Result<Vec<ComputeInstance>, InventoryError>;

    /// Managed database instances
    async fn db_instances(&self, region: &str) -> Result<Vec<DatabaseInstance>, InventoryError>;

    /// Load balancers
    async fn load_balancers(&self, region: &str) -> Result<Vec<LoadBalancer>, InventoryError>;
}

/// Turns one kind of cloud resource into inventory hosts
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Resource kind this fetcher produces
    fn kind(&self) -> ResourceKind;

    /// Fetch eligible resources in a region, keyed by region-qualified host name
    async fn fetch(&self, region: &str) -> Result<HostMap, InventoryError>;
}
