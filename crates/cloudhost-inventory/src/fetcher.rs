//! Resource fetchers for each inventory group

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::traits::{CloudApi, ResourceFetcher};
use crate::types::{
    ComputeInstance, ConnectionDefaults, DatabaseInstance, HostMap, HostRecord, LoadBalancer,
    ResourceKind, host_name, keys, non_empty,
};

/// Fetches running compute instances (`ec2` group)
pub struct ComputeFetcher {
    api: Arc<dyn CloudApi>,
    connection: ConnectionDefaults,
}

impl ComputeFetcher {
    /// Create a new compute fetcher
    pub fn new(api: Arc<dyn CloudApi>, connection: ConnectionDefaults) -> Self {
        Self { api, connection }
    }

    /// Host record for an instance, or `None` if it has no usable address
    #[must_use]
    pub fn to_record(
        instance: &ComputeInstance,
        region: &str,
        connection: &ConnectionDefaults,
    ) -> Option<HostRecord> {
        let address = instance.address()?;

        Some(
            HostRecord::new()
                .with(keys::INSTANCE_ID, instance.id.as_str())
                .with(keys::ANSIBLE_USER, connection.user.as_str())
                .with(keys::ANSIBLE_HOST, address)
                .with(keys::ANSIBLE_SSH_KEY, connection.ssh_key.as_str())
                .with(keys::ANSIBLE_PORT, connection.port.as_str())
                .with(keys::IMAGE_ID, instance.image_id.clone().unwrap_or_default())
                .with(keys::REGION, region),
        )
    }
}

#[async_trait]
impl ResourceFetcher for ComputeFetcher {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Compute
    }

    #[instrument(skip(self))]
    async fn fetch(&self, region: &str) -> Result<HostMap, InventoryError> {
        let instances = self.api.running_instances(region).await?;
        let mut hosts = HostMap::new();

        for instance in &instances {
            let Some(record) = Self::to_record(instance, region, &self.connection) else {
                debug!(instance_id = %instance.id, "skipping instance without address");
                continue;
            };
            hosts.insert(host_name(region, instance.display_name()), record);
        }

        debug!(found = instances.len(), kept = hosts.len(), "fetched compute instances");
        Ok(hosts)
    }
}

/// Fetches managed database instances (`rds` group)
pub struct DatabaseFetcher {
    api: Arc<dyn CloudApi>,
}

impl DatabaseFetcher {
    /// Create a new database fetcher
    pub fn new(api: Arc<dyn CloudApi>) -> Self {
        Self { api }
    }

    /// Host record for a database, or `None` if it has no endpoint yet
    #[must_use]
    pub fn to_record(db: &DatabaseInstance, region: &str) -> Option<HostRecord> {
        let endpoint = non_empty(db.endpoint.as_deref())?;

        let record = HostRecord::new().with(keys::RDS_ENDPOINT, endpoint);
        let record = match db.port {
            Some(port) => record.with(keys::RDS_PORT, port),
            None => record.with(keys::RDS_PORT, ""),
        };
        Some(record.with(keys::REGION, region))
    }
}

#[async_trait]
impl ResourceFetcher for DatabaseFetcher {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Database
    }

    #[instrument(skip(self))]
    async fn fetch(&self, region: &str) -> Result<HostMap, InventoryError> {
        let databases = self.api.db_instances(region).await?;
        let mut hosts = HostMap::new();

        for db in &databases {
            let Some(record) = Self::to_record(db, region) else {
                debug!(identifier = %db.identifier, "skipping database without endpoint");
                continue;
            };
            hosts.insert(host_name(region, &db.identifier), record);
        }

        debug!(found = databases.len(), kept = hosts.len(), "fetched database instances");
        Ok(hosts)
    }
}

/// Fetches load balancers (`alb` group)
pub struct LoadBalancerFetcher {
    api: Arc<dyn CloudApi>,
}

impl LoadBalancerFetcher {
    /// Create a new load balancer fetcher
    pub fn new(api: Arc<dyn CloudApi>) -> Self {
        Self { api }
    }

    /// Host record for a balancer, or `None` if it has no DNS name
    #[must_use]
    pub fn to_record(lb: &LoadBalancer, region: &str) -> Option<HostRecord> {
        let dns = non_empty(lb.dns_name.as_deref())?;

        Some(
            HostRecord::new()
                .with(keys::LB_DNS, dns)
                .with(keys::LB_NAME, lb.name.as_str())
                .with(keys::LB_TYPE, lb.lb_type.clone().unwrap_or_default())
                .with(keys::REGION, region),
        )
    }
}

#[async_trait]
impl ResourceFetcher for LoadBalancerFetcher {
    fn kind(&self) -> ResourceKind {
        ResourceKind::LoadBalancer
    }

    #[instrument(skip(self))]
    async fn fetch(&self, region: &str) -> Result<HostMap, InventoryError> {
        let balancers = self.api.load_balancers(region).await?;
        let mut hosts = HostMap::new();

        for lb in &balancers {
            let Some(record) = Self::to_record(lb, region) else {
                debug!(name = %lb.name, "skipping load balancer without DNS name");
                continue;
            };
            hosts.insert(host_name(region, &lb.name), record);
        }

        debug!(found = balancers.len(), kept = hosts.len(), "fetched load balancers");
        Ok(hosts)
    }
}
