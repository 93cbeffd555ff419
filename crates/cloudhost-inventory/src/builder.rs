//! High-level inventory building API

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::InventoryError;
use crate::fetcher::{ComputeFetcher, DatabaseFetcher, LoadBalancerFetcher};
use crate::traits::{CloudApi, ResourceFetcher};
use crate::types::{ConnectionDefaults, HostMap, HostRecord, InventoryDocument, ResourceKind};

/// Inventory builder
///
/// Queries every region one kind at a time, compute first, then databases,
/// then load balancers, and merges the results.
pub struct InventoryBuilder {
    fetchers: Vec<Arc<dyn ResourceFetcher>>,
}

impl InventoryBuilder {
    /// Create a builder with the standard compute, database and load balancer fetchers
    pub fn new(api: Arc<dyn CloudApi>, connection: ConnectionDefaults) -> Self {
        Self::with_fetchers(vec![
            Arc::new(ComputeFetcher::new(Arc::clone(&api), connection)),
            Arc::new(DatabaseFetcher::new(Arc::clone(&api))),
            Arc::new(LoadBalancerFetcher::new(api)),
        ])
    }

    /// Fetchers are queried in the given order; each kind appears once
    fn with_fetchers(fetchers: Vec<Arc<dyn ResourceFetcher>>) -> Self {
        Self { fetchers }
    }

    /// Fetch one kind in one region
    ///
    /// Returns an empty map when no fetcher is registered for `kind`.
    ///
    /// # Errors
    /// Propagates the cloud query error unchanged.
    pub async fn fetch(
        &self,
        kind: ResourceKind,
        region: &str,
    ) -> Result<HostMap, InventoryError> {
        match self.fetchers.iter().find(|f| f.kind() == kind) {
            Some(fetcher) => fetcher.fetch(region).await,
            None => Ok(HostMap::new()),
        }
    }

    /// Running compute instances with a usable address
    ///
    /// # Errors
    /// Propagates the cloud query error unchanged.
    pub async fn fetch_compute(&self, region: &str) -> Result<HostMap, InventoryError> {
        self.fetch(ResourceKind::Compute, region).await
    }

    /// Database instances with a resolved endpoint
    ///
    /// # Errors
    /// Propagates the cloud query error unchanged.
    pub async fn fetch_databases(&self, region: &str) -> Result<HostMap, InventoryError> {
        self.fetch(ResourceKind::Database, region).await
    }

    /// Load balancers with a DNS name
    ///
    /// # Errors
    /// Propagates the cloud query error unchanged.
    pub async fn fetch_load_balancers(&self, region: &str) -> Result<HostMap, InventoryError> {
        self.fetch(ResourceKind::LoadBalancer, region).await
    }

    /// Query all regions and merge per kind
    ///
    /// Later regions overwrite earlier ones on host name collision.
    async fn collect<S: AsRef<str>>(
        &self,
        regions: &[S],
    ) -> Result<Vec<(ResourceKind, HostMap)>, InventoryError> {
        let mut merged: Vec<(ResourceKind, HostMap)> = self
            .fetchers
            .iter()
            .map(|f| (f.kind(), HostMap::new()))
            .collect();

        for region in regions {
            let region = region.as_ref();
            debug!(region, "querying region");

            for (fetcher, (_, hosts)) in self.fetchers.iter().zip(merged.iter_mut()) {
                hosts.extend(fetcher.fetch(region).await?);
            }
        }

        Ok(merged)
    }

    /// Build the grouped inventory document
    ///
    /// # Errors
    /// Fails on the first cloud query error; no partial inventory is returned.
    #[instrument(skip_all, fields(regions = regions.len()))]
    pub async fn build_inventory<S: AsRef<str>>(
        &self,
        regions: &[S],
    ) -> Result<InventoryDocument, InventoryError> {
        if regions.is_empty() {
            warn!("no regions given, inventory will be empty");
        }

        let mut document = InventoryDocument::new();
        for (kind, hosts) in self.collect(regions).await? {
            debug!(group = %kind, hosts = hosts.len(), "merged group");
            document.add_group(kind, hosts);
        }

        info!(hosts = document.host_count(), "inventory built");
        Ok(document)
    }

    /// Look up one host's variables across all kinds and regions
    ///
    /// Returns `Ok(None)` for an unknown host.
    ///
    /// # Errors
    /// Propagates the cloud query error unchanged.
    #[instrument(skip(self, regions))]
    pub async fn lookup_host<S: AsRef<str>>(
        &self,
        regions: &[S],
        host: &str,
    ) -> Result<Option<HostRecord>, InventoryError> {
        let mut all_hosts = HostMap::new();
        for (_, hosts) in self.collect(regions).await? {
            all_hosts.extend(hosts);
        }

        let record = all_hosts.swap_remove(host);
        if record.is_none() {
            debug!("host not found in inventory");
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticCloud;
    use crate::types::{ComputeInstance, DatabaseInstance, LoadBalancer, keys};

    fn web(region_ip: &str) -> ComputeInstance {
        ComputeInstance {
            id: "i-web".to_string(),
            tags: [("Name".to_string(), "web1".to_string())].into(),
            public_ip: Some(region_ip.to_string()),
            ..Default::default()
        }
    }

    fn builder(cloud: StaticCloud) -> InventoryBuilder {
        InventoryBuilder::new(Arc::new(cloud), ConnectionDefaults::default())
    }

    #[tokio::test]
    async fn test_single_web_host() {
        let cloud = StaticCloud::new().with_instance("us-east-1", web("1.2.3.4"));
        let doc = builder(cloud).build_inventory(&["us-east-1"]).await.unwrap();

        assert_eq!(doc.ec2.hosts, ["us-east-1-web1"]);
        assert!(doc.rds.hosts.is_empty());
        assert!(doc.alb.hosts.is_empty());
        assert_eq!(
            doc.hostvars("us-east-1-web1")
                .unwrap()
                .get_str(keys::ANSIBLE_HOST),
            Some("1.2.3.4")
        );
    }

    #[tokio::test]
    async fn test_same_name_in_two_regions() {
        let cloud = StaticCloud::new()
            .with_instance("us-east-1", web("1.2.3.4"))
            .with_instance("eu-west-1", web("5.6.7.8"));
        let doc = builder(cloud)
            .build_inventory(&["us-east-1", "eu-west-1"])
            .await
            .unwrap();

        assert_eq!(doc.ec2.hosts, ["us-east-1-web1", "eu-west-1-web1"]);
        assert_eq!(
            doc.hostvars("eu-west-1-web1")
                .unwrap()
                .get_str(keys::ANSIBLE_HOST),
            Some("5.6.7.8")
        );
    }

    #[tokio::test]
    async fn test_duplicate_region_last_write_wins() {
        let cloud = StaticCloud::new()
            .with_instance("us-east-1", web("1.2.3.4"))
            .with_instance("us-east-1", web("9.9.9.9"));
        let doc = builder(cloud).build_inventory(&["us-east-1"]).await.unwrap();

        assert_eq!(doc.ec2.hosts, ["us-east-1-web1"]);
        assert_eq!(
            doc.hostvars("us-east-1-web1")
                .unwrap()
                .get_str(keys::ANSIBLE_HOST),
            Some("9.9.9.9")
        );
    }

    #[tokio::test]
    async fn test_fetch_single_kind() {
        let cloud = StaticCloud::new()
            .with_database(
                "us-east-1",
                DatabaseInstance {
                    identifier: "orders".to_string(),
                    endpoint: Some("orders.rds.amazonaws.com".to_string()),
                    port: Some(3306),
                },
            )
            .with_load_balancer(
                "us-east-1",
                LoadBalancer {
                    name: "frontend".to_string(),
                    dns_name: None,
                    lb_type: None,
                },
            );
        let builder = builder(cloud);

        let dbs = builder.fetch_databases("us-east-1").await.unwrap();
        assert_eq!(dbs.keys().collect::<Vec<_>>(), ["us-east-1-orders"]);

        assert!(builder.fetch_load_balancers("us-east-1").await.unwrap().is_empty());
        assert!(builder.fetch_compute("us-east-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_host() {
        let cloud = StaticCloud::new().with_instance("us-east-1", web("1.2.3.4"));
        let builder = builder(cloud);

        let found = builder
            .lookup_host(&["us-east-1"], "us-east-1-web1")
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = builder
            .lookup_host(&["us-east-1"], "us-east-1-db9")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_cross_kind_name_clash_keeps_later_kind_vars() {
        let cloud = StaticCloud::new()
            .with_instance(
                "us-east-1",
                ComputeInstance {
                    id: "web".to_string(),
                    public_ip: Some("1.2.3.4".to_string()),
                    ..Default::default()
                },
            )
            .with_database(
                "us-east-1",
                DatabaseInstance {
                    identifier: "web".to_string(),
                    endpoint: Some("web.abc.us-east-1.rds.amazonaws.com".to_string()),
                    port: Some(5432),
                },
            );
        let builder = builder(cloud);

        let doc = builder.build_inventory(&["us-east-1"]).await.unwrap();
        assert_eq!(doc.ec2.hosts, ["us-east-1-web"]);
        assert_eq!(doc.rds.hosts, ["us-east-1-web"]);
        assert_eq!(doc.host_count(), 1);

        let vars = doc.hostvars("us-east-1-web").unwrap();
        assert_eq!(
            vars.get_str(keys::RDS_ENDPOINT),
            Some("web.abc.us-east-1.rds.amazonaws.com")
        );
        assert_eq!(vars.get(keys::ANSIBLE_HOST), None);

        let looked_up = builder
            .lookup_host(&["us-east-1"], "us-east-1-web")
            .await
            .unwrap();
        assert_eq!(looked_up.as_ref(), Some(vars));
    }

    #[tokio::test]
    async fn test_empty_regions() {
        let regions: [&str; 0] = [];
        let doc = builder(StaticCloud::new())
            .build_inventory(&regions)
            .await
            .unwrap();

        assert_eq!(doc, InventoryDocument::new());
    }
}
