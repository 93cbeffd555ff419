//! AWS implementation of the cloud query trait

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::Filter;
use cloudhost_inventory::{
    CloudApi, ComputeInstance, DatabaseInstance, InventoryError, LoadBalancer, ResourceKind,
};
use tracing::{debug, instrument};

use crate::convert;

/// AWS cloud backend
///
/// Credentials come from the SDK's default provider chain. One shared
/// [`SdkConfig`] is loaded up front; per-region clients are derived from it
/// on each query.
#[derive(Debug, Clone)]
pub struct AwsCloud {
    config: SdkConfig,
}

impl AwsCloud {
    /// Load shared configuration from the environment
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(config)
    }

    /// Create a backend from an already loaded configuration
    #[must_use]
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    fn ec2(&self, region: &str) -> aws_sdk_ec2::Client {
        let conf = aws_sdk_ec2::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(conf)
    }

    fn rds(&self, region: &str) -> aws_sdk_rds::Client {
        let conf = aws_sdk_rds::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_rds::Client::from_conf(conf)
    }

    fn elbv2(&self, region: &str) -> aws_sdk_elasticloadbalancingv2::Client {
        let conf = aws_sdk_elasticloadbalancingv2::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_elasticloadbalancingv2::Client::from_conf(conf)
    }
}

#[async_trait]
impl CloudApi for AwsCloud {
    #[instrument(skip(self), level = "debug")]
    async fn running_instances(
        &self,
        region: &str,
    ) -> Result<Vec<ComputeInstance>, InventoryError> {
        let running = Filter::builder()
            .name("instance-state-name")
            .values("running")
            .build();

        let mut pages = self
            .ec2(region)
            .describe_instances()
            .filters(running)
            .into_paginator()
            .send();

        let mut instances = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                InventoryError::cloud(ResourceKind::Compute, region, aws_sdk_ec2::Error::from(e))
            })?;
            for reservation in page.reservations() {
                instances.extend(reservation.instances().iter().map(convert::compute_instance));
            }
        }

        debug!(count = instances.len(), "described instances");
        Ok(instances)
    }

    #[instrument(skip(self), level = "debug")]
    async fn db_instances(&self, region: &str) -> Result<Vec<DatabaseInstance>, InventoryError> {
        let mut pages = self
            .rds(region)
            .describe_db_instances()
            .into_paginator()
            .send();

        let mut databases = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                InventoryError::cloud(ResourceKind::Database, region, aws_sdk_rds::Error::from(e))
            })?;
            databases.extend(page.db_instances().iter().map(convert::database_instance));
        }

        debug!(count = databases.len(), "described db instances");
        Ok(databases)
    }

    #[instrument(skip(self), level = "debug")]
    async fn load_balancers(&self, region: &str) -> Result<Vec<LoadBalancer>, InventoryError> {
        let mut pages = self
            .elbv2(region)
            .describe_load_balancers()
            .into_paginator()
            .send();

        let mut balancers = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                InventoryError::cloud(
                    ResourceKind::LoadBalancer,
                    region,
                    aws_sdk_elasticloadbalancingv2::Error::from(e),
                )
            })?;
            balancers.extend(page.load_balancers().iter().map(convert::load_balancer));
        }

        debug!(count = balancers.len(), "described load balancers");
        Ok(balancers)
    }
}
