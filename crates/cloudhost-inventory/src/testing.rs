//! In-memory cloud used by unit tests

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::InventoryError;
use crate::traits::CloudApi;
use crate::types::{ComputeInstance, DatabaseInstance, LoadBalancer};

#[derive(Default)]
pub struct StaticCloud {
    instances: HashMap<String, Vec<ComputeInstance>>,
    databases: HashMap<String, Vec<DatabaseInstance>>,
    balancers: HashMap<String, Vec<LoadBalancer>>,
}

impl StaticCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(mut self, region: &str, instance: ComputeInstance) -> Self {
        self.instances
            .entry(region.to_string())
            .or_default()
            .push(instance);
        self
    }

    pub fn with_database(mut self, region: &str, db: DatabaseInstance) -> Self {
        self.databases.entry(region.to_string()).or_default().push(db);
        self
    }

    pub fn with_load_balancer(mut self, region: &str, lb: LoadBalancer) -> Self {
        self.balancers.entry(region.to_string()).or_default().push(lb);
        self
    }
}

#[async_trait]
impl CloudApi for StaticCloud {
    async fn running_instances(
        &self,
        region: &str,
    ) -> Result<Vec<ComputeInstance>, InventoryError> {
        Ok(self.instances.get(region).cloned().unwrap_or_default())
    }

    async fn db_instances(&self, region: &str) -> Result<Vec<DatabaseInstance>, InventoryError> {
        Ok(self.databases.get(region).cloned().unwrap_or_default())
    }

    async fn load_balancers(&self, region: &str) -> Result<Vec<LoadBalancer>, InventoryError> {
        Ok(self.balancers.get(region).cloned().unwrap_or_default())
    }
}
