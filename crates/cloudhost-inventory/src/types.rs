//! Inventory type definitions

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host variable names used in host records
pub mod keys {
    pub const REGION: &str = "region";

    pub const INSTANCE_ID: &str = "instance_id";
    pub const ANSIBLE_USER: &str = "ansible_user";
    pub const ANSIBLE_HOST: &str = "ansible_host";
    pub const ANSIBLE_SSH_KEY: &str = "ansible_ssh_private_key_file";
    pub const ANSIBLE_PORT: &str = "ansible_port";
    pub const IMAGE_ID: &str = "image_id";

    pub const RDS_ENDPOINT: &str = "rds_endpoint";
    pub const RDS_PORT: &str = "rds_port";

    pub const LB_DNS: &str = "load_balancer_dns";
    pub const LB_NAME: &str = "load_balancer_name";
    pub const LB_TYPE: &str = "type";
}

// ============================================================================
// Resource kinds
// ============================================================================

/// Kind of cloud resource that contributes hosts to the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// EC2 compute instance
    Compute,
    /// RDS database instance
    Database,
    /// ELBv2 load balancer
    LoadBalancer,
}

impl ResourceKind {
    /// All kinds, in query order
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Compute,
        ResourceKind::Database,
        ResourceKind::LoadBalancer,
    ];

    /// Inventory group name for this kind
    #[must_use]
    pub fn group_name(self) -> &'static str {
        match self {
            ResourceKind::Compute => "ec2",
            ResourceKind::Database => "rds",
            ResourceKind::LoadBalancer => "alb",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

// ============================================================================
// Raw cloud resources
// ============================================================================

/// Running compute instance as reported by the cloud API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeInstance {
    /// Provider-assigned instance id
    pub id: String,
    /// Instance tags
    pub tags: HashMap<String, String>,
    /// Public IPv4 address
    pub public_ip: Option<String>,
    /// Private IPv4 address
    pub private_ip: Option<String>,
    /// Machine image id
    pub image_id: Option<String>,
}

impl ComputeInstance {
    /// Display name: the `Name` tag, or the instance id
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.tags
            .get("Name")
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    /// Address to connect to, public preferred over private
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        non_empty(self.public_ip.as_deref()).or_else(|| non_empty(self.private_ip.as_deref()))
    }
}

/// Managed database instance as reported by the cloud API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseInstance {
    /// Database instance identifier
    pub identifier: String,
    /// Endpoint hostname, absent while the instance is still provisioning
    pub endpoint: Option<String>,
    /// Endpoint port
    pub port: Option<i32>,
}

/// Load balancer as reported by the cloud API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancer {
    /// Load balancer name
    pub name: String,
    /// Public DNS name
    pub dns_name: Option<String>,
    /// Balancer type (application, network, gateway)
    pub lb_type: Option<String>,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Host records
// ============================================================================

/// Flat host variables for one discovered resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostRecord(IndexMap<String, Value>);

impl HostRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a variable
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Raw variable value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Variable value if it is a string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Whether the record has no variables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Host name to host record, in discovery order
pub type HostMap = IndexMap<String, HostRecord>;

/// Build the region-qualified host name
#[must_use]
pub fn host_name(region: &str, name: &str) -> String {
    format!("{region}-{name}")
}

/// Connection settings applied to every compute host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDefaults {
    /// SSH user
    #[serde(default = "default_user")]
    pub user: String,
    /// SSH private key path, written as-is into the inventory
    #[serde(default = "default_ssh_key")]
    pub ssh_key: String,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            user: default_user(),
            ssh_key: default_ssh_key(),
            port: default_port(),
        }
    }
}

fn default_user() -> String {
    "ubuntu".to_string()
}

fn default_ssh_key() -> String {
    "~/.ssh/user1.pem".to_string()
}

fn default_port() -> String {
    "22".to_string()
}

// ============================================================================
// Inventory document
// ============================================================================

/// Group listing child groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentGroup {
    pub children: Vec<String>,
}

impl Default for ParentGroup {
    fn default() -> Self {
        Self {
            children: ResourceKind::ALL
                .iter()
                .map(|kind| kind.group_name().to_string())
                .collect(),
        }
    }
}

/// Group listing member hosts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostGroup {
    pub hosts: Vec<String>,
}

/// `_meta` section carrying per-host variables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub hostvars: HostMap,
}

/// Inventory in the shape expected by Ansible's `--list` protocol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub all: ParentGroup,
    pub ec2: HostGroup,
    pub rds: HostGroup,
    pub alb: HostGroup,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

impl InventoryDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group for a resource kind
    #[must_use]
    pub fn group(&self, kind: ResourceKind) -> &HostGroup {
        match kind {
            ResourceKind::Compute => &self.ec2,
            ResourceKind::Database => &self.rds,
            ResourceKind::LoadBalancer => &self.alb,
        }
    }

    fn group_mut(&mut self, kind: ResourceKind) -> &mut HostGroup {
        match kind {
            ResourceKind::Compute => &mut self.ec2,
            ResourceKind::Database => &mut self.rds,
            ResourceKind::LoadBalancer => &mut self.alb,
        }
    }

    /// Add a merged host map for one kind
    ///
    /// Group membership keeps the map's order. Host variables overwrite any
    /// record already stored under the same name by another kind.
    pub fn add_group(&mut self, kind: ResourceKind, hosts: HostMap) {
        let group = self.group_mut(kind);
        group.hosts = hosts.keys().cloned().collect();
        self.meta.hostvars.extend(hosts);
    }

    /// Host variables for a host
    #[must_use]
    pub fn hostvars(&self, name: &str) -> Option<&HostRecord> {
        self.meta.hostvars.get(name)
    }

    /// Total number of distinct hosts
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.meta.hostvars.len()
    }

    /// First load balancer DNS name and first database endpoint
    ///
    /// Walks host variables in insertion order. With more than one balancer
    /// or database the result depends on discovery order; there is no
    /// tie-break rule.
    #[must_use]
    pub fn primary_endpoints(&self) -> PrimaryEndpoints {
        let mut endpoints = PrimaryEndpoints::default();

        for record in self.meta.hostvars.values() {
            if endpoints.load_balancer_dns.is_none() {
                endpoints.load_balancer_dns = record.get_str(keys::LB_DNS).map(str::to_string);
            }
            if endpoints.database_endpoint.is_none() {
                endpoints.database_endpoint =
                    record.get_str(keys::RDS_ENDPOINT).map(str::to_string);
            }
            if endpoints.is_complete() {
                break;
            }
        }

        endpoints
    }
}

/// Endpoints exported by `--set-env`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryEndpoints {
    pub load_balancer_dns: Option<String>,
    pub database_endpoint: Option<String>,
}

impl PrimaryEndpoints {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.load_balancer_dns.is_some() && self.database_endpoint.is_some()
    }
}
