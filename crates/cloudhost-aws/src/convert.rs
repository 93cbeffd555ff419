//! Conversions from AWS SDK shapes to inventory resources

use aws_sdk_ec2::types::Instance;
use aws_sdk_elasticloadbalancingv2::types::LoadBalancer as SdkLoadBalancer;
use aws_sdk_rds::types::DbInstance;
use cloudhost_inventory::{ComputeInstance, DatabaseInstance, LoadBalancer};

/// EC2 instance to compute instance
#[must_use]
pub fn compute_instance(instance: &Instance) -> ComputeInstance {
    let tags = instance
        .tags()
        .iter()
        .filter_map(|tag| Some((tag.key()?.to_string(), tag.value()?.to_string())))
        .collect();

    ComputeInstance {
        id: instance.instance_id().unwrap_or_default().to_string(),
        tags,
        public_ip: instance.public_ip_address().map(str::to_string),
        private_ip: instance.private_ip_address().map(str::to_string),
        image_id: instance.image_id().map(str::to_string),
    }
}

/// RDS instance to database instance
#[must_use]
pub fn database_instance(db: &DbInstance) -> DatabaseInstance {
    let endpoint = db.endpoint();

    DatabaseInstance {
        identifier: db.db_instance_identifier().unwrap_or_default().to_string(),
        endpoint: endpoint.and_then(|e| e.address()).map(str::to_string),
        port: endpoint.and_then(|e| e.port()),
    }
}

/// ELBv2 load balancer to load balancer
#[must_use]
pub fn load_balancer(lb: &SdkLoadBalancer) -> LoadBalancer {
    LoadBalancer {
        name: lb.load_balancer_name().unwrap_or_default().to_string(),
        dns_name: lb.dns_name().map(str::to_string),
        lb_type: lb.r#type().map(|t| t.as_str().to_string()),
    }
}
