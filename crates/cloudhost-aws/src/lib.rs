//! cloudhost-aws: AWS backend for cloudhost inventory
//!
//! Implements [`CloudApi`](cloudhost_inventory::CloudApi) over EC2, RDS and
//! ELBv2 using the official AWS SDK.

pub mod client;
pub mod convert;

pub use client::AwsCloud;
