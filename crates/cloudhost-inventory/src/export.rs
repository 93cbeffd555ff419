//! Shell export rendering for `--set-env`

use crate::types::PrimaryEndpoints;

/// Variable holding the first load balancer DNS name
pub const ALB_DNS_VAR: &str = "ALB_DNS";
/// Variable holding the first database endpoint
pub const RDS_ENDPOINT_VAR: &str = "RDS_ENDPOINT";

/// POSIX shell script exporting the primary endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvExport {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvExport {
    #[must_use]
    pub fn from_endpoints(endpoints: &PrimaryEndpoints) -> Self {
        Self {
            vars: vec![
                (ALB_DNS_VAR, endpoints.load_balancer_dns.clone()),
                (RDS_ENDPOINT_VAR, endpoints.database_endpoint.clone()),
            ],
        }
    }

    /// Names of variables with no value in the inventory
    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.vars
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
    }

    /// Render the script text
    #[must_use]
    pub fn render(&self) -> String {
        let mut script = String::from("#!/bin/sh\n# Generated by cloudhost\n");

        for (name, value) in &self.vars {
            let line = match value {
                Some(value) => format!("export {name}=\"{}\"\n", shell_escape(value)),
                None => format!("# {name} not found in inventory\n"),
            };
            script.push_str(&line);
        }

        script
    }
}

/// Escape a value for use inside double quotes
fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
