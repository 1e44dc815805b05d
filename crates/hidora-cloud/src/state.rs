//! Read-back projection of remote environment state
//!
//! These records are regenerated from the platform after every successful
//! remote call. They are never cached or written back as-is.

use crate::model::{EnvironmentSpec, NodeSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full read-only view of one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentProjection {
    /// External identity assigned by the platform
    pub name: String,

    pub environment: EnvironmentState,

    /// Empty for lazy read-backs
    #[serde(default)]
    pub nodes: Vec<NodeState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owning_user_id: Option<u64>,

    /// First entry of the remote group list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

/// Flattened environment attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentState {
    pub application_id: String,
    pub created_on: String,
    pub domain: String,
    pub hardware_node_group: String,
    pub high_availability: bool,
    /// Unique name of the host group the environment runs on
    pub region: String,
    pub short_domain: String,
    pub tls_enabled: bool,
}

/// Flattened node attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    pub command: String,
    pub disk_limit_mb: u32,
    pub environment_variables: BTreeMap<String, String>,
    #[serde(rename = "hasPublicIPv4")]
    pub has_public_ipv4: bool,
    #[serde(rename = "hasPublicIPv6")]
    pub has_public_ipv6: bool,
    pub fixed_compute_units: u32,
    pub flexible_compute_units: u32,
    pub image: String,
    pub image_tag: String,
    pub mission_role: String,
    pub node_group: String,
    pub node_type: String,
    /// Unset when no node group record matched
    pub restart_delay_seconds: Option<u32>,
    pub scaling_mode: Option<String>,
    pub volumes: Vec<String>,
    pub volumes_from: Vec<String>,
}

impl EnvironmentProjection {
    /// Rebuild a declarative spec from the observed state
    ///
    /// Used as the "last observed" side when routing updates. Fields the
    /// platform does not report back (action key, replica count) keep
    /// their declarative defaults.
    pub fn to_spec(&self) -> EnvironmentSpec {
        let env = &self.environment;
        let mut spec = EnvironmentSpec::new(env.region.clone(), env.short_domain.clone());
        spec.application_id = env.application_id.clone();
        spec.high_availability = env.high_availability;
        spec.tls_enabled = env.tls_enabled;
        spec.owning_user_id = self.owning_user_id;
        spec.group_name = self.group_name.clone();
        spec.nodes = self.nodes.iter().map(NodeState::to_spec).collect();
        spec
    }
}

impl NodeState {
    pub fn to_spec(&self) -> NodeSpec {
        let mut node = NodeSpec::new(self.node_group.clone(), self.node_type.clone());
        node.command = self.command.clone();
        node.disk_limit_mb = self.disk_limit_mb;
        node.environment_variables = self.environment_variables.clone();
        node.has_public_ipv4 = self.has_public_ipv4;
        node.has_public_ipv6 = self.has_public_ipv6;
        node.fixed_compute_units = self.fixed_compute_units;
        node.flexible_compute_units = self.flexible_compute_units;
        node.image = self.image.clone();
        node.image_tag = self.image_tag.clone();
        node.mission_role = self.mission_role.clone();
        if let Some(delay) = self.restart_delay_seconds {
            node.restart_delay_seconds = delay;
        }
        if let Some(mode) = &self.scaling_mode {
            node.scaling_mode = mode.clone();
        }
        node.volumes = self.volumes.clone();
        node.volumes_from = self.volumes_from.clone();
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_projection() -> EnvironmentProjection {
        EnvironmentProjection {
            name: "my-env".to_string(),
            environment: EnvironmentState {
                application_id: "0123456789abcdef0123456789abcdef".to_string(),
                created_on: "2026-01-12T10:00:00Z".to_string(),
                domain: "my-env.hidora.com".to_string(),
                hardware_node_group: "ch-gva-1".to_string(),
                high_availability: true,
                region: "ch-gva-1".to_string(),
                short_domain: "my-env".to_string(),
                tls_enabled: true,
            },
            nodes: vec![NodeState {
                command: "nginx -g daemon off;".to_string(),
                disk_limit_mb: 10,
                environment_variables: BTreeMap::from([(
                    "MODE".to_string(),
                    "prod".to_string(),
                )]),
                has_public_ipv4: true,
                has_public_ipv6: false,
                fixed_compute_units: 2,
                flexible_compute_units: 8,
                image: "nginx".to_string(),
                image_tag: "1.27".to_string(),
                mission_role: "cp".to_string(),
                node_group: "cp".to_string(),
                node_type: "docker".to_string(),
                restart_delay_seconds: None,
                scaling_mode: Some("STATELESS".to_string()),
                volumes: vec!["/data".to_string()],
                volumes_from: Vec::new(),
            }],
            owning_user_id: Some(42),
            group_name: Some("production".to_string()),
        }
    }

    #[test]
    fn test_to_spec_carries_environment_fields() {
        let spec = sample_projection().to_spec();
        assert_eq!(spec.region, "ch-gva-1");
        assert_eq!(spec.short_domain, "my-env");
        assert!(spec.high_availability);
        assert!(spec.tls_enabled);
        assert_eq!(spec.owning_user_id, Some(42));
        assert_eq!(spec.group_name.as_deref(), Some("production"));
        assert_eq!(spec.action_key, None);
    }

    #[test]
    fn test_to_spec_keeps_defaults_for_unmatched_node_group() {
        let spec = sample_projection().to_spec();
        let node = &spec.nodes[0];
        assert_eq!(node.restart_delay_seconds, 30);
        assert_eq!(node.scaling_mode, "STATELESS");
        assert_eq!(node.environment_variables["MODE"], "prod");
    }
}
