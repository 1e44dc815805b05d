//! Declarative environment model
//!
//! The desired state of one environment and its node definitions, as read
//! from a declarative document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application identity of the platform itself, used when no application id is given
pub const DEFAULT_APPLICATION_ID: &str = "1dd8d191d38fff45e62564fcf67fdcd6";

/// Desired state of one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSpec {
    /// Platform application identity (32 lowercase alphanumeric characters)
    #[serde(default = "default_application_id")]
    pub application_id: String,

    #[serde(default)]
    pub high_availability: bool,

    /// Unique name of an enabled hardware node group
    pub region: String,

    /// Immutable after creation; changing it forces a new environment
    pub short_domain: String,

    #[serde(default)]
    pub tls_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owning_user_id: Option<u64>,

    /// Only one group is modeled even though the platform reports a list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,

    /// One-shot token consumed at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_key: Option<String>,

    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

fn default_application_id() -> String {
    DEFAULT_APPLICATION_ID.to_string()
}

impl EnvironmentSpec {
    pub fn new(region: impl Into<String>, short_domain: impl Into<String>) -> Self {
        Self {
            application_id: default_application_id(),
            high_availability: false,
            region: region.into(),
            short_domain: short_domain.into(),
            tls_enabled: false,
            owning_user_id: None,
            group_name: None,
            action_key: None,
            nodes: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }

    /// Group name, if set and non-empty
    pub fn group(&self) -> Option<&str> {
        self.group_name.as_deref().filter(|g| !g.is_empty())
    }

    /// Action key, if set and non-empty
    pub fn action(&self) -> Option<&str> {
        self.action_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Owner uid, if set and non-zero
    pub fn owner(&self) -> Option<u64> {
        self.owning_user_id.filter(|uid| *uid != 0)
    }
}

/// Desired state of one node definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default)]
    pub command: String,

    #[serde(default = "default_replica_count")]
    pub replica_count: u32,

    #[serde(default)]
    pub disk_limit_mb: u32,

    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,

    #[serde(default, rename = "hasPublicIPv4")]
    pub has_public_ipv4: bool,

    #[serde(default, rename = "hasPublicIPv6")]
    pub has_public_ipv6: bool,

    #[serde(default = "default_fixed_compute_units")]
    pub fixed_compute_units: u32,

    #[serde(default = "default_flexible_compute_units")]
    pub flexible_compute_units: u32,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub image_tag: String,

    #[serde(default)]
    pub mission_role: String,

    pub node_group: String,

    pub node_type: String,

    #[serde(default = "default_restart_delay")]
    pub restart_delay_seconds: u32,

    #[serde(default = "default_scaling_mode")]
    pub scaling_mode: String,

    /// Accepted for compatibility; nothing populates it
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volume_mounts: BTreeMap<String, VolumeMount>,

    #[serde(default)]
    pub volumes: Vec<String>,

    #[serde(default)]
    pub volumes_from: Vec<String>,
}

fn default_replica_count() -> u32 {
    1
}

fn default_fixed_compute_units() -> u32 {
    1
}

fn default_flexible_compute_units() -> u32 {
    4
}

fn default_restart_delay() -> u32 {
    30
}

fn default_scaling_mode() -> String {
    "STATEFUL".to_string()
}

impl NodeSpec {
    pub fn new(node_group: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            command: String::new(),
            replica_count: default_replica_count(),
            disk_limit_mb: 0,
            environment_variables: BTreeMap::new(),
            has_public_ipv4: false,
            has_public_ipv6: false,
            fixed_compute_units: default_fixed_compute_units(),
            flexible_compute_units: default_flexible_compute_units(),
            image: String::new(),
            image_tag: String::new(),
            mission_role: String::new(),
            node_group: node_group.into(),
            node_type: node_type.into(),
            restart_delay_seconds: default_restart_delay(),
            scaling_mode: default_scaling_mode(),
            volume_mounts: BTreeMap::new(),
            volumes: Vec::new(),
            volumes_from: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>, tag: impl Into<String>) -> Self {
        self.image = image.into();
        self.image_tag = tag.into();
        self
    }

    pub fn with_replicas(mut self, count: u32) -> Self {
        self.replica_count = count;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }
}

/// Volume mount description of the create endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub protocol: String,
    #[serde(rename = "readonly")]
    pub read_only: bool,
    pub source_address_type: String,
    pub source_node_id: i64,
    pub source_node_group: String,
    pub source_path: String,
}
