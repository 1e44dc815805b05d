//! Create request payloads
//!
//! Translates the declarative spec into the environment settings object
//! and node array expected by `createenvironment`.

use hidora_cloud::{EnvironmentSpec, NodeSpec, Result, VolumeMount};
use serde::Serialize;
use std::collections::BTreeMap;

/// Environment settings object
#[derive(Debug, Clone, Serialize)]
pub struct EnvSettings<'a> {
    pub ishaenabled: bool,
    pub region: &'a str,
    pub shortdomain: &'a str,
    pub sslstate: bool,
}

/// One entry of the node array
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload<'a> {
    pub cmd: &'a str,
    pub count: u32,
    pub disk_limit: u32,
    pub env: &'a BTreeMap<String, String>,
    pub extip: bool,
    pub extipv6: bool,
    pub fixed_cloudlets: u32,
    pub flexible_cloudlets: u32,
    pub image: &'a str,
    pub mission: &'a str,
    pub node_group: &'a str,
    pub node_type: &'a str,
    pub restart_delay: u32,
    pub scaling_mode: &'a str,
    pub tag: &'a str,
    #[serde(skip_serializing_if = "no_mounts")]
    pub volume_mounts: &'a BTreeMap<String, VolumeMount>,
    pub volumes: &'a [String],
    pub volumes_from: &'a [String],
}

fn no_mounts(mounts: &&BTreeMap<String, VolumeMount>) -> bool {
    mounts.is_empty()
}

/// Serialized create documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePayload {
    pub env: String,
    pub nodes: String,
}

pub fn env_settings(spec: &EnvironmentSpec) -> EnvSettings<'_> {
    EnvSettings {
        ishaenabled: spec.high_availability,
        region: &spec.region,
        shortdomain: &spec.short_domain,
        sslstate: spec.tls_enabled,
    }
}

pub fn node_payload(node: &NodeSpec) -> NodePayload<'_> {
    NodePayload {
        cmd: &node.command,
        count: node.replica_count,
        disk_limit: node.disk_limit_mb,
        env: &node.environment_variables,
        extip: node.has_public_ipv4,
        extipv6: node.has_public_ipv6,
        fixed_cloudlets: node.fixed_compute_units,
        flexible_cloudlets: node.flexible_compute_units,
        image: &node.image,
        mission: &node.mission_role,
        node_group: &node.node_group,
        node_type: &node.node_type,
        restart_delay: node.restart_delay_seconds,
        scaling_mode: &node.scaling_mode,
        tag: &node.image_tag,
        volume_mounts: &node.volume_mounts,
        volumes: &node.volumes,
        volumes_from: &node.volumes_from,
    }
}

pub fn build(spec: &EnvironmentSpec) -> Result<CreatePayload> {
    let nodes: Vec<NodePayload<'_>> = spec.nodes.iter().map(node_payload).collect();
    Ok(CreatePayload {
        env: serde_json::to_string(&env_settings(spec))?,
        nodes: serde_json::to_string(&nodes)?,
    })
}
