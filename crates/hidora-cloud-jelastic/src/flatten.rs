//! Read-back flattening
//!
//! `getenvinfo` answers with a nested, loosely-typed document. Each part is
//! decoded into a typed record at this boundary; a missing key or a value of
//! the wrong JSON type becomes `MalformedResponse` instead of a panic.

use crate::api::{EnvInfoResponse, decode};
use hidora_cloud::{
    CloudError, EnvironmentProjection, EnvironmentState, NodeState, ReadMode, Result,
};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Remote values are reported in KB, the declarative side counts MB
const DISK_LIMIT_DIVISOR: u64 = 1000;

/// Integral counters may arrive as JSON floats
fn whole<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_u64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f >= 0.0 && f.is_finite() => Ok(f as u64),
        _ => Err(de::Error::custom(format!("{number} is not a positive count"))),
    }
}

fn narrow(value: u64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| CloudError::malformed(format!("{field} {value} out of range")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteEnvironment {
    appid: String,
    created_on: String,
    domain: String,
    hardware_node_group: String,
    ishaenabled: bool,
    host_group: RemoteHostGroup,
    shortdomain: String,
    sslstate: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteHostGroup {
    unique_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteOwner {
    #[serde(default)]
    owner_uid: Option<f64>,
    /// Lazy reads report the owner under this key
    #[serde(default)]
    uid: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteNode {
    customitem: RemoteCustomItem,
    #[serde(deserialize_with = "whole")]
    disk_limit: u64,
    #[serde(rename = "extIPs", default)]
    ext_ips: Option<Vec<String>>,
    #[serde(deserialize_with = "whole")]
    fixed_cloudlets: u64,
    #[serde(deserialize_with = "whole")]
    flexible_cloudlets: u64,
    nodemission: String,
    node_group: String,
    node_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCustomItem {
    docker_manifest: RemoteManifest,
    docker_name: String,
    docker_tag: String,
    docker_volumes: Vec<String>,
    docker_volumes_from: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteManifest {
    #[serde(default)]
    cmd: Vec<String>,
    env: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteNodeGroup {
    #[serde(deserialize_with = "whole")]
    restart_node_delay: u64,
    scaling_mode: String,
}

/// Flatten the `env` object
///
/// The region is the host group's unique name, not the top-level `region` key.
pub fn flatten_environment(env: &Value) -> Result<EnvironmentState> {
    let remote: RemoteEnvironment = decode(env, "getenvinfo env")?;
    Ok(EnvironmentState {
        application_id: remote.appid,
        created_on: remote.created_on,
        domain: remote.domain,
        hardware_node_group: remote.hardware_node_group,
        high_availability: remote.ishaenabled,
        region: remote.host_group.unique_name,
        short_domain: remote.shortdomain,
        tls_enabled: remote.sslstate,
    })
}

/// Owner uid of the environment, when reported
pub fn owner_uid(env: &Value) -> Result<Option<u64>> {
    let owner: RemoteOwner = decode(env, "getenvinfo env owner")?;
    Ok(owner
        .owner_uid
        .or(owner.uid)
        .filter(|uid| *uid > 0.0 && uid.is_finite())
        .map(|uid| uid as u64))
}

/// Split `KEY=VALUE` strings on the first `=`
pub fn parse_env_vars(entries: &[String]) -> Result<BTreeMap<String, String>> {
    entries
        .iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    CloudError::malformed(format!(
                        "environment variable {entry:?} is not of the form KEY=VALUE"
                    ))
                })
        })
        .collect()
}

/// Returns `(has_ipv4, has_ipv6)`
///
/// Any IPv4 address sets the first flag and any IPv6 address the second.
/// IPv4-mapped IPv6 addresses count as IPv4.
pub fn classify_ips(addresses: &[String]) -> (bool, bool) {
    let mut v4 = false;
    let mut v6 = false;
    for address in addresses {
        match address.trim().parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => v4 = true,
            Ok(IpAddr::V6(ip)) if ip.to_ipv4_mapped().is_some() => v4 = true,
            Ok(IpAddr::V6(_)) => v6 = true,
            Err(_) => tracing::warn!(%address, "Skipping unparsable external IP"),
        }
    }
    (v4, v6)
}

fn flatten_node(node: &Value, node_groups: &[Value]) -> Result<NodeState> {
    let remote: RemoteNode = decode(node, "getenvinfo node")?;
    let item = remote.customitem;

    let (has_public_ipv4, has_public_ipv6) = match &remote.ext_ips {
        Some(addresses) => classify_ips(addresses),
        None => (false, false),
    };

    let mut state = NodeState {
        command: item.docker_manifest.cmd.into_iter().next().unwrap_or_default(),
        disk_limit_mb: narrow(remote.disk_limit / DISK_LIMIT_DIVISOR, "diskLimit")?,
        environment_variables: parse_env_vars(&item.docker_manifest.env)?,
        has_public_ipv4,
        has_public_ipv6,
        fixed_compute_units: narrow(remote.fixed_cloudlets, "fixedCloudlets")?,
        flexible_compute_units: narrow(remote.flexible_cloudlets, "flexibleCloudlets")?,
        image: item.docker_name,
        image_tag: item.docker_tag,
        mission_role: remote.nodemission,
        node_group: remote.node_group,
        node_type: remote.node_type,
        restart_delay_seconds: None,
        scaling_mode: None,
        volumes: item.docker_volumes,
        volumes_from: item.docker_volumes_from,
    };

    // Unmatched node groups leave both fields unset; the last duplicate wins
    let matched = node_groups
        .iter()
        .rev()
        .find(|group| group.get("name").and_then(Value::as_str) == Some(state.node_group.as_str()));
    if let Some(group) = matched {
        let group: RemoteNodeGroup = decode(group, "getenvinfo nodeGroup")?;
        state.restart_delay_seconds = Some(narrow(group.restart_node_delay, "restartNodeDelay")?);
        state.scaling_mode = Some(group.scaling_mode);
    }

    Ok(state)
}

/// Flatten every node and join it to its node group record
pub fn flatten_nodes(nodes: &Value, node_groups: &Value) -> Result<Vec<NodeState>> {
    let nodes: Vec<Value> = decode(nodes, "getenvinfo nodes")?;
    let node_groups: Vec<Value> = decode(node_groups, "getenvinfo nodeGroups")?;
    nodes
        .iter()
        .map(|node| flatten_node(node, &node_groups))
        .collect()
}

/// Only the first remote group is modeled
pub fn first_group(env_groups: &Value) -> Result<Option<String>> {
    let groups: Vec<String> = decode(env_groups, "getenvinfo envGroups")?;
    Ok(groups.into_iter().next())
}

fn required<'a>(value: &'a Option<Value>, key: &str) -> Result<&'a Value> {
    value
        .as_ref()
        .ok_or_else(|| CloudError::malformed(format!("getenvinfo: response carries no {key}")))
}

/// Build the projection of one `getenvinfo` answer
pub fn flatten(response: &EnvInfoResponse, name: &str, mode: ReadMode) -> Result<EnvironmentProjection> {
    let env = required(&response.env, "env")?;
    let mut projection = EnvironmentProjection {
        name: name.to_string(),
        environment: flatten_environment(env)?,
        nodes: Vec::new(),
        owning_user_id: owner_uid(env)?,
        group_name: None,
    };

    if !mode.is_lazy() {
        projection.nodes = flatten_nodes(
            required(&response.nodes, "nodes")?,
            required(&response.node_groups, "nodeGroups")?,
        )?;
        projection.group_name = first_group(required(&response.env_groups, "envGroups")?)?;
    }

    Ok(projection)
}
