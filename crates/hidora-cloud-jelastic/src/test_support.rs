//! Scripted API client and response fixtures for engine tests

use crate::api::{Operation, Params};
use crate::client::ApiClient;
use async_trait::async_trait;
use hidora_cloud::{CloudError, Result};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

enum Reply {
    Json(Value),
    Unreachable(String),
}

/// Records every call and answers from a queue of scripted replies
#[derive(Default)]
pub struct FakeApiClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Operation, Params)>>,
}

impl FakeApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Json(value));
        self
    }

    /// Script a transport failure
    pub fn unreachable(self, detail: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Unreachable(detail.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(Operation, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls().into_iter().map(|(op, _)| op).collect()
    }
}

#[async_trait]
impl ApiClient for FakeApiClient {
    async fn call(&self, operation: Operation, params: Params) -> Result<Value> {
        self.calls.lock().unwrap().push((operation, params));
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Unreachable(detail)) => Err(CloudError::unavailable(
                format!("Unable to reach {operation}"),
                detail,
            )),
            None => panic!("no scripted reply for {operation}"),
        }
    }
}

/// `getregions` answer with one region holding the given groups
pub fn regions(groups: &[(&str, &str, bool)]) -> Value {
    let groups: Vec<Value> = groups
        .iter()
        .map(|(unique, display, enabled)| {
            json!({"uniqueName": unique, "displayName": display, "isEnabled": enabled})
        })
        .collect();
    json!({"result": 0, "array": [{"hardNodeGroups": groups}]})
}

pub fn create_ok(name: &str) -> Value {
    json!({"response": {"result": 0, "name": name}})
}

pub fn create_failed(code: i64, error: &str) -> Value {
    json!({"response": {"result": code, "error": error}})
}

pub fn ok() -> Value {
    json!({"result": 0})
}

pub fn remote_env(short_domain: &str, region: &str) -> Value {
    json!({
        "appid": "0123456789abcdef0123456789abcdef",
        "createdOn": "2026-01-12 10:00:00",
        "domain": format!("{short_domain}.hidora.com"),
        "hardwareNodeGroup": region,
        "ishaenabled": false,
        "hostGroup": {"uniqueName": region, "displayName": "Geneva"},
        "region": "ignored",
        "shortdomain": short_domain,
        "sslstate": true,
        "ownerUid": 4711
    })
}

pub fn remote_node(node_group: &str) -> Value {
    json!({
        "customitem": {
            "dockerManifest": {
                "cmd": ["nginx", "-g", "daemon off;"],
                "env": ["MODE=prod", "DSN=postgres://u:p@db/app?sslmode=require"]
            },
            "dockerName": "nginx",
            "dockerTag": "1.27",
            "dockerVolumes": ["/data"],
            "dockerVolumesFrom": ["sqldb"]
        },
        "diskLimit": 2500,
        "extIPs": ["185.19.28.10"],
        "fixedCloudlets": 1,
        "flexibleCloudlets": 4,
        "nodemission": "cp",
        "nodeGroup": node_group,
        "nodeType": "docker"
    })
}

/// Full `getenvinfo` answer with one `cp` node
pub fn env_info(short_domain: &str, region: &str) -> Value {
    json!({
        "result": 0,
        "env": remote_env(short_domain, region),
        "envGroups": ["production", "web"],
        "nodes": [remote_node("cp")],
        "nodeGroups": [
            {"name": "cp", "restartNodeDelay": 30, "scalingMode": "STATEFUL"},
            {"name": "sqldb", "restartNodeDelay": 10, "scalingMode": "STATELESS"}
        ]
    })
}
