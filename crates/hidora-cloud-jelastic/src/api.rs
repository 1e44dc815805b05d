//! Operation registry and wire types of the platform control API
//!
//! Each remote operation is one `Operation` variant. Typed request structs
//! implement [`ApiRequest`], which ties a request to its operation and to
//! the record its JSON response decodes into.

use crate::client::ApiClient;
use hidora_cloud::{CloudError, Result};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Remote operations, addressed relative to the API base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SignIn,
    GetRegions,
    CreateEnvironment,
    GetEnvInfo,
    SetEnvGroup,
    Migrate,
    DeleteEnv,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::SignIn,
        Operation::GetRegions,
        Operation::CreateEnvironment,
        Operation::GetEnvInfo,
        Operation::SetEnvGroup,
        Operation::Migrate,
        Operation::DeleteEnv,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Operation::SignIn => "users/authentication/rest/signin",
            Operation::GetRegions => "environment/control/rest/getregions",
            Operation::CreateEnvironment => "environment/control/rest/createenvironment",
            Operation::GetEnvInfo => "environment/control/rest/getenvinfo",
            Operation::SetEnvGroup => "environment/control/rest/setenvgroup",
            Operation::Migrate => "environment/control/rest/migrate",
            Operation::DeleteEnv => "environment/control/rest/deleteenv",
        }
    }

    /// Sign-in is the only call made without a session
    pub fn requires_session(self) -> bool {
        !matches!(self, Operation::SignIn)
    }

    /// Parameters every request must carry, session excluded
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            Operation::SignIn => &["appid", "login", "password"],
            Operation::GetRegions => &["appid"],
            Operation::CreateEnvironment => &["appid", "env", "nodes"],
            Operation::GetEnvInfo => &["envName", "lazy"],
            Operation::SetEnvGroup => &["envName", "envGroup"],
            Operation::Migrate => &["envName", "hardwareNodeGroup", "isOnline"],
            Operation::DeleteEnv => &["envName"],
        }
    }

    pub fn optional_params(self) -> &'static [&'static str] {
        match self {
            Operation::CreateEnvironment => &["actionkey", "owneruid", "envgroups"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.path().rsplit('/').next().unwrap_or_default();
        write!(f, "{name}")
    }
}

/// Ordered form parameters of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when a value is present
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Typed contract of one remote operation
pub trait ApiRequest {
    const OPERATION: Operation;
    type Response: DeserializeOwned;

    /// Request parameters, session excluded
    fn params(&self) -> Params;
}

/// Send a typed request and decode its response
///
/// The session is appended for every operation that requires one.
pub async fn dispatch<R: ApiRequest + Sync>(
    client: &dyn ApiClient,
    request: &R,
    session: Option<&str>,
) -> Result<R::Response> {
    let operation = R::OPERATION;
    let mut params = request.params();
    if operation.requires_session() {
        let session = session.ok_or_else(|| {
            CloudError::InvalidConfig(format!("{operation} requires a session token"))
        })?;
        params.insert("session", session);
    }

    let value = client.call(operation, params).await?;
    decode(&value, &operation.to_string())
}

/// Decode a loosely-typed JSON tree into a typed record
pub(crate) fn decode<'a, T: Deserialize<'a>>(value: &'a Value, what: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| CloudError::malformed(format!("{what}: {e}")))
}

/// Render a remote error value the way it was sent
pub(crate) fn describe(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Result codes are integers but arrive as JSON numbers of either kind
fn result_code<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| number.as_f64().map(|f| f as i64))
        .ok_or_else(|| de::Error::custom(format!("result code {number} out of range")))
}

/// Common `{result, error}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ResultEnvelope {
    #[serde(deserialize_with = "result_code")]
    pub result: i64,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ResultEnvelope {
    /// Fail with `RemoteRejected` on a non-zero result
    pub fn check(&self, summary: &str) -> Result<()> {
        if self.result == 0 {
            return Ok(());
        }
        let detail = describe(self.error.as_ref())
            .unwrap_or_else(|| format!("API returned result {}", self.result));
        Err(CloudError::rejected(self.result, summary, detail))
    }
}

// ============ Sign-in ============

#[derive(Debug, Clone)]
pub struct SignInRequest {
    pub app_id: String,
    pub login: String,
    pub password: String,
}

impl ApiRequest for SignInRequest {
    const OPERATION: Operation = Operation::SignIn;
    type Response = SignInResponse;

    fn params(&self) -> Params {
        Params::new()
            .with("appid", &self.app_id)
            .with("login", &self.login)
            .with("password", &self.password)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(flatten)]
    pub envelope: ResultEnvelope,
    #[serde(default)]
    pub session: Option<String>,
}

// ============ Regions ============

#[derive(Debug, Clone)]
pub struct GetRegionsRequest {
    pub app_id: String,
}

impl ApiRequest for GetRegionsRequest {
    const OPERATION: Operation = Operation::GetRegions;
    type Response = RegionsResponse;

    fn params(&self) -> Params {
        Params::new().with("appid", &self.app_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionsResponse {
    #[serde(flatten)]
    pub envelope: ResultEnvelope,
    #[serde(default)]
    pub array: Option<Vec<RegionRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionRecord {
    #[serde(rename = "hardNodeGroups")]
    pub hard_node_groups: Vec<HardNodeGroupRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardNodeGroupRecord {
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<Value>,
}

impl HardNodeGroupRecord {
    /// Only a literal `true` enables a group
    pub fn enabled(&self) -> bool {
        matches!(self.is_enabled, Some(Value::Bool(true)))
    }
}

// ============ Create ============

#[derive(Debug, Clone)]
pub struct CreateEnvironmentRequest {
    pub app_id: String,
    /// Serialized environment settings
    pub env: String,
    /// Serialized node list
    pub nodes: String,
    pub action_key: Option<String>,
    pub owner_uid: Option<u64>,
    pub env_group: Option<String>,
}

impl ApiRequest for CreateEnvironmentRequest {
    const OPERATION: Operation = Operation::CreateEnvironment;
    type Response = CreateEnvironmentResponse;

    fn params(&self) -> Params {
        Params::new()
            .with("appid", &self.app_id)
            .with("env", &self.env)
            .with("nodes", &self.nodes)
            .with_opt("actionkey", self.action_key.as_deref())
            .with_opt("owneruid", self.owner_uid.map(|uid| uid.to_string()))
            .with_opt("envgroups", self.env_group.as_deref())
    }
}

/// Create answers nest their result under `response`; a rejection of
/// the call itself (an expired session) comes back as a top-level envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnvironmentResponse {
    #[serde(default)]
    pub response: Option<CreateResult>,
    #[serde(flatten)]
    pub envelope: Option<ResultEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResult {
    #[serde(deserialize_with = "result_code")]
    pub result: i64,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

// ============ Environment info ============

#[derive(Debug, Clone)]
pub struct GetEnvInfoRequest {
    pub name: String,
    pub lazy: bool,
}

impl ApiRequest for GetEnvInfoRequest {
    const OPERATION: Operation = Operation::GetEnvInfo;
    type Response = EnvInfoResponse;

    fn params(&self) -> Params {
        Params::new()
            .with("envName", &self.name)
            .with("lazy", self.lazy.to_string())
    }
}

/// Environment info is kept loosely typed; the flattener decodes each part
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvInfoResponse {
    #[serde(flatten)]
    pub envelope: ResultEnvelope,
    #[serde(default)]
    pub env: Option<Value>,
    #[serde(default)]
    pub env_groups: Option<Value>,
    #[serde(default)]
    pub nodes: Option<Value>,
    #[serde(default)]
    pub node_groups: Option<Value>,
}

// ============ Group / migrate / delete ============

#[derive(Debug, Clone)]
pub struct SetEnvGroupRequest {
    pub name: String,
    pub group: String,
}

impl ApiRequest for SetEnvGroupRequest {
    const OPERATION: Operation = Operation::SetEnvGroup;
    type Response = ResultEnvelope;

    fn params(&self) -> Params {
        Params::new()
            .with("envName", &self.name)
            .with("envGroup", &self.group)
    }
}

#[derive(Debug, Clone)]
pub struct MigrateRequest {
    pub name: String,
    pub hardware_node_group: String,
    pub online: bool,
}

impl ApiRequest for MigrateRequest {
    const OPERATION: Operation = Operation::Migrate;
    type Response = ResultEnvelope;

    fn params(&self) -> Params {
        Params::new()
            .with("envName", &self.name)
            .with("hardwareNodeGroup", &self.hardware_node_group)
            .with("isOnline", self.online.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteEnvRequest {
    pub name: String,
}

impl ApiRequest for DeleteEnvRequest {
    const OPERATION: Operation = Operation::DeleteEnv;
    type Response = ResultEnvelope;

    fn params(&self) -> Params {
        Params::new().with("envName", &self.name)
    }
}
