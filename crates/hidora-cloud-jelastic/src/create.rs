//! Environment creation
//!
//! Creation runs as a linear state machine:
//! `Init → Validated → RegionResolved → Submitted → Created`, with any
//! failure ending in `Failed`. No later step runs once one has failed.
//! Every local check runs in `Validated`, before the platform is contacted.

use crate::api::{CreateEnvironmentRequest, CreateEnvironmentResponse, CreateResult, describe};
use crate::builder;
use crate::provider::JelasticProvider;
use crate::validate::{validate_app_id, validate_replication, validate_short_domain};
use hidora_cloud::{CloudError, EnvironmentProjection, EnvironmentSpec, ReadMode, Result};
use serde_json::Value;

/// Result code for which the platform explains the rejection itself
pub const DETAILED_REJECTION_CODE: i64 = 2314;

const CREATE_FAILED: &str = "Unable to create environment";

/// Stage of one create operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStage {
    Init,
    Validated,
    RegionResolved,
    Submitted,
    Created,
    Failed,
}

impl std::fmt::Display for CreateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CreateStage::Init => "init",
            CreateStage::Validated => "validated",
            CreateStage::RegionResolved => "region_resolved",
            CreateStage::Submitted => "submitted",
            CreateStage::Created => "created",
            CreateStage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

impl CreateStage {
    /// Next stage on success; terminal stages have none
    pub fn successor(self) -> Option<CreateStage> {
        match self {
            CreateStage::Init => Some(CreateStage::Validated),
            CreateStage::Validated => Some(CreateStage::RegionResolved),
            CreateStage::RegionResolved => Some(CreateStage::Submitted),
            CreateStage::Submitted => Some(CreateStage::Created),
            CreateStage::Created | CreateStage::Failed => None,
        }
    }
}

fn advance(stage: &mut CreateStage, next: CreateStage) {
    tracing::info!(from = %stage, stage = %next, "Create stage");
    *stage = next;
}

fn step(stage: &mut CreateStage) {
    if let Some(next) = stage.successor() {
        advance(stage, next);
    }
}

/// Pick the create result out of either answer shape
pub fn create_result(response: &CreateEnvironmentResponse) -> Result<&CreateResult> {
    if let Some(result) = &response.response {
        return Ok(result);
    }
    match &response.envelope {
        Some(envelope) => {
            envelope.check(CREATE_FAILED)?;
            Err(CloudError::malformed(
                "createenvironment: response carries no create result",
            ))
        }
        None => Err(CloudError::malformed(
            "createenvironment: response carries no result",
        )),
    }
}

/// Map the create answer to the platform-assigned name
pub fn interpret_create_response(result: &CreateResult) -> Result<String> {
    match result.result {
        0 => match &result.name {
            Some(Value::String(name)) if !name.is_empty() => Ok(name.clone()),
            _ => Err(CloudError::malformed(
                "createenvironment: response carries no environment name",
            )),
        },
        DETAILED_REJECTION_CODE => Err(CloudError::rejected(
            DETAILED_REJECTION_CODE,
            CREATE_FAILED,
            describe(result.error.as_ref()).unwrap_or_default(),
        )),
        code => Err(CloudError::rejected(
            code,
            CREATE_FAILED,
            "Incorrect value in fields",
        )),
    }
}

impl JelasticProvider {
    /// Create an environment and return its full read-back
    pub async fn create_environment(&self, spec: &EnvironmentSpec) -> Result<EnvironmentProjection> {
        let mut stage = CreateStage::Init;
        let outcome = self.run_create(spec, &mut stage).await;
        if let Err(e) = &outcome {
            tracing::warn!(from = %stage, error = %e, "Environment creation failed");
            advance(&mut stage, CreateStage::Failed);
        }
        outcome
    }

    async fn run_create(
        &self,
        spec: &EnvironmentSpec,
        stage: &mut CreateStage,
    ) -> Result<EnvironmentProjection> {
        validate_app_id(&spec.application_id)?;
        validate_short_domain(&spec.short_domain)?;
        validate_replication(spec)?;
        step(stage);

        self.resolve_region(&spec.application_id, &spec.region).await?;
        step(stage);

        let payload = builder::build(spec)?;

        let request = CreateEnvironmentRequest {
            app_id: spec.application_id.clone(),
            env: payload.env,
            nodes: payload.nodes,
            action_key: spec.action().map(str::to_string),
            owner_uid: spec.owner(),
            env_group: spec.group().map(str::to_string),
        };
        step(stage);
        let response = self.send(&request).await?;
        let name = interpret_create_response(create_result(&response)?)?;
        step(stage);
        tracing::info!(env = %name, region = %spec.region, "Environment created");

        self.read_environment(&name, ReadMode::Full)
            .await
            .map_err(|e| {
                tracing::warn!(env = %name, error = %e, "Environment created but read-back failed");
                CloudError::ReadBackFailed {
                    name: name.clone(),
                    source: Box::new(e),
                }
            })
    }
}
