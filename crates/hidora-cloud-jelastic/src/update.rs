//! Field-to-operation routing for updates
//!
//! | field              | operation     |
//! |--------------------|---------------|
//! | `groupName`        | `setenvgroup` |
//! | `region`           | `migrate`     |
//! | `highAvailability` | unsupported   |
//! | `tlsEnabled`       | unsupported   |
//! | `shortDomain`      | replacement   |
//!
//! Every change is routed before the first call goes out, so an
//! unsupported change never leaves the environment half-updated. Routed
//! calls then run one after another and stop at the first failure; there
//! is no rollback of calls that already succeeded.

use crate::api::{MigrateRequest, Operation, SetEnvGroupRequest};
use crate::provider::JelasticProvider;
use hidora_cloud::{
    CloudError, EnvironmentProjection, EnvironmentSpec, FieldChange, ReadMode, Result, UpdatePlan,
};

/// Remote call a changed field maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutedCall<'a> {
    SetEnvGroup(&'a str),
    /// Target hardware node group; not checked against the region list
    Migrate(&'a str),
}

impl RoutedCall<'_> {
    pub fn operation(&self) -> Operation {
        match self {
            RoutedCall::SetEnvGroup(_) => Operation::SetEnvGroup,
            RoutedCall::Migrate(_) => Operation::Migrate,
        }
    }
}

pub fn route(change: &FieldChange) -> Result<RoutedCall<'_>> {
    match change {
        FieldChange::GroupName { to, .. } => Ok(RoutedCall::SetEnvGroup(
            to.as_deref().unwrap_or_default(),
        )),
        FieldChange::Region { to, .. } => Ok(RoutedCall::Migrate(to)),
        FieldChange::HighAvailability { .. } | FieldChange::TlsEnabled { .. } => Err(
            CloudError::UnsupportedChange(format!("{change}: no remote operation applies this field")),
        ),
        FieldChange::ShortDomain { .. } => Err(CloudError::UnsupportedChange(format!(
            "{change}: the short domain is fixed, recreate the environment instead"
        ))),
    }
}

impl JelasticProvider {
    /// Issue the routed calls of `plan` in order; returns the operations issued
    pub async fn apply_plan(&self, name: &str, plan: &UpdatePlan) -> Result<Vec<Operation>> {
        let calls = plan
            .changes
            .iter()
            .map(route)
            .collect::<Result<Vec<_>>>()?;

        if plan.nodes_changed {
            tracing::warn!(env = name, "Node definitions changed; nodes are not updated in place");
        }

        let mut issued = Vec::with_capacity(calls.len());
        for call in calls {
            match call {
                RoutedCall::SetEnvGroup(group) => {
                    let request = SetEnvGroupRequest {
                        name: name.to_string(),
                        group: group.to_string(),
                    };
                    self.send(&request)
                        .await?
                        .check("Unable to set an environment group")?;
                    tracing::info!(env = name, group, "Environment group set");
                }
                RoutedCall::Migrate(target) => {
                    let request = MigrateRequest {
                        name: name.to_string(),
                        hardware_node_group: target.to_string(),
                        online: true,
                    };
                    self.send(&request)
                        .await?
                        .check("Unable to migrate environment")?;
                    tracing::info!(env = name, to = target, "Environment migrated");
                }
            }
            issued.push(call.operation());
        }

        Ok(issued)
    }

    /// Apply the changes between `prior` and `desired`, then read the environment back
    pub async fn update_environment(
        &self,
        name: &str,
        prior: &EnvironmentSpec,
        desired: &EnvironmentSpec,
    ) -> Result<EnvironmentProjection> {
        let plan = UpdatePlan::between(prior, desired);
        let issued = self.apply_plan(name, &plan).await?;
        tracing::debug!(env = name, calls = issued.len(), "Update applied");
        self.read_environment(name, ReadMode::Full).await
    }
}
