//! Environment provider trait definition

use crate::action::UpdatePlan;
use crate::error::Result;
use crate::model::EnvironmentSpec;
use crate::state::EnvironmentProjection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Environment provider abstraction trait
///
/// A provider owns the full lifecycle of one kind of remote environment.
/// Every method is terminal on the first error: nothing is retried and no
/// identity or state is produced by a failed call.
#[async_trait]
pub trait EnvironmentProvider: Send + Sync {
    /// Returns the provider name (e.g., "jelastic")
    fn name(&self) -> &str;

    /// Create the environment and return its read-back projection
    ///
    /// The projection's `name` is the identity assigned by the platform.
    async fn create(&self, spec: &EnvironmentSpec) -> Result<EnvironmentProjection>;

    /// Read the current state of an existing environment
    async fn read(&self, name: &str, mode: ReadMode) -> Result<EnvironmentProjection>;

    /// Apply the fields that changed between `prior` and `desired`
    async fn update(
        &self,
        name: &str,
        prior: &EnvironmentSpec,
        desired: &EnvironmentSpec,
    ) -> Result<EnvironmentProjection>;

    /// Delete the environment
    async fn delete(&self, name: &str) -> Result<()>;

    /// Compute the update plan without applying it
    fn plan(&self, prior: &EnvironmentSpec, desired: &EnvironmentSpec) -> UpdatePlan {
        UpdatePlan::between(prior, desired)
    }
}

/// How much of the remote environment to fetch on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Environment, nodes, node groups and env groups
    #[default]
    Full,
    /// Environment record only
    Lazy,
}

impl ReadMode {
    pub fn is_lazy(self) -> bool {
        matches!(self, ReadMode::Lazy)
    }
}

impl std::fmt::Display for ReadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadMode::Full => write!(f, "full"),
            ReadMode::Lazy => write!(f, "lazy"),
        }
    }
}
