//! Field-level change detection between two environment specs

use crate::model::EnvironmentSpec;
use serde::{Deserialize, Serialize};

/// A single tracked field that differs between last observed and desired state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FieldChange {
    GroupName {
        from: Option<String>,
        to: Option<String>,
    },
    Region {
        from: String,
        to: String,
    },
    HighAvailability {
        from: bool,
        to: bool,
    },
    TlsEnabled {
        from: bool,
        to: bool,
    },
    ShortDomain {
        from: String,
        to: String,
    },
}

impl FieldChange {
    /// Declarative field name
    pub fn field(&self) -> &'static str {
        match self {
            FieldChange::GroupName { .. } => "groupName",
            FieldChange::Region { .. } => "region",
            FieldChange::HighAvailability { .. } => "highAvailability",
            FieldChange::TlsEnabled { .. } => "tlsEnabled",
            FieldChange::ShortDomain { .. } => "shortDomain",
        }
    }

    /// Whether applying this change means replacing the environment
    pub fn forces_replacement(&self) -> bool {
        matches!(self, FieldChange::ShortDomain { .. })
    }
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldChange::GroupName { from, to } => write!(
                f,
                "groupName: {} -> {}",
                from.as_deref().unwrap_or("(none)"),
                to.as_deref().unwrap_or("(none)")
            ),
            FieldChange::Region { from, to } | FieldChange::ShortDomain { from, to } => {
                write!(f, "{}: {} -> {}", self.field(), from, to)
            }
            FieldChange::HighAvailability { from, to } | FieldChange::TlsEnabled { from, to } => {
                write!(f, "{}: {} -> {}", self.field(), from, to)
            }
        }
    }
}

/// Ordered set of changes for one environment
///
/// Order follows the routing table: group, region, then the fields that
/// have no remote operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub changes: Vec<FieldChange>,

    /// Node definitions differ; nodes are not updated in place
    pub nodes_changed: bool,
}

impl UpdatePlan {
    pub fn between(prior: &EnvironmentSpec, desired: &EnvironmentSpec) -> Self {
        let mut changes = Vec::new();

        if prior.group() != desired.group() {
            changes.push(FieldChange::GroupName {
                from: prior.group().map(str::to_string),
                to: desired.group().map(str::to_string),
            });
        }
        if prior.region != desired.region {
            changes.push(FieldChange::Region {
                from: prior.region.clone(),
                to: desired.region.clone(),
            });
        }
        if prior.high_availability != desired.high_availability {
            changes.push(FieldChange::HighAvailability {
                from: prior.high_availability,
                to: desired.high_availability,
            });
        }
        if prior.tls_enabled != desired.tls_enabled {
            changes.push(FieldChange::TlsEnabled {
                from: prior.tls_enabled,
                to: desired.tls_enabled,
            });
        }
        if prior.short_domain != desired.short_domain {
            changes.push(FieldChange::ShortDomain {
                from: prior.short_domain.clone(),
                to: desired.short_domain.clone(),
            });
        }

        Self {
            changes,
            nodes_changed: prior.nodes != desired.nodes,
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.field() == field)
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            fields: self.changes.iter().map(FieldChange::field).collect(),
            replacement: self.changes.iter().any(FieldChange::forces_replacement),
            nodes_changed: self.nodes_changed,
        }
    }
}

/// Summary of planned changes
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub fields: Vec<&'static str>,
    pub replacement: bool,
    pub nodes_changed: bool,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fields.is_empty() {
            write!(f, "no changes")?;
        } else {
            write!(
                f,
                "{} field(s) to update: {}",
                self.fields.len(),
                self.fields.join(", ")
            )?;
        }
        if self.replacement {
            write!(f, " (forces replacement)")?;
        }
        if self.nodes_changed {
            write!(f, ", node changes ignored")?;
        }
        Ok(())
    }
}
