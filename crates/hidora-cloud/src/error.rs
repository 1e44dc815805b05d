//! Cloud provider error types

use thiserror::Error;

/// Enabled hardware node group offered as an alternative when a region is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCandidate {
    pub display_name: String,
    pub unique_name: String,
}

impl std::fmt::Display for RegionCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Region: {}, value: {}", self.display_name, self.unique_name)
    }
}

fn list_candidates(candidates: &[RegionCandidate]) -> String {
    if candidates.is_empty() {
        return "(none enabled)".to_string();
    }
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cloud provider errors
///
/// Every kind is terminal for the operation in progress.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("{summary}: {detail}")]
    InvalidFormat { summary: String, detail: String },

    #[error(
        "Wrong region selected: {requested}. Use one of these regions instead: {}",
        list_candidates(.candidates)
    )]
    InvalidRegion {
        requested: String,
        candidates: Vec<RegionCandidate>,
    },

    #[error(
        "Not enough nodes for replication: node group {node_group} has count {count} while high availability is enabled"
    )]
    InsufficientReplicas { node_group: String, count: u32 },

    #[error("{summary}: {detail}")]
    RemoteUnavailable { summary: String, detail: String },

    #[error("{summary} (result {code}): {detail}")]
    RemoteRejected {
        summary: String,
        detail: String,
        code: i64,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The platform created the environment; only the read-back failed
    #[error("Environment {name} was created but could not be read back: {source}")]
    ReadBackFailed {
        name: String,
        #[source]
        source: Box<CloudError>,
    },

    #[error("Unsupported change: {0}")]
    UnsupportedChange(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    pub fn invalid_format(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidFormat {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn unavailable(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn rejected(code: i64, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::RemoteRejected {
            summary: summary.into(),
            detail: detail.into(),
            code,
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse(detail.into())
    }

    /// Short, one-line summary for diagnostics
    pub fn summary(&self) -> String {
        match self {
            Self::InvalidFormat { summary, .. }
            | Self::RemoteUnavailable { summary, .. }
            | Self::RemoteRejected { summary, .. } => summary.clone(),
            Self::InvalidRegion { .. } => "Wrong region selected".to_string(),
            Self::InsufficientReplicas { .. } => {
                "Not enough computed nodes for replication".to_string()
            }
            Self::MalformedResponse(_) => "Malformed API response".to_string(),
            Self::ReadBackFailed { name, .. } => {
                format!("Environment {name} created but not read back")
            }
            Self::UnsupportedChange(_) => "Unsupported change".to_string(),
            Self::InvalidConfig(_) => "Invalid configuration".to_string(),
            Self::Json(_) => "JSON serialization failed".to_string(),
        }
    }

    /// Longer detail string for diagnostics
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidFormat { detail, .. }
            | Self::RemoteUnavailable { detail, .. }
            | Self::RemoteRejected { detail, .. } => detail.clone(),
            Self::InvalidRegion { candidates, .. } => format!(
                "Selected region unknown, please use one of these regions instead: {}",
                list_candidates(candidates)
            ),
            Self::InsufficientReplicas { node_group, .. } => format!(
                "High availability is enabled, count of node group {node_group} has to be greater than 1"
            ),
            Self::MalformedResponse(detail)
            | Self::UnsupportedChange(detail)
            | Self::InvalidConfig(detail) => detail.clone(),
            Self::ReadBackFailed { name, source } => format!("{name}: {source}"),
            Self::Json(e) => e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
