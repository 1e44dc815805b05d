//! Hidora Cloud environments
//!
//! This crate provides the declarative environment model and the provider
//! abstraction used to reconcile it against a remote platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  hidora CLI                      │
//! │        (create / show / update / delete)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 hidora-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Provider Abstraction             │   │
//! │  │  trait EnvironmentProvider { ... }        │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Spec Model  │  │  Projection  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────────────┐
//! │ hidora-cloud-jelastic │
//! │   provider            │
//! └───────────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;

// Re-exports
pub use action::{FieldChange, PlanSummary, UpdatePlan};
pub use error::{CloudError, RegionCandidate, Result};
pub use model::{DEFAULT_APPLICATION_ID, EnvironmentSpec, NodeSpec, VolumeMount};
pub use provider::{EnvironmentProvider, ReadMode};
pub use state::{EnvironmentProjection, EnvironmentState, NodeState};
