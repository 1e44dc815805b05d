//! Jelastic provider for Hidora
//!
//! This crate implements [`EnvironmentProvider`](hidora_cloud::EnvironmentProvider)
//! against the Jelastic-style RPC control API: every operation is a
//! form-encoded POST under `https://{host}/1.0/` answered with JSON.
//!
//! # Features
//!
//! - Region resolution against the enabled hardware node groups
//! - Environment creation with local validation and full read-back
//! - Field-level updates (`setenvgroup`, `migrate`)
//! - Deletion
//!
//! # Requirements
//!
//! - `JELASTIC_HOST`, plus either `JELASTIC_USERNAME` / `JELASTIC_PASSWORD`
//!   or `JELASTIC_TOKEN`
//!
//! # Example
//!
//! ```ignore
//! use hidora_cloud::{EnvironmentProvider, EnvironmentSpec, NodeSpec, ReadMode};
//! use hidora_cloud_jelastic::{JelasticProvider, ProviderConfig};
//!
//! let config = ProviderConfig::from_env()?;
//! let provider = JelasticProvider::connect(&config).await?;
//!
//! let spec = EnvironmentSpec::new("ch-gva-1", "my-env")
//!     .with_node(NodeSpec::new("cp", "docker").with_image("nginx", "1.27"));
//! let created = provider.create(&spec).await?;
//!
//! let current = provider.read(&created.name, ReadMode::Lazy).await?;
//! provider.delete(&current.name).await?;
//! ```

pub mod api;
pub mod builder;
pub mod client;
pub mod config;
pub mod create;
pub mod credentials;
pub mod delete;
pub mod flatten;
pub mod provider;
pub mod region;
pub mod update;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use api::{ApiRequest, Operation, Params};
pub use client::{ApiClient, HttpApiClient};
pub use config::ProviderConfig;
pub use create::CreateStage;
pub use credentials::{CredentialProvider, StaticToken, sign_in};
pub use provider::JelasticProvider;
pub use region::HardwareNodeGroup;
pub use update::RoutedCall;
