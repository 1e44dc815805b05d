//! Jelastic provider implementation

use crate::api::{ApiRequest, GetEnvInfoRequest, dispatch};
use crate::client::{ApiClient, HttpApiClient};
use crate::config::ProviderConfig;
use crate::credentials::{self, CredentialProvider, StaticToken};
use crate::flatten;
use async_trait::async_trait;
use hidora_cloud::{
    EnvironmentProjection, EnvironmentProvider, EnvironmentSpec, ReadMode, Result,
};
use std::sync::Arc;

/// Environment provider backed by the platform control API
///
/// Calls are issued one at a time; nothing is cached between calls.
pub struct JelasticProvider {
    client: Arc<dyn ApiClient>,
    credentials: Arc<dyn CredentialProvider>,
}

impl JelasticProvider {
    pub fn new(client: Arc<dyn ApiClient>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Provider using a fixed access token
    pub fn with_token(client: Arc<dyn ApiClient>, token: &str) -> Result<Self> {
        Ok(Self::new(client, Arc::new(StaticToken::new(token)?)))
    }

    /// Build the HTTP client and resolve credentials (signing in when a login is configured)
    pub async fn connect(config: &ProviderConfig) -> Result<Self> {
        let client: Arc<dyn ApiClient> = Arc::new(HttpApiClient::from_config(config)?);
        let credentials = credentials::from_config(client.as_ref(), config).await?;
        tracing::debug!(host = %config.host, "Connected to platform");
        Ok(Self::new(client, credentials))
    }

    /// Send a typed request with the current session attached
    pub(crate) async fn send<R: ApiRequest + Sync>(&self, request: &R) -> Result<R::Response> {
        let session = if R::OPERATION.requires_session() {
            Some(self.credentials.session().await?)
        } else {
            None
        };
        dispatch(self.client.as_ref(), request, session.as_deref()).await
    }

    /// Fetch and flatten one environment
    pub async fn read_environment(&self, name: &str, mode: ReadMode) -> Result<EnvironmentProjection> {
        let request = GetEnvInfoRequest {
            name: name.to_string(),
            lazy: mode.is_lazy(),
        };
        let response = self.send(&request).await?;
        response
            .envelope
            .check(&format!("Cannot get environment information from {name}"))?;

        let projection = flatten::flatten(&response, name, mode)?;
        tracing::debug!(env = name, %mode, nodes = projection.nodes.len(), "Environment read");
        Ok(projection)
    }
}

#[async_trait]
impl EnvironmentProvider for JelasticProvider {
    fn name(&self) -> &str {
        "jelastic"
    }

    async fn create(&self, spec: &EnvironmentSpec) -> Result<EnvironmentProjection> {
        self.create_environment(spec).await
    }

    async fn read(&self, name: &str, mode: ReadMode) -> Result<EnvironmentProjection> {
        self.read_environment(name, mode).await
    }

    async fn update(
        &self,
        name: &str,
        prior: &EnvironmentSpec,
        desired: &EnvironmentSpec,
    ) -> Result<EnvironmentProjection> {
        self.update_environment(name, prior, desired).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.delete_environment(name).await
    }
}
