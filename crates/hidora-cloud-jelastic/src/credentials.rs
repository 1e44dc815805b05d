//! Session credentials
//!
//! Every remote call except sign-in asks a [`CredentialProvider`] for the
//! session token, so the token can rotate without touching the engine.

use crate::api::{SignInRequest, dispatch};
use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::validate::{validate_access_token, validate_app_id};
use async_trait::async_trait;
use hidora_cloud::{CloudError, Result};
use std::sync::Arc;

/// Source of the session token attached to remote calls
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn session(&self) -> Result<String>;
}

/// A fixed session token
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap a user-supplied access token after checking its format
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        validate_access_token(&token)?;
        Ok(Self { token })
    }

    /// Wrap a session issued by the platform itself
    pub fn from_session(session: impl Into<String>) -> Self {
        Self {
            token: session.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"***").finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn session(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Exchange a login and password for a session token
pub async fn sign_in(
    client: &dyn ApiClient,
    app_id: &str,
    login: &str,
    password: &str,
) -> Result<StaticToken> {
    validate_app_id(app_id)?;

    let request = SignInRequest {
        app_id: app_id.to_string(),
        login: login.to_string(),
        password: password.to_string(),
    };
    let response = dispatch(client, &request, None).await?;
    response.envelope.check("Unable to sign in")?;

    let session = response
        .session
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CloudError::malformed("signin: response carries no session"))?;

    tracing::info!(login, "Signed in");
    Ok(StaticToken::from_session(session))
}

/// Resolve credentials from configuration
///
/// A login and password take precedence over an access token.
pub async fn from_config(
    client: &dyn ApiClient,
    config: &ProviderConfig,
) -> Result<Arc<dyn CredentialProvider>> {
    if let Some((login, password)) = config.login() {
        let token = sign_in(client, &config.app_id, login, password).await?;
        return Ok(Arc::new(token));
    }

    match config.access_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(Arc::new(StaticToken::new(token)?)),
        _ => Err(CloudError::InvalidConfig(
            "either username and password or an access token is required".to_string(),
        )),
    }
}
