//! HTTP transport for the platform control API
//!
//! Every operation is a form-encoded POST answered with a JSON document.

use crate::api::{Operation, Params};
use crate::config::ProviderConfig;
use async_trait::async_trait;
use hidora_cloud::{CloudError, Result};
use reqwest::header::{ACCEPT, ACCEPT_CHARSET, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Issues one remote call and returns the decoded top-level JSON
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn call(&self, operation: Operation, params: Params) -> Result<Value>;
}

/// reqwest-backed API client
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("UTF-8"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CloudError::InvalidConfig(format!("HTTP client: {e}")))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::new(config.base_url()?, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an operation
    pub fn url(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn call(&self, operation: Operation, params: Params) -> Result<Value> {
        let url = self.url(operation);
        tracing::debug!(%operation, params = params.len(), "Sending API request");

        let response = self
            .client
            .post(&url)
            .form(params.as_slice())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%operation, error = %e, "API request failed");
                CloudError::unavailable(format!("Unable to reach {operation}"), e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%operation, %status, "API request returned error status");
            return Err(CloudError::unavailable(
                format!("Unable to reach {operation}"),
                format!("HTTP {status}: {body}"),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CloudError::malformed(format!("{operation}: response is not JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    #[test]
    fn test_url_joins_base_and_path() {
        let client = HttpApiClient::new("https://app.hidora.com/1.0", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://app.hidora.com/1.0/");
        assert_eq!(
            client.url(Operation::DeleteEnv),
            "https://app.hidora.com/1.0/environment/control/rest/deleteenv"
        );
    }

    #[tokio::test]
    async fn test_call_posts_form_and_decodes_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1.0/environment/control/rest/getregions")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .header("accept", "application/json")
                    .header("accept-charset", "UTF-8")
                    .x_www_form_urlencoded_tuple("appid", "0123456789abcdef0123456789abcdef")
                    .x_www_form_urlencoded_tuple("session", "s3ss10n");
                then.status(200).json_body(json!({"result": 0, "array": []}));
            })
            .await;

        let client = HttpApiClient::new(server.url("/1.0/"), Duration::from_secs(5)).unwrap();
        let params = Params::new()
            .with("appid", "0123456789abcdef0123456789abcdef")
            .with("session", "s3ss10n");

        let value = client.call(Operation::GetRegions, params).await.unwrap();
        assert_eq!(value["result"], 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_remote_unavailable() {
        let client = HttpApiClient::new("http://127.0.0.1:1/1.0/", Duration::from_secs(2)).unwrap();
        let err = client
            .call(Operation::DeleteEnv, Params::new().with("envName", "my-env"))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::RemoteUnavailable { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_error_status_is_remote_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/1.0/environment/control/rest/migrate");
                then.status(502).body("bad gateway");
            })
            .await;

        let client = HttpApiClient::new(server.url("/1.0/"), Duration::from_secs(5)).unwrap();
        let err = client
            .call(Operation::Migrate, Params::new())
            .await
            .unwrap_err();
        match err {
            CloudError::RemoteUnavailable { detail, .. } => assert!(detail.contains("502")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_remote_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/1.0/environment/control/rest/createenvironment");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!({"response": {"result": 0, "name": "my-env"}}));
            })
            .await;

        let client = HttpApiClient::new(server.url("/1.0/"), Duration::from_millis(200)).unwrap();
        let err = client
            .call(Operation::CreateEnvironment, Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::RemoteUnavailable { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/1.0/environment/control/rest/getenvinfo");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = HttpApiClient::new(server.url("/1.0/"), Duration::from_secs(5)).unwrap();
        let err = client
            .call(Operation::GetEnvInfo, Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::MalformedResponse(_)), "{err:?}");
    }
}
