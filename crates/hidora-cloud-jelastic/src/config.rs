//! Provider configuration

use hidora_cloud::{CloudError, DEFAULT_APPLICATION_ID, Result};
use std::time::Duration;

const API_PROTO: &str = "https://";
const API_VERSION: &str = "/1.0/";

/// Provisioning calls can block for a long time on the platform side
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Connection settings for one platform
#[derive(Clone)]
pub struct ProviderConfig {
    /// Platform host, e.g. `app.hidora.com`; may carry an explicit scheme
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    /// Application id used for sign-in
    pub app_id: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: None,
            password: None,
            access_token: None,
            app_id: DEFAULT_APPLICATION_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create ProviderConfig from environment variables
    ///
    /// `JELASTIC_HOST` is required; `JELASTIC_USERNAME`, `JELASTIC_PASSWORD`
    /// and `JELASTIC_TOKEN` are optional.
    pub fn from_env() -> Result<Self> {
        let host = non_empty_var("JELASTIC_HOST")
            .ok_or_else(|| CloudError::InvalidConfig("JELASTIC_HOST is not set".to_string()))?;

        let mut config = Self::new(host);
        config.username = non_empty_var("JELASTIC_USERNAME");
        config.password = non_empty_var("JELASTIC_PASSWORD");
        config.access_token = non_empty_var("JELASTIC_TOKEN");
        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// API base URL: `https://{host}/1.0/`
    pub fn base_url(&self) -> Result<String> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(CloudError::InvalidConfig("host is empty".to_string()));
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(format!("{host}{API_VERSION}"))
        } else {
            Ok(format!("{API_PROTO}{host}{API_VERSION}"))
        }
    }

    /// Login and password, when both are present
    pub fn login(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("app_id", &self.app_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_base_url() {
        let config = ProviderConfig::new("app.hidora.com");
        assert_eq!(config.base_url().unwrap(), "https://app.hidora.com/1.0/");

        let config = ProviderConfig::new("http://127.0.0.1:8080/");
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:8080/1.0/");

        assert!(ProviderConfig::new("  ").base_url().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::new("app.hidora.com");
        assert_eq!(config.timeout, Duration::from_secs(3600));
        assert_eq!(config.app_id, DEFAULT_APPLICATION_ID);
        assert!(config.login().is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ProviderConfig::new("app.hidora.com")
            .with_login("ops@example.com", "hunter2")
            .with_token("abc123");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("abc123"));
        assert!(rendered.contains("ops@example.com"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        unsafe {
            std::env::set_var("JELASTIC_HOST", "app.hidora.com");
            std::env::set_var("JELASTIC_TOKEN", "0123abcd");
            std::env::set_var("JELASTIC_USERNAME", "");
            std::env::remove_var("JELASTIC_PASSWORD");
        }

        let config = ProviderConfig::from_env().unwrap();
        assert_eq!(config.host, "app.hidora.com");
        assert_eq!(config.access_token.as_deref(), Some("0123abcd"));
        assert_eq!(config.username, None);

        unsafe {
            std::env::remove_var("JELASTIC_HOST");
            std::env::remove_var("JELASTIC_TOKEN");
            std::env::remove_var("JELASTIC_USERNAME");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_host() {
        unsafe {
            std::env::remove_var("JELASTIC_HOST");
        }
        assert!(matches!(
            ProviderConfig::from_env(),
            Err(CloudError::InvalidConfig(_))
        ));
    }
}
