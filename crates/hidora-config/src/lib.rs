pub mod error;

pub use error::*;

use hidora_cloud::EnvironmentSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "hidora";
const SETTINGS_FILE: &str = "config.yaml";
const ENV_FILE_CANDIDATES: [&str; 4] = [
    "hidora.local.yaml",
    ".hidora.local.yaml",
    "hidora.yaml",
    ".hidora.yaml",
];

/// Hidora configuration directory (`~/.config/hidora`), created when missing
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(APP_DIR);

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Locate the declarative environment document
///
/// Search order:
/// 1. `HIDORA_ENV_FILE` environment variable (direct path)
/// 2. current directory: hidora.local.yaml, .hidora.local.yaml, hidora.yaml, .hidora.yaml
/// 3. the same names inside `./.hidora/`
/// 4. `~/.config/hidora/hidora.yaml`
pub fn find_environment_file() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("HIDORA_ENV_FILE") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    for filename in &ENV_FILE_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let hidora_dir = current_dir.join(".hidora");
    if hidora_dir.is_dir() {
        for filename in &ENV_FILE_CANDIDATES {
            let path = hidora_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(APP_DIR).join("hidora.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::EnvironmentFileNotFound)
}

fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an environment document
pub fn load_environment(path: &Path) -> Result<EnvironmentSpec> {
    let spec: EnvironmentSpec = read_yaml(path)?;
    tracing::debug!(path = %path.display(), nodes = spec.nodes.len(), "Environment document loaded");
    Ok(spec)
}

/// Connection settings stored on disk
///
/// Every field is optional; command-line flags and `JELASTIC_*` variables
/// take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub app_id: Option<String>,
}

/// Default settings file location
pub fn settings_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(SETTINGS_FILE))
}

/// Read settings from `path`; a missing file yields empty settings
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file");
        return Ok(Settings::default());
    }
    read_yaml(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const ENV_DOC: &str = r#"
region: ch-gva-1
shortDomain: my-env
groupName: production
nodes:
  - nodeGroup: cp
    nodeType: docker
    image: nginx
    imageTag: "1.27"
    replicaCount: 2
    environmentVariables:
      MODE: prod
"#;

    #[test]
    fn test_get_config_dir() {
        let config_dir = get_config_dir().unwrap();
        assert!(config_dir.ends_with("hidora"));
        assert!(config_dir.exists());
    }

    #[test]
    #[serial]
    fn test_find_environment_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("hidora.yaml"), ENV_DOC).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_environment_file().unwrap();
        assert!(result.ends_with("hidora.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_local_file_has_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("hidora.yaml"), ENV_DOC).unwrap();
        fs::write(temp_dir.path().join(".hidora.local.yaml"), ENV_DOC).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_environment_file().unwrap();
        assert!(result.ends_with(".hidora.local.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_environment_file_in_hidora_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let hidora_dir = temp_dir.path().join(".hidora");
        fs::create_dir(&hidora_dir).unwrap();
        fs::write(hidora_dir.join("hidora.yaml"), ENV_DOC).unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_environment_file().unwrap();
        assert!(result.ends_with(".hidora/hidora.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_environment_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("staging.yaml");
        fs::write(&path, ENV_DOC).unwrap();

        unsafe {
            std::env::set_var("HIDORA_ENV_FILE", path.to_str().unwrap());
        }

        assert_eq!(find_environment_file().unwrap(), path);

        unsafe {
            std::env::remove_var("HIDORA_ENV_FILE");
        }
    }

    #[test]
    fn test_load_environment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("hidora.yaml");
        fs::write(&path, ENV_DOC).unwrap();

        let spec = load_environment(&path).unwrap();
        assert_eq!(spec.region, "ch-gva-1");
        assert_eq!(spec.short_domain, "my-env");
        assert_eq!(spec.group(), Some("production"));
        assert_eq!(spec.nodes[0].replica_count, 2);
        assert_eq!(spec.nodes[0].environment_variables["MODE"], "prod");
    }

    #[test]
    fn test_load_environment_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("hidora.yaml");
        fs::write(&path, "region: [unclosed").unwrap();

        match load_environment(&path) {
            Err(ConfigError::Yaml { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected Yaml error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");

        assert_eq!(load_settings(&path).unwrap(), Settings::default());

        fs::write(&path, "host: app.hidora.com\naccessToken: abc123\n").unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.host.as_deref(), Some("app.hidora.com"));
        assert_eq!(settings.access_token.as_deref(), Some("abc123"));
        assert_eq!(settings.username, None);
    }
}
