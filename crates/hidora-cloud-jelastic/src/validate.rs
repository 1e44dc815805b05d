//! Identifier and cross-field validation
//!
//! Pure checks run before anything is sent to the platform.

use hidora_cloud::{CloudError, EnvironmentSpec, Result};

pub const APP_ID_LENGTH: usize = 32;
pub const SHORT_DOMAIN_MIN_LENGTH: usize = 5;
pub const SHORT_DOMAIN_MAX_LENGTH: usize = 41;
pub const TOKEN_MAX_LENGTH: usize = 40;

fn is_lower_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Exactly 32 characters of `[a-z0-9]`
pub fn validate_app_id(app_id: &str) -> Result<()> {
    if app_id.chars().count() == APP_ID_LENGTH && app_id.chars().all(is_lower_alnum) {
        return Ok(());
    }
    Err(CloudError::invalid_format(
        "Incorrect appid format",
        format!(
            "appid doesn't correspond to format policy! Must have only lowercase alphanumeric with {APP_ID_LENGTH} characters"
        ),
    ))
}

/// 5 to 41 characters of `[a-zA-Z0-9-]`
pub fn validate_short_domain(short_domain: &str) -> Result<()> {
    let len = short_domain.chars().count();
    let charset_ok = short_domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if charset_ok && (SHORT_DOMAIN_MIN_LENGTH..=SHORT_DOMAIN_MAX_LENGTH).contains(&len) {
        return Ok(());
    }
    Err(CloudError::invalid_format(
        "Incorrect shortDomain format",
        format!(
            "shortDomain must have between {SHORT_DOMAIN_MIN_LENGTH} and {SHORT_DOMAIN_MAX_LENGTH} characters among [a-zA-Z0-9-], got {short_domain:?}"
        ),
    ))
}

/// At most 40 characters of `[a-z0-9]`
///
/// Stricter than the short domain charset: no uppercase, no hyphen.
pub fn validate_access_token(token: &str) -> Result<()> {
    if token.chars().count() <= TOKEN_MAX_LENGTH && token.chars().all(is_lower_alnum) {
        return Ok(());
    }
    Err(CloudError::invalid_format(
        "Incorrect token format",
        format!(
            "Token doesn't correspond to format policy! Must have only lowercase alphanumeric with at most {TOKEN_MAX_LENGTH} characters"
        ),
    ))
}

/// Replica counts must be positive; high availability needs more than one per node group
pub fn validate_replication(spec: &EnvironmentSpec) -> Result<()> {
    for node in &spec.nodes {
        if node.replica_count == 0 {
            return Err(CloudError::invalid_format(
                "Incorrect replicaCount",
                format!("node group {} must have at least one node", node.node_group),
            ));
        }
        if spec.high_availability && node.replica_count == 1 {
            return Err(CloudError::InsufficientReplicas {
                node_group: node.node_group.clone(),
                count: node.replica_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hidora_cloud::NodeSpec;
    use proptest::prelude::*;

    #[test]
    fn test_app_id() {
        assert!(validate_app_id("1dd8d191d38fff45e62564fcf67fdcd6").is_ok());
        assert!(validate_app_id("1DD8D191D38FFF45E62564FCF67FDCD6").is_err());
        assert!(validate_app_id("1dd8d191d38fff45e62564fcf67fdcd").is_err());
        assert!(validate_app_id("1dd8d191d38fff45e62564fcf67fdcd6a").is_err());
        assert!(validate_app_id("").is_err());
    }

    #[test]
    fn test_short_domain_bounds() {
        assert!(validate_short_domain("abcd").is_err());
        assert!(validate_short_domain("abcde").is_ok());
        assert!(validate_short_domain(&"a".repeat(41)).is_ok());
        assert!(validate_short_domain(&"a".repeat(42)).is_err());
        assert!(validate_short_domain("My-Env-01").is_ok());
        assert!(validate_short_domain("my_env").is_err());
        assert!(validate_short_domain("my.env").is_err());
    }

    #[test]
    fn test_access_token_charset_is_stricter_than_short_domain() {
        assert!(validate_access_token("abc123").is_ok());
        assert!(validate_access_token("").is_ok());
        assert!(validate_access_token(&"f".repeat(40)).is_ok());
        assert!(validate_access_token(&"f".repeat(41)).is_err());
        assert!(validate_access_token("abc-123").is_err());
        assert!(validate_access_token("ABC123").is_err());
    }

    #[test]
    fn test_replication() {
        let mut spec = EnvironmentSpec::new("ch-gva-1", "my-env")
            .with_node(NodeSpec::new("cp", "docker").with_replicas(2))
            .with_node(NodeSpec::new("sqldb", "docker").with_replicas(1));
        assert!(validate_replication(&spec).is_ok());

        spec.high_availability = true;
        let err = validate_replication(&spec).unwrap_err();
        assert!(matches!(
            err,
            CloudError::InsufficientReplicas { ref node_group, count: 1 } if node_group == "sqldb"
        ));

        spec.nodes[1].replica_count = 3;
        assert!(validate_replication(&spec).is_ok());
    }

    #[test]
    fn test_zero_replicas_rejected() {
        let spec = EnvironmentSpec::new("ch-gva-1", "my-env")
            .with_node(NodeSpec::new("cp", "docker").with_replicas(0));
        assert!(matches!(
            validate_replication(&spec),
            Err(CloudError::InvalidFormat { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_app_id_iff_32_lower_alnum(s in "\\PC{0,40}") {
            let expected = s.chars().count() == 32 && s.chars().all(is_lower_alnum);
            prop_assert_eq!(validate_app_id(&s).is_ok(), expected);
        }

        #[test]
        fn prop_generated_app_ids_are_valid(s in "[a-z0-9]{32}") {
            prop_assert!(validate_app_id(&s).is_ok());
        }

        #[test]
        fn prop_short_domain_iff_len_and_charset(s in "[a-zA-Z0-9_.-]{0,50}") {
            let len = s.chars().count();
            let expected = (5..=41).contains(&len)
                && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            prop_assert_eq!(validate_short_domain(&s).is_ok(), expected);
        }
    }
}
