//! Environment deletion

use crate::api::DeleteEnvRequest;
use crate::provider::JelasticProvider;
use hidora_cloud::{CloudError, Result};

impl JelasticProvider {
    pub async fn delete_environment(&self, name: &str) -> Result<()> {
        let request = DeleteEnvRequest {
            name: name.to_string(),
        };
        let response = self.send(&request).await.map_err(|e| match e {
            CloudError::RemoteUnavailable { detail, .. } => CloudError::unavailable(
                "Unable to delete environment",
                format!("{name}: {detail}"),
            ),
            other => other,
        })?;
        response.check(&format!("Unable to delete environment {name}"))?;

        tracing::info!(env = name, "Environment deleted");
        Ok(())
    }
}
