//! Region resolution against the enabled hardware node groups

use crate::api::{GetRegionsRequest, RegionRecord};
use crate::provider::JelasticProvider;
use hidora_cloud::{CloudError, RegionCandidate, Result};

/// An enabled hardware node group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareNodeGroup {
    pub unique_name: String,
    pub display_name: String,
}

impl From<&HardwareNodeGroup> for RegionCandidate {
    fn from(group: &HardwareNodeGroup) -> Self {
        RegionCandidate {
            display_name: group.display_name.clone(),
            unique_name: group.unique_name.clone(),
        }
    }
}

/// Every enabled group in remote order: regions first, then groups within a region
pub fn enabled_groups(regions: &[RegionRecord]) -> Result<Vec<HardwareNodeGroup>> {
    let mut groups = Vec::new();
    for record in regions.iter().flat_map(|r| &r.hard_node_groups) {
        if !record.enabled() {
            continue;
        }
        let (Some(unique_name), Some(display_name)) = (&record.unique_name, &record.display_name)
        else {
            return Err(CloudError::malformed(
                "getregions: enabled hardware node group without uniqueName or displayName",
            ));
        };
        groups.push(HardwareNodeGroup {
            unique_name: unique_name.clone(),
            display_name: display_name.clone(),
        });
    }
    Ok(groups)
}

/// First enabled group whose unique name equals `requested`
pub fn resolve_region(requested: &str, regions: &[RegionRecord]) -> Result<HardwareNodeGroup> {
    let groups = enabled_groups(regions)?;
    if let Some(found) = groups.iter().find(|g| g.unique_name == requested) {
        return Ok(found.clone());
    }
    Err(CloudError::InvalidRegion {
        requested: requested.to_string(),
        candidates: groups.iter().map(RegionCandidate::from).collect(),
    })
}

impl JelasticProvider {
    /// Fetch the region list; never cached
    pub async fn list_regions(&self, app_id: &str) -> Result<Vec<RegionRecord>> {
        let request = GetRegionsRequest {
            app_id: app_id.to_string(),
        };
        let response = self.send(&request).await?;
        response.envelope.check("Unable to get regions")?;
        response
            .array
            .ok_or_else(|| CloudError::malformed("getregions: response carries no region array"))
    }

    /// Fetch the region list and resolve `requested` against it
    pub async fn resolve_region(&self, app_id: &str, requested: &str) -> Result<HardwareNodeGroup> {
        let regions = self.list_regions(app_id).await?;
        let group = resolve_region(requested, &regions)?;
        tracing::debug!(region = %group.unique_name, "Region resolved");
        Ok(group)
    }
}
