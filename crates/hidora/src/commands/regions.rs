use crate::utils::{self, ConnectionArgs};
use colored::Colorize;
use hidora_cloud_jelastic::JelasticProvider;

pub async fn handle(args: &ConnectionArgs) -> anyhow::Result<()> {
    let config = utils::provider_config(args)?;
    let provider = JelasticProvider::connect(&config).await?;
    let regions = provider.list_regions(&config.app_id).await?;

    println!("{}", "Hardware node groups:".bold());
    for group in regions.iter().flat_map(|r| &r.hard_node_groups) {
        let unique = group.unique_name.as_deref().unwrap_or("(unnamed)");
        let display = group.display_name.as_deref().unwrap_or("");
        if group.enabled() {
            println!("  {} {} {}", "✓".green(), unique.cyan(), display);
        } else {
            println!("  {} {} {}", "-".dimmed(), unique.dimmed(), display.dimmed());
        }
    }

    Ok(())
}
