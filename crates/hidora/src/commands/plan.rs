use crate::utils::{self, ConnectionArgs};
use colored::Colorize;
use hidora_cloud::{EnvironmentProvider, ReadMode};
use std::path::PathBuf;

pub async fn handle(
    args: &ConnectionArgs,
    file: Option<PathBuf>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let (_, desired) = utils::load_spec(file)?;
    let name = name.unwrap_or_else(|| desired.short_domain.clone());

    let provider = utils::connect(args).await?;
    let current = provider.read(&name, ReadMode::Full).await?;
    let plan = provider.plan(&current.to_spec(), &desired);

    println!("{} {}", "Plan for".bold(), name.cyan().bold());
    for change in &plan.changes {
        let marker = if change.forces_replacement() {
            "!".red().bold()
        } else {
            "~".yellow().bold()
        };
        println!("  {marker} {change}");
    }
    if plan.nodes_changed {
        println!("  {} node definitions differ (not updated in place)", "-".dimmed());
    }
    println!();
    println!("{}", plan.summary());
    Ok(())
}
