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
    let prior = provider.read(&name, ReadMode::Full).await?.to_spec();

    let plan = provider.plan(&prior, &desired);
    if !plan.has_changes() {
        println!("{}", format!("✓ {name} is up to date").green());
        return Ok(());
    }

    println!("{} {}: {}", "Updating".blue(), name.cyan(), plan.summary());
    let projection = provider.update(&name, &prior, &desired).await?;

    println!("{}", format!("✓ Environment {name} updated").green().bold());
    println!();
    utils::print_projection(&projection);
    Ok(())
}
