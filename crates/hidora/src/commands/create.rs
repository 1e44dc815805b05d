use crate::utils::{self, ConnectionArgs};
use colored::Colorize;
use hidora_cloud::EnvironmentProvider;
use std::path::PathBuf;

pub async fn handle(args: &ConnectionArgs, file: Option<PathBuf>) -> anyhow::Result<()> {
    let (path, spec) = utils::load_spec(file)?;
    println!(
        "{} {} from {}",
        "Creating".blue(),
        spec.short_domain.cyan(),
        path.display()
    );

    let provider = utils::connect(args).await?;
    let projection = provider.create(&spec).await?;

    println!(
        "{}",
        format!("✓ Environment {} created", projection.name).green().bold()
    );
    println!();
    utils::print_projection(&projection);
    Ok(())
}
