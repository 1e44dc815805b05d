use crate::utils::{self, ConnectionArgs};
use colored::Colorize;
use hidora_cloud::EnvironmentProvider;
use std::io::{self, BufRead, Write};

fn confirm(name: &str) -> anyhow::Result<bool> {
    print!("Delete environment {}? [y/N] ", name.cyan());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

pub async fn handle(args: &ConnectionArgs, name: &str, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(name)? {
        println!("{}", "Aborted".yellow());
        return Ok(());
    }

    let provider = utils::connect(args).await?;
    provider.delete(name).await?;

    println!("{}", format!("✓ Environment {name} deleted").green().bold());
    Ok(())
}
