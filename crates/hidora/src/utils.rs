use anyhow::Context;
use clap::Args;
use colored::Colorize;
use hidora_cloud::{EnvironmentProjection, EnvironmentSpec};
use hidora_cloud_jelastic::{JelasticProvider, ProviderConfig};
use hidora_config::Settings;
use std::path::PathBuf;

/// Platform connection flags, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Platform host, e.g. app.hidora.com
    #[arg(long, env = "JELASTIC_HOST", global = true)]
    pub host: Option<String>,

    /// Login used to sign in
    #[arg(long, env = "JELASTIC_USERNAME", global = true)]
    pub username: Option<String>,

    #[arg(long, env = "JELASTIC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Access token, used when no login is given
    #[arg(long, env = "JELASTIC_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Settings file (defaults to ~/.config/hidora/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Flags and environment variables win over the settings file
pub fn merge(args: &ConnectionArgs, settings: Settings) -> anyhow::Result<ProviderConfig> {
    let host = args.host.clone().or(settings.host).context(
        "No platform host: pass --host, set JELASTIC_HOST or add `host` to the settings file",
    )?;

    let mut config = ProviderConfig::new(host);
    config.username = args.username.clone().or(settings.username);
    config.password = args.password.clone().or(settings.password);
    config.access_token = args.token.clone().or(settings.access_token);
    if let Some(app_id) = settings.app_id {
        config.app_id = app_id;
    }
    Ok(config)
}

pub fn provider_config(args: &ConnectionArgs) -> anyhow::Result<ProviderConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => hidora_config::settings_path()?,
    };
    tracing::debug!(path = %path.display(), "Loading settings");
    let settings = hidora_config::load_settings(&path)?;
    merge(args, settings)
}

pub async fn connect(args: &ConnectionArgs) -> anyhow::Result<JelasticProvider> {
    let config = provider_config(args)?;
    tracing::debug!(host = %config.host, "Connecting");
    let provider = JelasticProvider::connect(&config)
        .await
        .with_context(|| format!("Unable to connect to {}", config.host))?;
    Ok(provider)
}

/// Load the environment document from `file`, or search for one
pub fn load_spec(file: Option<PathBuf>) -> anyhow::Result<(PathBuf, EnvironmentSpec)> {
    let path = match file {
        Some(path) => path,
        None => hidora_config::find_environment_file()?,
    };
    let spec = hidora_config::load_environment(&path)?;
    tracing::debug!(path = %path.display(), env = %spec.short_domain, "Environment document loaded");
    Ok((path, spec))
}

pub fn print_projection(projection: &EnvironmentProjection) {
    let env = &projection.environment;
    println!("{} {}", "Environment".bold(), projection.name.cyan().bold());
    println!("  domain:      {}", env.domain);
    println!("  region:      {}", env.region);
    println!("  hardware:    {}", env.hardware_node_group);
    println!("  created on:  {}", env.created_on);
    println!("  HA:          {}", env.high_availability);
    println!("  TLS:         {}", env.tls_enabled);
    if let Some(group) = &projection.group_name {
        println!("  group:       {group}");
    }
    if let Some(owner) = projection.owning_user_id {
        println!("  owner uid:   {owner}");
    }

    if projection.nodes.is_empty() {
        return;
    }
    println!();
    println!("{}", "Nodes:".bold());
    for node in &projection.nodes {
        let ips = match (node.has_public_ipv4, node.has_public_ipv6) {
            (true, true) => " [ipv4, ipv6]",
            (true, false) => " [ipv4]",
            (false, true) => " [ipv6]",
            (false, false) => "",
        };
        println!(
            "  - {} ({}) {}:{} cloudlets {}/{}{}",
            node.node_group.cyan(),
            node.node_type,
            node.image,
            node.image_tag,
            node.fixed_compute_units,
            node.flexible_compute_units,
            ips
        );
    }
}
