use crate::utils::{self, ConnectionArgs};
use hidora_cloud::{EnvironmentProvider, ReadMode};

pub async fn handle(args: &ConnectionArgs, name: &str, lazy: bool, json: bool) -> anyhow::Result<()> {
    let provider = utils::connect(args).await?;
    let mode = if lazy { ReadMode::Lazy } else { ReadMode::Full };
    let projection = provider.read(name, mode).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    } else {
        utils::print_projection(&projection);
    }
    Ok(())
}
