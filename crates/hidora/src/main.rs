mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utils::ConnectionArgs;

#[derive(Parser)]
#[command(name = "hidora")]
#[command(about = "Declarative environments for Hidora / Jelastic platforms", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log requests and stage transitions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List hardware node groups available for placement
    Regions,
    /// Show which fields would change on update
    Plan {
        /// Environment document (searched for when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Environment name (defaults to the document's short domain)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Create the environment described by a document
    Create {
        /// Environment document (searched for when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the current state of an environment
    Show {
        /// Environment name
        name: String,
        /// Fetch the environment record only
        #[arg(long)]
        lazy: bool,
        /// Print the read-back as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply group and region changes from a document
    Update {
        /// Environment document (searched for when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Environment name (defaults to the document's short domain)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete an environment
    Delete {
        /// Environment name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::default().add_directive(tracing::Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Version => {
            println!("hidora {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Regions => {
            commands::regions::handle(&cli.connection).await?;
        }
        Commands::Plan { file, name } => {
            commands::plan::handle(&cli.connection, file, name).await?;
        }
        Commands::Create { file } => {
            commands::create::handle(&cli.connection, file).await?;
        }
        Commands::Show { name, lazy, json } => {
            commands::show::handle(&cli.connection, &name, lazy, json).await?;
        }
        Commands::Update { file, name } => {
            commands::update::handle(&cli.connection, file, name).await?;
        }
        Commands::Delete { name, yes } => {
            commands::delete::handle(&cli.connection, &name, yes).await?;
        }
    }

    Ok(())
}
