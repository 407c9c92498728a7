//! rosdistro CLI tool.

use clap::{Parser, Subcommand};
use rosdistro_core::{Branch, VcsKind};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rosdistro")]
#[command(about = "Inspect rosdistro distribution manifests", long_about = None)]
struct Cli {
    /// Path or http(s) URL of the distro manifest
    #[arg(long, env = "ROSDISTRO_SOURCE")]
    source: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stack names
    Stacks {
        /// Only list stacks that have a version
        #[arg(long)]
        released: bool,
        /// Only list stacks checked out with this tool (svn, git, hg, bzr)
        #[arg(long)]
        vcs: Option<VcsKind>,
    },
    /// Show a stack's version and checkout locations
    Stack {
        /// Stack name
        name: String,
        /// Expand the rules for another version of the stack
        #[arg(long)]
        version: Option<String>,
        /// Only show one checkout location (devel, distro, release)
        #[arg(long)]
        branch: Option<Branch>,
        /// Use the read-only checkout URIs
        #[arg(long)]
        anonymous: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List variant names
    Variants,
    /// Show a variant's parents and flattened stack list
    Variant {
        /// Variant name
        name: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the distro manifest
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stacks { released, vcs } => {
            commands::stacks::list(&cli.source, released, vcs).await?;
        }
        Commands::Stack {
            name,
            version,
            branch,
            anonymous,
            json,
        } => {
            let checkout = commands::stacks::Checkout { branch, anonymous };
            commands::stacks::show(&cli.source, &name, version.as_deref(), checkout, json)
                .await?;
        }
        Commands::Variants => {
            commands::variants::list(&cli.source).await?;
        }
        Commands::Variant { name, json } => {
            commands::variants::show(&cli.source, &name, json).await?;
        }
        Commands::Validate => {
            commands::validate(&cli.source).await?;
        }
    }

    Ok(())
}
