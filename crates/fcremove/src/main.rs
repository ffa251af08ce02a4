mod commands;
mod console;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use fcremove_core::RemoveTarget;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fc-remove")]
#[command(about = "Tear down a Function Compute deployment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove a deployment (everything when no target is given)
    Remove(RemoveArgs),
    /// Show version information
    Version,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// What to remove; omit to remove everything including auto-generated NAS / SLS
    #[arg(value_enum)]
    target: Option<Target>,

    /// Delete auto-generated NAS / SLS resources without asking
    #[arg(short, long)]
    force: bool,

    /// Tag key to remove (tags)
    #[arg(short, long)]
    key: Option<String>,

    /// Custom domain to remove (domain)
    #[arg(short, long)]
    domain: Option<String>,

    /// Trigger name to remove (trigger)
    #[arg(short, long)]
    name: Option<String>,

    /// Deployment descriptor (s.yaml)
    #[arg(short, long, env = "FC_REMOVE_CONFIG")]
    config: Option<PathBuf>,

    /// Project name inside the descriptor
    #[arg(short, long)]
    project: Option<String>,

    /// Credentials alias in ~/.s/access.yaml
    #[arg(short, long, env = "FC_REMOVE_ACCESS")]
    access: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Target {
    Tags,
    Domain,
    Trigger,
    Function,
    Service,
}

impl From<Target> for RemoveTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Tags => RemoveTarget::Tags,
            Target::Domain => RemoveTarget::Domain,
            Target::Trigger => RemoveTarget::Trigger,
            Target::Function => RemoveTarget::Function,
            Target::Service => RemoveTarget::Service,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ログは stderr へ。RUST_LOG で上書き可能
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let result = match cli.command {
        Commands::Version => {
            println!("fc-remove {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Remove(args) => commands::remove::handle(args).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
