//! repotree: structural extraction of source repositories

use clap::{Parser, Subcommand};
use repotree_cli::commands;
use repotree_cli::logging::setup_logging;
use repotree_cli::ScanArgs;

#[derive(Parser)]
#[command(name = "repotree")]
#[command(author, version, about = "Structural extraction of source repositories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a repository and write a JSON report of its structure
    Scan(ScanArgs),

    /// List registered parsers and the extensions they handle
    Parsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Scan(args) => {
            let options = args.into_options();
            commands::scan::run(&options).await?;
        }
        Commands::Parsers => commands::parsers::run(),
    }

    Ok(())
}
