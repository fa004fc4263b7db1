use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "cachecache")]
#[command(about = "Inspect and populate property list caches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable verbose debug output")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Persist a JSON payload into a cache")]
    Persist {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(help = "JSON payload to persist")]
        payload: String,
    },

    #[command(about = "Print the cached payload as JSON")]
    Retrieve {
        #[command(flatten)]
        target: TargetArgs,
    },

    #[command(about = "Print the file a cache reads and writes")]
    Locate {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
struct TargetArgs {
    #[arg(long = "type", help = "Type label naming the cache file")]
    cache_type: String,

    #[arg(long, help = "Bundle identifier owning the cache directory")]
    bundle: String,

    #[arg(long, help = "Override the user cache directory")]
    cache_root: Option<PathBuf>,
}

impl From<TargetArgs> for cli::Target {
    fn from(args: TargetArgs) -> Self {
        cli::Target {
            cache_type: args.cache_type,
            bundle: args.bundle,
            cache_root: args.cache_root,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli::Config {
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Persist { target, payload } => {
            cli::persist(&target.into(), &payload, &config)?;
        }
        Commands::Retrieve { target } => {
            cli::retrieve(&target.into(), &config)?;
        }
        Commands::Locate { target } => {
            cli::locate(&target.into())?;
        }
    }

    Ok(())
}
