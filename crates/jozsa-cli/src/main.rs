//! Jozsa Command-Line Interface
//!
//! ```text
//!   x ──→ H⊗ⁿ ──→ U_f ──→ H⊗ⁿ ──→ measure
//!                                  │
//!                   all zeros ─────┴───── anything else
//!                   constant              balanced
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use commands::{backends, check, circuit, run, version};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // -v wins over the configured level
    let filter = match (cli.verbose, config.log_level.as_deref()) {
        (0, Some(level)) => level.to_string(),
        (0, None) => "warn".into(),
        (1, _) => "info".into(),
        (2, _) => "debug".into(),
        _ => "trace".into(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            n,
            oracle,
            shots,
            backend,
            target,
            seed,
            format,
        } => {
            let options = run::RunOptions {
                n,
                oracle,
                shots,
                backend,
                target,
                seed,
                format,
            };
            run::execute(&config, options).await
        }

        Commands::Check => check::execute(&config).await,

        Commands::Circuit { n, oracle, output } => {
            circuit::execute(n, oracle, output.as_deref())
        }

        Commands::Backends => backends::execute(&config).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
