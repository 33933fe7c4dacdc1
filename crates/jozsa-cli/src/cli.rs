//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jozsa_algo::Oracle;

/// Jozsa - the Deutsch-Jozsa algorithm on a simulator or IBM Quantum
#[derive(Debug, Parser)]
#[command(name = "jozsa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ~/.jozsa/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run Deutsch-Jozsa and classify the oracle
    Run {
        /// Number of data qubits
        #[arg(short, long = "num-qubits", default_value = "3")]
        n: u32,

        /// Oracle (constant0, constant1, balanced)
        #[arg(long, default_value = "balanced")]
        oracle: Oracle,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Backend to use (simulator, ibm)
        #[arg(short, long)]
        backend: Option<String>,

        /// Device name for remote backends
        #[arg(short, long)]
        target: Option<String>,

        /// Simulator RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Verify both oracle classes on the local simulator
    Check,

    /// Print the OpenQASM 3 source of a Deutsch-Jozsa circuit
    Circuit {
        /// Number of data qubits
        #[arg(short, long = "num-qubits", default_value = "3")]
        n: u32,

        /// Oracle (constant0, constant1, balanced)
        #[arg(long, default_value = "balanced")]
        oracle: Oracle,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}
