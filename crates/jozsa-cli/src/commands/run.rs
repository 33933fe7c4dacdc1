//! Run command implementation.

use anyhow::Result;
use console::style;

use jozsa_algo::{DeutschJozsa, Oracle};

use super::common::{
    BackendChoice, create_backend, open_context, print_classification, print_results, spinner,
};
use crate::config::Config;

/// Flags given to `jozsa run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub n: u32,
    pub oracle: Oracle,
    pub shots: Option<u32>,
    pub backend: Option<String>,
    pub target: Option<String>,
    pub seed: Option<u64>,
    pub format: String,
}

/// Execute the run command.
pub async fn execute(config: &Config, options: RunOptions) -> Result<()> {
    let json = match options.format.to_lowercase().as_str() {
        "table" => false,
        "json" => true,
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    };

    let shots = options.shots.unwrap_or(config.shots);
    let choice = BackendChoice::resolve(config, options.backend, options.target, options.seed);
    let experiment = DeutschJozsa::new(options.n, options.oracle).with_shots(shots);

    let circuit = experiment.circuit()?;
    if !json {
        println!(
            "{} Deutsch-Jozsa with {} oracle on {} ({} qubits, {} shots)",
            style("→").cyan().bold(),
            style(options.oracle).green(),
            style(&choice.name).yellow(),
            options.n,
            shots
        );
        println!(
            "  Circuit: {} qubits, depth {}, {} ops",
            circuit.num_qubits(),
            circuit.depth(),
            circuit.dag().num_ops()
        );
    }

    let backend = create_backend(config, &choice).await?;
    let mut ctx = open_context(backend).await?;

    let progress = (!json).then(|| spinner("Running job..."));
    let outcome = experiment.run(&mut ctx).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    ctx.close().await?;
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_results(&outcome.result);
        print_classification(&outcome);
    }

    Ok(())
}
