//! Shared helpers for CLI commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::info;

use jozsa_adapter_ibm::{DEFAULT_TARGET, IbmBackend};
use jozsa_adapter_sim::SimulatorBackend;
use jozsa_algo::{Classification, DeutschJozsaOutcome};
use jozsa_hal::{Backend, BackendConfig, ExecutionContext, ExecutionResult};

use crate::config::Config;

/// Which backend to build and how.
#[derive(Debug, Clone)]
pub struct BackendChoice {
    pub name: String,
    pub target: Option<String>,
    pub seed: Option<u64>,
}

impl BackendChoice {
    /// Take each field from the flags when given, else from `config`.
    pub fn resolve(
        config: &Config,
        backend: Option<String>,
        target: Option<String>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            name: backend.unwrap_or_else(|| config.backend.clone()),
            target: target.or_else(|| config.target.clone()),
            seed: seed.or(config.seed),
        }
    }
}

/// Construct the backend named by `choice`.
pub async fn create_backend(config: &Config, choice: &BackendChoice) -> Result<Arc<dyn Backend>> {
    match choice.name.to_lowercase().as_str() {
        "simulator" | "sim" => {
            let mut backend_config = BackendConfig::new("simulator")
                .with_extra("max_qubits", json!(config.max_qubits));
            if let Some(seed) = choice.seed {
                backend_config = backend_config.with_extra("seed", json!(seed));
            }
            Ok(Arc::new(SimulatorBackend::from_config(backend_config)?))
        }
        "ibm" => {
            let target = choice.target.as_deref().unwrap_or(DEFAULT_TARGET);
            eprintln!("  Connecting to IBM Quantum ({})...", style(target).yellow());
            let backend = match &config.ibm.token {
                Some(token) => {
                    let mut backend_config = BackendConfig::new("ibm")
                        .with_token(token.clone())
                        .with_extra("target", json!(target));
                    if let Some(endpoint) = &config.ibm.endpoint {
                        backend_config = backend_config.with_endpoint(endpoint.clone());
                    }
                    if let Some(instance) = &config.ibm.instance {
                        backend_config = backend_config.with_extra("instance", json!(instance));
                    }
                    IbmBackend::with_config(&backend_config)
                }
                None => IbmBackend::from_env(target).await,
            };
            let backend = backend.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to connect to IBM Quantum: {e}. Set IBM_API_KEY + IBM_SERVICE_CRN (or IBM_QUANTUM_TOKEN)."
                )
            })?;
            info!(device = backend.target(), "Connected to IBM Quantum");
            Ok(Arc::new(backend))
        }
        other => anyhow::bail!("Unknown backend: '{other}'. Available: simulator, ibm"),
    }
}

/// Open an execution context, naming the backend on failure.
pub async fn open_context(backend: Arc<dyn Backend>) -> Result<ExecutionContext> {
    let name = backend.name().to_string();
    ExecutionContext::open(backend)
        .await
        .with_context(|| format!("Backend '{name}' is not available"))
}

/// A steady-ticking spinner with `message`.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print execution results in a table format.
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots().max(1) as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}

/// Print the classification line for an outcome.
pub fn print_classification(outcome: &DeutschJozsaOutcome) {
    let class = match outcome.classification {
        Classification::Constant => style("CONSTANT").blue().bold(),
        Classification::Balanced => style("BALANCED").magenta().bold(),
    };
    let verdict = if outcome.is_correct() {
        style("matches oracle").green()
    } else {
        style("does NOT match oracle").red()
    };
    println!(
        "\n  Oracle {} classified as {} ({})",
        style(outcome.oracle).yellow(),
        class,
        verdict
    );
}
