//! Check command implementation.
//!
//! Runs the three-qubit constant and balanced oracles on the local simulator
//! and fails unless both are classified correctly.

use anyhow::Result;
use console::style;

use jozsa_algo::{DeutschJozsa, Oracle};
use jozsa_hal::ExecutionContext;

use super::common::{BackendChoice, create_backend, open_context, print_classification, print_results};
use crate::config::Config;

const CHECK_QUBITS: u32 = 3;
const CHECK_SHOTS: u32 = 1024;

/// Execute the check command.
pub async fn execute(config: &Config) -> Result<()> {
    let choice = BackendChoice::resolve(config, Some("simulator".into()), None, None);
    let backend = create_backend(config, &choice).await?;
    let mut ctx = open_context(backend).await?;

    let failures = classify_all(&mut ctx).await;
    ctx.close().await?;
    let failures = failures?;

    if !failures.is_empty() {
        anyhow::bail!("Classification mismatch ({})", failures.join("; "));
    }

    println!("{} All oracles classified correctly", style("✓").green().bold());
    Ok(())
}

/// Run each check oracle, collecting misclassifications.
async fn classify_all(ctx: &mut ExecutionContext) -> Result<Vec<String>> {
    let mut failures = Vec::new();
    for oracle in [Oracle::constant(false), Oracle::balanced()] {
        println!(
            "{} {} oracle, n = {}",
            style("→").cyan().bold(),
            style(oracle).green(),
            CHECK_QUBITS
        );

        let outcome = DeutschJozsa::new(CHECK_QUBITS, oracle)
            .with_shots(CHECK_SHOTS)
            .run(ctx)
            .await?;
        print_results(&outcome.result);
        print_classification(&outcome);
        println!();

        if !outcome.is_correct() {
            failures.push(format!(
                "{oracle}: expected {}, got {}",
                outcome.expected, outcome.classification
            ));
        }
    }
    Ok(failures)
}
