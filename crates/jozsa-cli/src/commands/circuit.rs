//! Circuit command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use jozsa_algo::{Oracle, deutsch_jozsa_circuit};
use jozsa_qasm3::emit;

/// Execute the circuit command.
pub fn execute(n: u32, oracle: Oracle, output: Option<&Path>) -> Result<()> {
    let circuit = deutsch_jozsa_circuit(n, &oracle)?;
    let qasm = emit(&circuit)?;

    match output {
        Some(path) => {
            fs::write(path, &qasm)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Wrote {} ({} qubits, depth {})",
                style("✓").green().bold(),
                style(path.display()).green(),
                circuit.num_qubits(),
                circuit.depth()
            );
        }
        None => print!("{qasm}"),
    }

    Ok(())
}
