//! Backends command implementation.

use anyhow::Result;
use console::style;

use jozsa_hal::Backend;

use super::common::{BackendChoice, create_backend};
use crate::config::Config;

/// Execute the backends command.
pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Available backends:\n", style("Jozsa").cyan().bold());

    let sim_choice = BackendChoice::resolve(config, Some("simulator".into()), None, None);
    let sim = create_backend(config, &sim_choice).await?;
    print_backend(sim.as_ref(), "(local)").await;

    let ibm_choice = BackendChoice::resolve(config, Some("ibm".into()), None, None);
    match create_backend(config, &ibm_choice).await {
        Ok(ibm) => print_backend(ibm.as_ref(), "").await,
        Err(_) => {
            println!(
                "  {} {} (not configured)",
                style("○").dim(),
                style("ibm").dim()
            );
            println!("    Set IBM_API_KEY + IBM_SERVICE_CRN or IBM_QUANTUM_TOKEN to enable");
            println!();
        }
    }

    Ok(())
}

async fn print_backend(backend: &dyn Backend, note: &str) {
    let caps = backend.capabilities();
    let availability = backend.availability().await.ok();
    let available = availability.as_ref().is_some_and(|a| a.is_available);

    println!(
        "  {} {} {}",
        if available {
            style("●").green()
        } else {
            style("○").yellow()
        },
        style(backend.name()).bold(),
        if caps.name == backend.name() {
            note.to_string()
        } else {
            format!("({}) {note}", caps.name)
        }
    );
    println!("    Qubits: {}", caps.num_qubits);
    println!("    Max shots: {}", caps.max_shots);
    println!(
        "    Gates: {}",
        caps.gate_set
            .single_qubit
            .iter()
            .chain(&caps.gate_set.two_qubit)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(queue) = availability.as_ref().and_then(|a| a.queue_depth) {
        println!("    Queue: {queue} jobs");
    }
    if !available {
        let reason = availability
            .and_then(|a| a.status_message)
            .unwrap_or_else(|| "offline or maintenance".into());
        println!("    Status: {reason}");
    }
    println!();
}
