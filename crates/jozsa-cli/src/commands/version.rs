//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - the Deutsch-Jozsa algorithm, end to end",
        style("Jozsa").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  jozsa-ir           Circuit intermediate representation");
    println!("  jozsa-qasm3        OpenQASM 3 emitter");
    println!("  jozsa-hal          Hardware abstraction layer");
    println!("  jozsa-algo         Oracles, circuit assembly and classification");
    println!("  jozsa-adapter-sim  Local statevector simulator");
    println!("  jozsa-adapter-ibm  IBM Quantum backend");
    println!("  jozsa-cli          Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
