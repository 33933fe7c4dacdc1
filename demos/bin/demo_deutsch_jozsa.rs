//! Deutsch-Jozsa Algorithm Demo
//!
//! Walks through constant and balanced oracles on the local simulator,
//! showing the circuit, the measured histogram and the verdict for each.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jozsa_algo::{Classification, Oracle};
use jozsa_demos::runners::Walkthrough;
use jozsa_demos::{
    create_spinner, print_failure, print_header, print_histogram, print_info, print_result,
    print_section, print_success,
};
use jozsa_hal::ExecutionContext;
use jozsa_qasm3::emit;

#[derive(Parser, Debug)]
#[command(name = "demo-deutsch-jozsa")]
#[command(about = "Demonstrate the Deutsch-Jozsa algorithm")]
struct Args {
    /// Number of data qubits
    #[arg(short = 'n', long, default_value = "3")]
    qubits: u32,

    /// Number of shots per oracle
    #[arg(short, long, default_value = "1024")]
    shots: u32,

    /// Simulator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Only run this oracle (constant0, constant1, balanced)
    #[arg(long)]
    oracle: Option<Oracle>,

    /// Show generated QASM code
    #[arg(long)]
    show_qasm: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .init();

    print_header("Deutsch-Jozsa Algorithm Demo");

    let mut walkthrough = Walkthrough::new(args.qubits).with_shots(args.shots);
    if let Some(seed) = args.seed {
        walkthrough = walkthrough.with_seed(seed);
    }
    if let Some(oracle) = args.oracle {
        walkthrough = walkthrough.with_oracles(vec![oracle]);
    }

    print_section("Problem Setup");
    print_result("Data qubits", args.qubits);
    print_result("Ancilla", format!("q[{}]", args.qubits));
    print_result("Input space", format!("2^{} strings", args.qubits));
    print_result("Shots per oracle", args.shots);
    println!();
    println!("  A function f: {{0,1}}^n → {{0,1}} is promised to be either");
    println!("  constant (same output everywhere) or balanced (1 on exactly half");
    println!("  the inputs). Classically, telling them apart can take");
    println!(
        "  2^(n-1) + 1 = {} queries. Deutsch-Jozsa needs one.",
        (1u64 << args.qubits.saturating_sub(1).min(63)) + 1
    );

    let mut ctx = match ExecutionContext::open(Arc::new(walkthrough.backend())).await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut mismatches = 0;
    for &oracle in &walkthrough.oracles {
        print_section(&format!("Oracle: {oracle}"));
        match oracle {
            Oracle::Constant { output } => {
                println!("  f(x) = {} for every x", u8::from(output));
            }
            Oracle::Balanced => {
                println!("  f(x) = x[0] ⊕ x[1] ⊕ ... ⊕ x[n-1] (parity)");
            }
        }

        let spinner = create_spinner("Simulating...");
        let step = walkthrough.step(&mut ctx, oracle).await;
        spinner.finish_and_clear();

        let step = match step {
            Ok(step) => step,
            Err(e) => {
                eprintln!("Error: {e}");
                let _ = ctx.close().await;
                std::process::exit(1);
            }
        };

        print_result("Circuit qubits", step.circuit.num_qubits());
        print_result("Classical bits", step.circuit.num_clbits());
        print_result("Circuit depth", step.circuit.depth());
        print_result("Operations", step.circuit.dag().num_ops());

        if args.show_qasm {
            println!();
            match emit(&step.circuit) {
                Ok(qasm) => println!("{qasm}"),
                Err(e) => eprintln!("Error generating QASM: {e}"),
            }
        }

        println!();
        print_histogram(&step.outcome.result.counts);
        println!();

        let verdict = match step.outcome.classification {
            Classification::Constant => "all shots read zero, so f is constant",
            Classification::Balanced => "a nonzero string appeared, so f is balanced",
        };
        if step.outcome.is_correct() {
            print_success(verdict);
        } else {
            mismatches += 1;
            print_failure(&format!(
                "{verdict}, but the oracle is {}",
                step.outcome.expected
            ));
        }
    }

    if let Err(e) = ctx.close().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    print_section("Why It Works");
    println!("  After the final Hadamards, the amplitude of |0...0⟩ is");
    println!("  (1/2^n) Σ (-1)^f(x). It has magnitude 1 when f is constant");
    println!("  and cancels to 0 when f is balanced, so a single query decides.");

    println!();
    if mismatches == 0 {
        print_success("Deutsch-Jozsa demo complete!");
    } else {
        print_failure(&format!("{mismatches} oracle(s) misclassified"));
        std::process::exit(1);
    }
    println!();
    print_info("Run `jozsa run --backend ibm` to try the same circuit on hardware.");
}
