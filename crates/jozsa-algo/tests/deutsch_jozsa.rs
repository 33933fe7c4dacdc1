//! End-to-end Deutsch-Jozsa runs on the local simulator.

use std::sync::Arc;

use jozsa_adapter_sim::SimulatorBackend;
use jozsa_algo::{
    AlgoError, Classification, DeutschJozsa, DeutschJozsaOutcome, Oracle, classify,
    deutsch_jozsa_circuit, is_all_zero,
};
use jozsa_hal::{Backend, ExecutionContext, HalError};
use proptest::prelude::*;

async fn run_on_simulator(n: u32, oracle: Oracle, shots: u32, seed: u64) -> DeutschJozsaOutcome {
    let backend = Arc::new(SimulatorBackend::new().with_seed(seed));
    let mut ctx = ExecutionContext::open(backend).await.unwrap();
    let outcome = DeutschJozsa::new(n, oracle)
        .with_shots(shots)
        .run(&mut ctx)
        .await
        .unwrap();
    ctx.close().await.unwrap();
    outcome
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn arb_oracle() -> impl Strategy<Value = Oracle> {
    prop_oneof![
        Just(Oracle::constant(false)),
        Just(Oracle::constant(true)),
        Just(Oracle::balanced()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn constant_zero_always_reads_all_zero(n in 1u32..=8, shots in 1u32..=256, seed in any::<u64>()) {
        let outcome = block_on(run_on_simulator(n, Oracle::constant(false), shots, seed));
        let zeros = "0".repeat(n as usize);
        prop_assert!(outcome.result.counts.is_only(&zeros));
        prop_assert_eq!(outcome.result.counts.get(&zeros), u64::from(shots));
    }

    #[test]
    fn constant_one_always_reads_all_zero(n in 1u32..=8, shots in 1u32..=256, seed in any::<u64>()) {
        let outcome = block_on(run_on_simulator(n, Oracle::constant(true), shots, seed));
        prop_assert!(outcome.result.counts.is_only(&"0".repeat(n as usize)));
        prop_assert_eq!(outcome.classification, Classification::Constant);
    }

    #[test]
    fn balanced_never_reads_all_zero(n in 1u32..=8, shots in 1u32..=256, seed in any::<u64>()) {
        let outcome = block_on(run_on_simulator(n, Oracle::balanced(), shots, seed));
        for (bitstring, _) in outcome.result.counts.iter() {
            prop_assert!(!is_all_zero(bitstring));
        }
        prop_assert!(outcome.result.counts.is_only(&"1".repeat(n as usize)));
        prop_assert_eq!(outcome.classification, Classification::Balanced);
    }

    #[test]
    fn classification_matches_oracle(n in 1u32..=6, oracle in arb_oracle(), seed in any::<u64>()) {
        let outcome = block_on(run_on_simulator(n, oracle, 64, seed));
        prop_assert!(outcome.is_correct());
        prop_assert_eq!(outcome.expected, oracle.expected());
    }

    #[test]
    fn circuit_shape_follows_register_size(n in 1u32..=32, oracle in arb_oracle()) {
        let circuit = deutsch_jozsa_circuit(n, &oracle).unwrap();
        prop_assert_eq!(circuit.num_qubits(), n as usize + 1);
        prop_assert_eq!(circuit.num_clbits(), n as usize);
        let ops = circuit.count_ops();
        prop_assert_eq!(ops.get("measure").copied(), Some(n as usize));
        prop_assert_eq!(ops.get("h").copied(), Some(2 * n as usize + 1));
    }
}

#[tokio::test]
async fn test_reruns_agree() {
    let mut seen = Vec::new();
    for seed in 0..5 {
        for oracle in [Oracle::constant(false), Oracle::balanced()] {
            let outcome = run_on_simulator(3, oracle, 128, seed).await;
            seen.push((oracle, outcome.classification));
        }
    }
    for (oracle, classification) in seen {
        assert_eq!(classification, oracle.expected());
    }
}

#[tokio::test]
async fn test_three_qubit_balanced_excludes_zero_string() {
    let outcome = run_on_simulator(3, Oracle::balanced(), 1024, 7).await;
    assert_eq!(outcome.classification, Classification::Balanced);
    assert_eq!(outcome.result.counts.get("000"), 0);
    assert_eq!(outcome.result.counts.total_shots(), 1024);
}

#[tokio::test]
async fn test_three_qubit_constant_one_is_single_entry() {
    let outcome = run_on_simulator(3, Oracle::constant(true), 1024, 7).await;
    assert_eq!(outcome.result.counts.len(), 1);
    assert_eq!(outcome.result.counts.get("000"), 1024);
    assert_eq!(classify(&outcome.result.counts), Classification::Constant);
    assert!(outcome.is_correct());
}

#[tokio::test]
async fn test_zero_qubits_rejected() {
    let mut ctx = ExecutionContext::open(Arc::new(SimulatorBackend::new()))
        .await
        .unwrap();
    let err = DeutschJozsa::new(0, Oracle::balanced())
        .run(&mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, AlgoError::InvalidQubitCount(0)));
    assert!(ctx.submitted_jobs().is_empty());
}

#[tokio::test]
async fn test_zero_shots_rejected() {
    let mut ctx = ExecutionContext::open(Arc::new(SimulatorBackend::new()))
        .await
        .unwrap();
    let err = DeutschJozsa::new(3, Oracle::balanced())
        .with_shots(0)
        .run(&mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, AlgoError::Hal(HalError::InvalidShots(_))));
}

#[tokio::test]
async fn test_register_wider_than_simulator_rejected() {
    let mut ctx = ExecutionContext::open(Arc::new(SimulatorBackend::with_max_qubits(4)))
        .await
        .unwrap();
    let err = DeutschJozsa::new(4, Oracle::balanced())
        .run(&mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, AlgoError::Hal(HalError::InvalidCircuit(_))));

    let backend = SimulatorBackend::with_max_qubits(4);
    let circuit = deutsch_jozsa_circuit(4, &Oracle::balanced()).unwrap();
    assert!(matches!(
        backend.submit(&circuit, 16).await,
        Err(HalError::CircuitTooLarge(_))
    ));
}

#[tokio::test]
async fn test_closed_context_refuses_runs() {
    let mut ctx = ExecutionContext::open(Arc::new(SimulatorBackend::new()))
        .await
        .unwrap();
    ctx.close().await.unwrap();
    let err = DeutschJozsa::new(2, Oracle::balanced())
        .run(&mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, AlgoError::Hal(HalError::ContextClosed)));
}

#[tokio::test]
async fn test_outcome_serializes_for_reports() {
    let outcome = run_on_simulator(2, Oracle::constant(false), 8, 1).await;
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["classification"], "constant");
    assert_eq!(json["expected"], "constant");
    assert_eq!(json["result"]["counts"]["00"], 8);
}

#[test]
fn test_three_qubit_balanced_qasm() {
    let circuit = deutsch_jozsa_circuit(3, &Oracle::balanced()).unwrap();
    let qasm = jozsa_qasm3::emit(&circuit).unwrap();

    assert!(qasm.contains("qubit[4] q;"));
    assert!(qasm.contains("bit[3] c;"));
    for i in 0..3 {
        assert!(qasm.contains(&format!("cx q[{i}], q[3];")));
        assert!(qasm.contains(&format!("c[{i}] = measure q[{i}];")));
    }
    assert_eq!(qasm.matches(" = measure ").count(), 3);
    assert!(!qasm.contains("measure q[3]"));
}
