//! Integration tests for the demo suite.
//!
//! The walkthrough runs on the seeded local simulator, so every
//! classification here is deterministic.

use jozsa_algo::{AlgoError, Classification, Oracle};
use jozsa_demos::histogram_rows;
use jozsa_demos::runners::Walkthrough;
use jozsa_hal::{Counts, HalError};

/// Every default oracle is classified correctly.
#[tokio::test]
async fn test_walkthrough_classifies_every_oracle() {
    let steps = Walkthrough::new(3).with_seed(11).run().await.unwrap();

    assert_eq!(steps.len(), 3);
    let classes: Vec<_> = steps.iter().map(|s| s.outcome.classification).collect();
    assert_eq!(
        classes,
        vec![
            Classification::Constant,
            Classification::Constant,
            Classification::Balanced
        ]
    );
    assert!(steps.iter().all(|s| s.outcome.is_correct()));
}

/// Circuits carry the ancilla but only measure the data register.
#[tokio::test]
async fn test_walkthrough_circuit_shape() {
    let steps = Walkthrough::new(4)
        .with_shots(32)
        .with_oracles(vec![Oracle::balanced()])
        .run()
        .await
        .unwrap();

    let step = &steps[0];
    assert_eq!(step.circuit.num_qubits(), 5);
    assert_eq!(step.circuit.num_clbits(), 4);
    assert_eq!(step.outcome.result.counts.get("1111"), 32);
}

/// Shot totals follow the configured count.
#[tokio::test]
async fn test_walkthrough_shot_totals() {
    let steps = Walkthrough::new(2).with_shots(100).run().await.unwrap();
    for step in &steps {
        assert_eq!(step.outcome.result.counts.total_shots(), 100);
    }
}

/// An empty register fails before anything is submitted.
#[tokio::test]
async fn test_walkthrough_rejects_zero_qubits() {
    let err = Walkthrough::new(0).run().await.unwrap_err();
    assert!(matches!(err, AlgoError::InvalidQubitCount(0)));
}

/// A register wider than the simulator fails at submission, and the
/// walkthrough reports it instead of panicking.
#[tokio::test]
async fn test_walkthrough_reports_oversized_register() {
    let err = Walkthrough::new(30).with_shots(8).run().await.unwrap_err();
    assert!(matches!(err, AlgoError::Hal(HalError::InvalidCircuit(_))));
}

/// Histogram rows are ordered by count and scaled to the bar width.
#[test]
fn test_histogram_rows() {
    let counts: Counts = [("01", 30u64), ("11", 10u64)].into_iter().collect();
    let rows = histogram_rows(&counts);

    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("01"));
    assert_eq!(rows[0].matches('█').count(), 30);
    assert!(rows[1].starts_with("11"));
    assert_eq!(rows[1].matches('█').count(), 10);
}

#[test]
fn test_histogram_rows_empty() {
    assert!(histogram_rows(&Counts::new()).is_empty());
}
