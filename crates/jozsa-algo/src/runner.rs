//! Running the algorithm against a backend.

use jozsa_hal::{ExecutionContext, ExecutionResult};
use jozsa_ir::Circuit;
use serde::Serialize;
use tracing::{info, instrument};

use crate::circuit::deutsch_jozsa_circuit;
use crate::classify::{Classification, classify};
use crate::error::AlgoResult;
use crate::oracle::Oracle;

/// Shots used when none are configured.
pub const DEFAULT_SHOTS: u32 = 1024;

/// One Deutsch-Jozsa experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeutschJozsa {
    /// Data qubits (the ancilla is extra).
    pub num_qubits: u32,
    /// Oracle under test.
    pub oracle: Oracle,
    /// Repetitions.
    pub shots: u32,
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeutschJozsaOutcome {
    /// Data qubits.
    pub num_qubits: u32,
    /// Oracle that was queried.
    pub oracle: Oracle,
    /// Class read from the histogram.
    pub classification: Classification,
    /// Class the oracle actually belongs to.
    pub expected: Classification,
    /// Raw backend result.
    pub result: ExecutionResult,
}

impl DeutschJozsaOutcome {
    /// Whether the measured class matches the oracle.
    pub fn is_correct(&self) -> bool {
        self.classification == self.expected
    }
}

impl DeutschJozsa {
    /// Experiment with [`DEFAULT_SHOTS`] shots.
    pub fn new(num_qubits: u32, oracle: Oracle) -> Self {
        Self {
            num_qubits,
            oracle,
            shots: DEFAULT_SHOTS,
        }
    }

    /// Override the shot count.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// The circuit this experiment submits.
    pub fn circuit(&self) -> AlgoResult<Circuit> {
        deutsch_jozsa_circuit(self.num_qubits, &self.oracle)
    }

    /// Build, execute and classify.
    #[instrument(skip(self, ctx), fields(n = self.num_qubits, oracle = %self.oracle, shots = self.shots))]
    pub async fn run(&self, ctx: &mut ExecutionContext) -> AlgoResult<DeutschJozsaOutcome> {
        let circuit = self.circuit()?;
        let result = ctx.execute(&circuit, self.shots).await?;
        let classification = classify(&result.counts);

        info!(
            classification = %classification,
            expected = %self.oracle.expected(),
            distinct = result.counts.len(),
            "Deutsch-Jozsa run finished"
        );

        Ok(DeutschJozsaOutcome {
            num_qubits: self.num_qubits,
            oracle: self.oracle,
            classification,
            expected: self.oracle.expected(),
            result,
        })
    }
}
