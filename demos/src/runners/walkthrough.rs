//! Walkthrough runner: every oracle, one after another, on the simulator.

use std::sync::Arc;

use jozsa_adapter_sim::SimulatorBackend;
use jozsa_algo::{AlgoResult, DEFAULT_SHOTS, DeutschJozsa, DeutschJozsaOutcome, Oracle};
use jozsa_hal::ExecutionContext;
use jozsa_ir::Circuit;
use tracing::info;

/// One oracle's leg of the walkthrough.
#[derive(Debug, Clone)]
pub struct WalkthroughStep {
    /// The submitted circuit.
    pub circuit: Circuit,
    /// What the run produced.
    pub outcome: DeutschJozsaOutcome,
}

/// Runs Deutsch-Jozsa for a list of oracles at a fixed register size.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    pub num_qubits: u32,
    pub shots: u32,
    pub seed: Option<u64>,
    pub oracles: Vec<Oracle>,
}

impl Walkthrough {
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            shots: DEFAULT_SHOTS,
            seed: None,
            oracles: vec![
                Oracle::constant(false),
                Oracle::constant(true),
                Oracle::balanced(),
            ],
        }
    }

    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_oracles(mut self, oracles: Vec<Oracle>) -> Self {
        self.oracles = oracles;
        self
    }

    /// A fresh simulator honoring the configured seed.
    pub fn backend(&self) -> SimulatorBackend {
        match self.seed {
            Some(seed) => SimulatorBackend::new().with_seed(seed),
            None => SimulatorBackend::new(),
        }
    }

    /// Run a single oracle inside an open context.
    pub async fn step(
        &self,
        ctx: &mut ExecutionContext,
        oracle: Oracle,
    ) -> AlgoResult<WalkthroughStep> {
        let experiment = DeutschJozsa::new(self.num_qubits, oracle).with_shots(self.shots);
        let circuit = experiment.circuit()?;
        let outcome = experiment.run(ctx).await?;
        Ok(WalkthroughStep { circuit, outcome })
    }

    async fn steps(&self, ctx: &mut ExecutionContext) -> AlgoResult<Vec<WalkthroughStep>> {
        let mut steps = Vec::with_capacity(self.oracles.len());
        for &oracle in &self.oracles {
            steps.push(self.step(ctx, oracle).await?);
        }
        Ok(steps)
    }

    /// Run every oracle in order on one simulator session. The session is
    /// closed even when a step fails.
    pub async fn run(&self) -> AlgoResult<Vec<WalkthroughStep>> {
        let mut ctx = ExecutionContext::open(Arc::new(self.backend())).await?;
        let steps = self.steps(&mut ctx).await;
        ctx.close().await?;
        let steps = steps?;

        info!(
            oracles = steps.len(),
            correct = steps.iter().filter(|s| s.outcome.is_correct()).count(),
            "Walkthrough finished"
        );
        Ok(steps)
    }
}
