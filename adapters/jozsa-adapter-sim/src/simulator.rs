//! Simulator backend implementation.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use jozsa_hal::{
    Backend, BackendAvailability, BackendConfig, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, Job, JobId, JobStatus, ValidationResult,
};
use jozsa_ir::{Circuit, Instruction, InstructionKind, QubitId};

use crate::statevector::Statevector;

/// Default qubit limit of the simulator.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Largest qubit limit the simulator accepts. A 30-qubit statevector
/// already takes 16 GiB.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Jobs run to completion inside `submit`; the job table only serves the
/// status/result/cancel half of the lifecycle. An entry is dropped once its
/// result has been read.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    max_qubits: u32,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits, capped at
    /// [`MAX_SUPPORTED_QUBITS`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        let max_qubits = max_qubits.min(MAX_SUPPORTED_QUBITS);
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits,
            seed: None,
        }
    }

    /// Seed the sampler. Every submission restarts from this seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build from a [`BackendConfig`], reading `max_qubits` and `seed` extras.
    pub fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra.get("max_qubits") {
            None => DEFAULT_MAX_QUBITS,
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .filter(|&n| n > 0)
                .ok_or_else(|| HalError::Configuration(format!("invalid max_qubits: {v}")))?,
        };
        if max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(HalError::Configuration(format!(
                "max_qubits {max_qubits} exceeds the supported limit of {MAX_SUPPORTED_QUBITS}"
            )));
        }
        let seed = match config.extra.get("seed") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .ok_or_else(|| HalError::Configuration(format!("invalid seed: {v}")))?,
            ),
        };

        let capabilities = Capabilities {
            name: config.name.clone(),
            ..Capabilities::simulator(max_qubits)
        };

        Ok(Self {
            config,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits,
            seed,
        })
    }

    /// The configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let mut rng = self.rng();

        let instructions: Vec<&Instruction> = circuit.instructions().collect();
        let counts = if measurements_are_terminal(&instructions) {
            debug!("Terminal measurements, sampling one statevector");
            sample_terminal(circuit, &instructions, shots, &mut rng)
        } else {
            debug!("Mid-circuit measurement or reset, replaying every shot");
            replay_shots(circuit, &instructions, shots, &mut rng)
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata("backend", serde_json::json!(self.config.name))
    }

    fn with_jobs<T>(&self, f: impl FnOnce(&mut FxHashMap<String, SimJob>) -> T) -> T {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut jobs)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// No gate or reset touches a qubit once it has been measured, and no
/// reset occurs at all.
fn measurements_are_terminal(instructions: &[&Instruction]) -> bool {
    let mut measured: Vec<QubitId> = Vec::new();
    for inst in instructions {
        match inst.kind {
            InstructionKind::Reset => return false,
            InstructionKind::Gate(_) => {
                if inst.qubits.iter().any(|q| measured.contains(q)) {
                    return false;
                }
            }
            InstructionKind::Measure => measured.extend(&inst.qubits),
            InstructionKind::Barrier => {}
        }
    }
    true
}

/// Render classical bits with `c[0]` as the rightmost character.
fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}

fn sample_terminal<R: Rng>(
    circuit: &Circuit,
    instructions: &[&Instruction],
    shots: u32,
    rng: &mut R,
) -> Counts {
    let mut sv = Statevector::new(circuit.num_qubits());
    let mut readout: Vec<(usize, usize)> = Vec::new();

    for inst in instructions {
        match inst.kind {
            InstructionKind::Gate(gate) => {
                let qubits: Vec<usize> = inst.qubits.iter().map(|q| q.0 as usize).collect();
                sv.apply_gate(gate, &qubits);
            }
            InstructionKind::Measure => readout.extend(
                inst.qubits
                    .iter()
                    .zip(&inst.clbits)
                    .map(|(q, c)| (q.0 as usize, c.0 as usize)),
            ),
            InstructionKind::Reset | InstructionKind::Barrier => {}
        }
    }

    let mut cumulative = Vec::with_capacity(1 << circuit.num_qubits());
    let mut acc = 0.0;
    for p in sv.probabilities() {
        acc += p;
        cumulative.push(acc);
    }
    let last = cumulative.len().saturating_sub(1);

    let mut per_outcome: FxHashMap<usize, u64> = FxHashMap::default();
    for _ in 0..shots {
        let r: f64 = rng.r#gen::<f64>() * acc;
        let outcome = cumulative.partition_point(|&c| c <= r).min(last);
        *per_outcome.entry(outcome).or_insert(0) += 1;
    }

    let mut counts = Counts::new();
    let mut bits = vec![false; circuit.num_clbits()];
    for (outcome, n) in per_outcome {
        bits.fill(false);
        for &(q, c) in &readout {
            bits[c] = (outcome >> q) & 1 == 1;
        }
        counts.insert(bits_to_string(&bits), n);
    }
    counts
}

fn replay_shots<R: Rng>(
    circuit: &Circuit,
    instructions: &[&Instruction],
    shots: u32,
    rng: &mut R,
) -> Counts {
    let mut counts = Counts::new();
    let mut bits = vec![false; circuit.num_clbits()];

    for _ in 0..shots {
        let mut sv = Statevector::new(circuit.num_qubits());
        bits.fill(false);

        for inst in instructions {
            match inst.kind {
                InstructionKind::Gate(gate) => {
                    let qubits: Vec<usize> = inst.qubits.iter().map(|q| q.0 as usize).collect();
                    sv.apply_gate(gate, &qubits);
                }
                InstructionKind::Measure => {
                    for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                        bits[c.0 as usize] = sv.measure(q.0 as usize, rng);
                    }
                }
                InstructionKind::Reset => {
                    for q in &inst.qubits {
                        sv.reset(q.0 as usize, rng);
                    }
                }
                InstructionKind::Barrier => {}
            }
        }

        counts.insert(bits_to_string(&bits), 1);
    }
    counts
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(self.capabilities.check(circuit))
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots).with_backend(self.config.name.clone());
        self.with_jobs(|jobs| {
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        });
        debug!("Submitted job: {}", job_id);

        self.with_jobs(|jobs| {
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.job.transition(JobStatus::Running);
            }
        });

        let result = self.run_simulation(circuit, shots);

        self.with_jobs(|jobs| {
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.result = Some(result);
                sim_job.job.transition(JobStatus::Completed);
            }
        });

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.with_jobs(|jobs| {
            jobs.get(&job_id.0)
                .map(|j| j.job.status.clone())
                .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
        })
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.with_jobs(|jobs| {
            let status = jobs
                .get(&job_id.0)
                .map(|j| j.job.status.clone())
                .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
            if !status.is_terminal() {
                return Err(HalError::Backend(format!(
                    "job {job_id} has no result yet ({status})"
                )));
            }

            // Terminal jobs leave the table once read.
            let sim_job = jobs
                .remove(&job_id.0)
                .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
            match (status, sim_job.result) {
                (JobStatus::Completed, Some(result)) => Ok(result),
                (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
                (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg)),
                (status, _) => Err(HalError::Backend(format!(
                    "job {job_id} has no result ({status})"
                ))),
            }
        })
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.with_jobs(|jobs| match jobs.get_mut(&job_id.0) {
            Some(sim_job) => {
                sim_job.job.transition(JobStatus::Cancelled);
                Ok(())
            }
            None => Err(HalError::JobNotFound(job_id.0.clone())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jozsa_ir::ClbitId;

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
        assert!(backend.availability().await.unwrap().is_available);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&bell(), 1000).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.total_shots(), 1000);
    }

    #[tokio::test]
    async fn test_bitstring_covers_classical_register_only() {
        // Three qubits, only q1 measured into c0; q2 is flipped but unmeasured.
        let mut circuit = Circuit::with_size("partial", 3, 2);
        circuit
            .x(QubitId(1))
            .unwrap()
            .x(QubitId(2))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();

        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&circuit, 16).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();
        assert!(result.counts.is_only("01"));
    }

    #[tokio::test]
    async fn test_mid_circuit_measurement_path() {
        let mut circuit = Circuit::with_size("reuse", 1, 2);
        circuit
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(1))
            .unwrap();

        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&circuit, 32).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert!(result.counts.is_only("01"));
    }

    #[tokio::test]
    async fn test_reset_path() {
        let mut circuit = Circuit::with_size("reset", 1, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .reset(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();

        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&circuit, 64).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert!(result.counts.is_only("0"));
    }

    #[tokio::test]
    async fn test_seed_makes_sampling_reproducible() {
        let backend = SimulatorBackend::new().with_seed(42);
        let mut circuit = Circuit::with_size("coin", 3, 3);
        for q in 0..3 {
            circuit.h(QubitId(q)).unwrap();
            circuit.measure(QubitId(q), ClbitId(q)).unwrap();
        }

        let a = backend.submit(&circuit, 500).await.unwrap();
        let b = backend.submit(&circuit, 500).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(
            backend.result(&a).await.unwrap().counts,
            backend.result(&b).await.unwrap().counts
        );
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);
        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;
        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
        assert!(!backend.validate(&circuit).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_oversized_limit_is_capped() {
        let backend = SimulatorBackend::with_max_qubits(70);
        assert_eq!(backend.capabilities().num_qubits, MAX_SUPPORTED_QUBITS);

        let wide = Circuit::with_size("wide", 64, 0);
        let result = backend.submit(&wide, 1).await;
        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_result_is_read_once() {
        let backend = SimulatorBackend::new().with_seed(1);
        let job_id = backend.submit(&bell(), 10).await.unwrap();
        assert_eq!(backend.result(&job_id).await.unwrap().shots, 10);

        assert!(backend.jobs.lock().unwrap().is_empty());
        assert!(matches!(
            backend.result(&job_id).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_after_completion_keeps_result() {
        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&bell(), 10).await.unwrap();
        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        assert!(backend.result(&job_id).await.is_ok());
        assert!(matches!(
            backend.status(&job_id).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let backend = SimulatorBackend::new();
        let result = backend.submit(&bell(), 0).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("local")
            .with_extra("max_qubits", serde_json::json!(8))
            .with_extra("seed", serde_json::json!(3));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.capabilities().num_qubits, 8);
        assert_eq!(backend.seed(), Some(3));

        let bad = BackendConfig::new("local").with_extra("max_qubits", serde_json::json!("lots"));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_oversized_limit() {
        let at_limit = BackendConfig::new("simulator")
            .with_extra("max_qubits", serde_json::json!(MAX_SUPPORTED_QUBITS));
        assert!(SimulatorBackend::from_config(at_limit).is_ok());

        let wide = BackendConfig::new("simulator").with_extra("max_qubits", serde_json::json!(70));
        assert!(matches!(
            SimulatorBackend::from_config(wide),
            Err(HalError::Configuration(_))
        ));
    }
}
