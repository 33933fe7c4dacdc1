//! Backend capability introspection.

use jozsa_ir::{Circuit, InstructionKind, StandardGate};
use serde::{Deserialize, Serialize};

use crate::backend::ValidationResult;

/// Hardware capabilities of a quantum backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
}

impl Capabilities {
    /// Create capabilities for the local simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
        }
    }

    /// Create capabilities for an IBM Quantum device.
    ///
    /// Circuits are submitted with server-side transpilation, so every
    /// `stdgates.inc` gate is accepted.
    pub fn ibm(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: false,
        }
    }

    /// Check a circuit against qubit count and gate set.
    pub fn check(&self, circuit: &Circuit) -> ValidationResult {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > self.num_qubits as usize {
            reasons.push(format!(
                "circuit uses {} qubits, backend '{}' has {}",
                circuit.num_qubits(),
                self.name,
                self.num_qubits
            ));
        }

        for inst in circuit.instructions() {
            if let InstructionKind::Gate(gate) = inst.kind {
                if !self.gate_set.contains(gate.name()) {
                    let reason = format!("gate '{}' is not supported", gate.name());
                    if !reasons.contains(&reason) {
                        reasons.push(reason);
                    }
                }
            }
        }

        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }
}

/// Gate set supported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Every built-in gate.
    pub fn universal() -> Self {
        let all = [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::CX,
            StandardGate::CZ,
            StandardGate::Swap,
            StandardGate::CCX,
        ];
        let by_arity = |n: u32| {
            all.iter()
                .filter(|g| g.num_qubits() == n)
                .map(|g| g.name().to_string())
                .collect::<Vec<_>>()
        };
        Self {
            single_qubit: by_arity(1),
            two_qubit: by_arity(2),
            three_qubit: by_arity(3),
        }
    }

    /// Whether the named gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .any(|g| g == gate)
    }
}
