//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The built-in gate set.
///
/// Every gate here is Clifford+T and parameter-free, which is all the
/// Deutsch-Jozsa circuits and their oracles ever need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X (bit-flip) gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z (phase-flip) gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Toffoli gate (CCX).
    CCX,
}

impl StandardGate {
    /// OpenQASM 3 (`stdgates.inc`) name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
        }
    }

    /// Number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,

            StandardGate::CCX => 3,
        }
    }

    /// Whether the gate is its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        !matches!(
            self,
            StandardGate::S | StandardGate::Sdg | StandardGate::T | StandardGate::Tdg
        )
    }

    /// Look a gate up by its OpenQASM name.
    pub fn from_name(name: &str) -> Option<Self> {
        let gate = match name {
            "id" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "cx" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            "swap" => StandardGate::Swap,
            "ccx" => StandardGate::CCX,
            _ => return None,
        };
        Some(gate)
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [StandardGate; 13] = [
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

    #[test]
    fn test_standard_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
    }

    #[test]
    fn test_name_lookup_is_consistent() {
        for gate in ALL {
            assert_eq!(StandardGate::from_name(gate.name()), Some(gate));
        }
        assert_eq!(StandardGate::from_name("rzz"), None);
    }

    #[test]
    fn test_self_inverse() {
        assert!(StandardGate::H.is_self_inverse());
        assert!(StandardGate::CX.is_self_inverse());
        assert!(!StandardGate::T.is_self_inverse());
    }
}
