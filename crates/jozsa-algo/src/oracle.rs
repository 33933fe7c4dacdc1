//! Oracle sub-circuits.
//!
//! Both oracles act on `n + 1` qubits: data qubits `q[0..n]` and the
//! ancilla `q[n]`, which receives `f(x)` by XOR.

use std::fmt;
use std::str::FromStr;

use jozsa_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::error::{AlgoError, AlgoResult};

/// A Deutsch-Jozsa oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Oracle {
    /// `f(x) = output` for every input.
    Constant {
        /// The fixed output bit.
        output: bool,
    },
    /// `f(x) = x[0] ⊕ x[1] ⊕ … ⊕ x[n-1]`.
    Balanced,
}

impl Oracle {
    /// Constant oracle returning `output`.
    pub fn constant(output: bool) -> Self {
        Oracle::Constant { output }
    }

    /// Parity oracle.
    pub fn balanced() -> Self {
        Oracle::Balanced
    }

    /// Build the oracle circuit over `n` data qubits and one ancilla.
    pub fn build(&self, n: u32) -> AlgoResult<Circuit> {
        match *self {
            Oracle::Constant { output } => constant_oracle(n, output),
            Oracle::Balanced => balanced_oracle(n),
        }
    }

    /// The classical function this oracle encodes.
    pub fn evaluate(&self, input: &[bool]) -> bool {
        match *self {
            Oracle::Constant { output } => output,
            Oracle::Balanced => input.iter().fold(false, |acc, &bit| acc ^ bit),
        }
    }

    /// The class a correct run must report.
    pub fn expected(&self) -> Classification {
        match self {
            Oracle::Constant { .. } => Classification::Constant,
            Oracle::Balanced => Classification::Balanced,
        }
    }

    /// Short name, as accepted by [`FromStr`].
    pub fn label(&self) -> &'static str {
        match self {
            Oracle::Constant { output: false } => "constant0",
            Oracle::Constant { output: true } => "constant1",
            Oracle::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Oracle {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant0" | "constant-0" | "constant" => Ok(Oracle::constant(false)),
            "constant1" | "constant-1" => Ok(Oracle::constant(true)),
            "balanced" => Ok(Oracle::Balanced),
            _ => Err(AlgoError::UnknownOracle(s.to_string())),
        }
    }
}

/// Total width `n + 1`, rejecting an empty data register.
pub(crate) fn register_width(n: u32) -> AlgoResult<u32> {
    if n == 0 {
        return Err(AlgoError::InvalidQubitCount(n));
    }
    n.checked_add(1).ok_or(AlgoError::InvalidQubitCount(n))
}

/// Constant oracle: X on the ancilla when `output` is 1, identity otherwise.
pub fn constant_oracle(n: u32, output: bool) -> AlgoResult<Circuit> {
    let width = register_width(n)?;
    let mut circuit = Circuit::with_size(format!("constant{}", u8::from(output)), width, 0);
    if output {
        circuit.x(QubitId(n))?;
    }
    Ok(circuit)
}

/// Balanced oracle: CX from every data qubit onto the ancilla.
pub fn balanced_oracle(n: u32) -> AlgoResult<Circuit> {
    let width = register_width(n)?;
    let mut circuit = Circuit::with_size("balanced", width, 0);
    for i in 0..n {
        circuit.cx(QubitId(i), QubitId(n))?;
    }
    Ok(circuit)
}
