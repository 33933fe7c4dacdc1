//! `OpenQASM` 3 emitter for Jozsa circuits.
//!
//! Serializes a [`jozsa_ir::Circuit`] into `OpenQASM` 3.0 source, the wire
//! format used for remote submission and for `jozsa circuit`.
//!
//! | Construct | Output |
//! |-----------|--------|
//! | Header | `OPENQASM 3.0;` + `include "stdgates.inc";` |
//! | Qubits | `qubit[5] q;` |
//! | Classical bits | `bit[5] c;` |
//! | Gates | `h q[0];`, `cx q[0], q[1];` |
//! | Measurements | `c[0] = measure q[0];` |
//! | Barriers | `barrier q[0], q[1];` |
//! | Reset | `reset q[0];` |
//!
//! # Example
//!
//! ```rust
//! use jozsa_ir::{Circuit, QubitId};
//! use jozsa_qasm3::emit;
//!
//! let mut circuit = Circuit::with_size("pair", 2, 0);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.starts_with("OPENQASM 3.0;"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```

mod emitter;
mod error;

pub use emitter::emit;
pub use error::{QasmError, QasmResult};
