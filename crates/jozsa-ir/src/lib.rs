//! Jozsa Circuit Intermediate Representation
//!
//! This crate provides the data structures for representing quantum circuits
//! in the Jozsa workspace. The Deutsch-Jozsa builders, the QASM emitter, the
//! simulator and the remote adapters all speak this IR.
//!
//! # Overview
//!
//! Circuits are stored as a DAG (Directed Acyclic Graph) of operations wired
//! by qubit and classical-bit edges. The high-level [`Circuit`] API provides a
//! fluent builder on top of it.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] for the fixed built-in gate set
//! - **Instructions**: [`Instruction`] combining a gate or measurement with operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Phase Kickback
//!
//! ```rust
//! use jozsa_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("kickback", 2, 1);
//! let (data, ancilla) = (QubitId(0), QubitId(1));
//!
//! circuit.x(ancilla).unwrap();
//! circuit.h(data).unwrap().h(ancilla).unwrap();
//! circuit.cx(data, ancilla).unwrap();
//! circuit.h(data).unwrap();
//! circuit.measure(data, ClbitId(0)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.dag().num_ops(), 6);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I` | 1 | Identity |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CZ` | 2 | Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
