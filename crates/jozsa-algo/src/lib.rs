//! The Deutsch-Jozsa algorithm.
//!
//! Given a black-box function `f: {0,1}^n → {0,1}` promised to be either
//! constant or balanced, one query to its quantum oracle decides which:
//!
//! ```text
//!  q[0..n] ─────H──░──┌────────┐──░──H──M──
//!                     │ oracle │
//!  q[n]    ──X──H──░──└────────┘──░────────
//! ```
//!
//! A constant oracle leaves every data qubit in `|+⟩`, so the final
//! Hadamards return them to `|0…0⟩`. A balanced oracle kicks a phase back
//! onto the data register and the all-zero outcome has probability zero.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use jozsa_algo::{Classification, DeutschJozsa, Oracle};
//! use jozsa_adapter_sim::SimulatorBackend;
//! use jozsa_hal::ExecutionContext;
//!
//! let mut ctx = ExecutionContext::open(Arc::new(SimulatorBackend::new())).await?;
//! let outcome = DeutschJozsa::new(3, Oracle::balanced()).run(&mut ctx).await?;
//! assert_eq!(outcome.classification, Classification::Balanced);
//! ctx.close().await?;
//! ```

mod circuit;
mod classify;
mod error;
mod oracle;
mod runner;

pub use circuit::deutsch_jozsa_circuit;
pub use classify::{Classification, classify, is_all_zero};
pub use error::{AlgoError, AlgoResult};
pub use oracle::{Oracle, balanced_oracle, constant_oracle};
pub use runner::{DEFAULT_SHOTS, DeutschJozsa, DeutschJozsaOutcome};
