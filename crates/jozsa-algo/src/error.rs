//! Error types for the algorithm crate.

use jozsa_hal::HalError;
use jozsa_ir::IrError;
use thiserror::Error;

/// Errors raised while building or running Deutsch-Jozsa.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// The data register must hold at least one qubit.
    #[error("invalid qubit count {0}: need at least 1 data qubit plus room for the ancilla")]
    InvalidQubitCount(u32),

    /// Oracle name not recognised.
    #[error("unknown oracle '{0}' (expected constant0, constant1 or balanced)")]
    UnknownOracle(String),

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Execution failed.
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Result type for algorithm operations.
pub type AlgoResult<T> = Result<T, AlgoError>;
