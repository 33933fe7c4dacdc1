//! Error types for the QASM3 emitter.

use thiserror::Error;

/// Errors that can occur while emitting QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// An operand does not fit in the declared register.
    #[error("Operand {operand} is outside register '{register}' of size {size}")]
    OperandOutOfRange {
        /// Register name (`q` or `c`).
        register: &'static str,
        /// Offending index.
        operand: u32,
        /// Declared register size.
        size: usize,
    },

    /// A measurement without matching classical targets.
    #[error("Malformed measurement: {0}")]
    MalformedMeasure(String),
}

/// Result type for emitter operations.
pub type QasmResult<T> = Result<T, QasmError>;
