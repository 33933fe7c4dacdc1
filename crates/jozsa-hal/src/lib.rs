//! Jozsa Hardware Abstraction Layer
//!
//! A single interface over execution engines, so the Deutsch-Jozsa runner
//! never needs to know whether it talks to the local simulator or to a
//! remote device queue.
//!
//! - [`Backend`]: async job lifecycle (validate, submit, status, result, cancel, wait)
//! - [`Capabilities`]: what a backend accepts
//! - [`ExecutionContext`]: an explicitly opened and closed session against one backend
//! - [`Counts`] / [`ExecutionResult`]: measurement histograms
//! - [`TokenProvider`]: credentials, passed explicitly to remote backends
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local Simulator | `jozsa-adapter-sim` | None |
//! | IBM Quantum | `jozsa-adapter-ibm` | `IBM_QUANTUM_TOKEN`, or `IBM_API_KEY` + `IBM_SERVICE_CRN` |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use jozsa_hal::ExecutionContext;
//! use jozsa_adapter_sim::SimulatorBackend;
//!
//! let mut ctx = ExecutionContext::open(Arc::new(SimulatorBackend::new())).await?;
//! let result = ctx.execute(&circuit, 1024).await?;
//! println!("{}", result.counts);
//! ctx.close().await?;
//! ```

pub mod auth;
pub mod backend;
pub mod capability;
pub mod context;
pub mod error;
pub mod job;
pub mod result;

pub use auth::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
pub use backend::{
    Backend, BackendAvailability, BackendConfig, DEFAULT_WAIT_TIMEOUT, POLL_INTERVAL,
    ValidationResult,
};
pub use capability::{Capabilities, GateSet};
pub use context::ExecutionContext;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
