//! Jozsa Local Statevector Simulator
//!
//! Exact, noiseless simulation of small circuits. This is the default
//! execution engine for the Deutsch-Jozsa runner and the CLI.
//!
//! - **Exact amplitudes**: full statevector, 2^n complex numbers
//! - **Fast sampling**: circuits whose measurements are all terminal are
//!   simulated once and sampled `shots` times; anything else is replayed
//!   per shot with projective collapse
//! - **Reproducible**: [`SimulatorBackend::with_seed`] fixes the sampler
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//! | 30 | ~16 GB (upper limit) |
//!
//! # Example
//!
//! ```ignore
//! use jozsa_adapter_sim::SimulatorBackend;
//! use jozsa_hal::Backend;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let job_id = backend.submit(&circuit, 1024).await?;
//! let result = backend.wait(&job_id).await?;
//! println!("{}", result.counts);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS, SimulatorBackend};
