//! IBM Quantum backend adapter for Jozsa.
//!
//! Submits circuits as OpenQASM 3 through the Qiskit Runtime Sampler
//! primitive and converts the returned samples back into [`Counts`].
//!
//! Two authentication modes are supported, and both take their credentials
//! explicitly:
//!
//! | Mode | Constructor | Endpoint |
//! |------|-------------|----------|
//! | Legacy token | [`IbmBackend::connect`] | `api.quantum-computing.ibm.com` |
//! | IBM Cloud (IAM) | [`IbmBackend::connect_cloud`] | `quantum.cloud.ibm.com/api` |
//!
//! [`IbmBackend::from_env`] picks the cloud flow when `IBM_API_KEY` and
//! `IBM_SERVICE_CRN` are set and falls back to `IBM_QUANTUM_TOKEN`.
//!
//! [`Counts`]: jozsa_hal::Counts

mod api;
mod backend;
mod error;

pub use api::{BackendInfo, BackendStatus, DEFAULT_ENDPOINT, IbmClient, LEGACY_ENDPOINT};
pub use backend::{DEFAULT_TARGET, IbmBackend};
pub use error::{IbmError, IbmResult};
