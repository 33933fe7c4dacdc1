//! Explicit execution sessions.
//!
//! An [`ExecutionContext`] owns the connection to one backend for the span
//! of a run:
//!
//! ```text
//!   open(backend) ──→ submit()/wait() or execute() ──→ close()
//! ```
//!
//! `open` refuses unavailable backends. Once closed, every call returns
//! [`HalError::ContextClosed`].

use std::sync::Arc;
use std::time::Duration;

use jozsa_ir::Circuit;
use tracing::{debug, info, instrument, warn};

use crate::backend::{Backend, ValidationResult};
use crate::error::{HalError, HalResult};
use crate::job::JobId;
use crate::result::ExecutionResult;

/// A session against a single backend.
pub struct ExecutionContext {
    backend: Option<Arc<dyn Backend>>,
    submitted: Vec<JobId>,
    wait_timeout: Option<Duration>,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

impl ExecutionContext {
    /// Open a context, failing if the backend reports itself unavailable.
    pub async fn open(backend: Arc<dyn Backend>) -> HalResult<Self> {
        let availability = backend.availability().await?;
        if !availability.is_available {
            let reason = availability
                .status_message
                .unwrap_or_else(|| "no reason given".into());
            return Err(HalError::BackendUnavailable(format!(
                "{}: {reason}",
                backend.name()
            )));
        }

        info!(backend = backend.name(), "Opened execution context");
        Ok(Self {
            backend: Some(backend),
            submitted: Vec::new(),
            wait_timeout: None,
        })
    }

    /// Bound every `wait` issued through this context.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// The backend this context talks to.
    pub fn backend(&self) -> HalResult<&dyn Backend> {
        self.backend.as_deref().ok_or(HalError::ContextClosed)
    }

    /// Whether `close` has not been called yet.
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Jobs submitted through this context, oldest first.
    pub fn submitted_jobs(&self) -> &[JobId] {
        &self.submitted
    }

    /// Check shots and circuit against the backend, then submit.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub async fn submit(&mut self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let backend = self.backend()?;
        let caps = backend.capabilities();

        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > caps.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} exceeds the limit of {} for {}",
                caps.max_shots,
                backend.name()
            )));
        }

        if let ValidationResult::Invalid { reasons } = backend.validate(circuit).await? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }

        let job_id = backend.submit(circuit, shots).await?;
        debug!(job_id = %job_id, "Submitted through context");
        self.submitted.push(job_id.clone());
        Ok(job_id)
    }

    /// Wait for a job submitted through this context.
    pub async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let backend = self.backend()?;
        match self.wait_timeout {
            Some(timeout) => backend.wait_with_timeout(job_id, timeout).await,
            None => backend.wait(job_id).await,
        }
    }

    /// Validate, submit and wait for one circuit.
    pub async fn execute(&mut self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let job_id = self.submit(circuit, shots).await?;
        self.wait(&job_id).await
    }

    /// End the session, cancelling jobs that are still pending.
    pub async fn close(&mut self) -> HalResult<()> {
        let backend = self.backend.take().ok_or(HalError::ContextClosed)?;

        for job_id in self.submitted.drain(..) {
            match backend.status(&job_id).await {
                Ok(status) if status.is_pending() => {
                    if let Err(e) = backend.cancel(&job_id).await {
                        warn!(job_id = %job_id, error = %e, "Failed to cancel pending job");
                    }
                }
                Ok(_) => {}
                // Backends may drop a job once its result has been read.
                Err(HalError::JobNotFound(_)) => {
                    debug!(job_id = %job_id, "Job already collected");
                }
                Err(e) => warn!(job_id = %job_id, error = %e, "Could not query job on close"),
            }
        }

        info!(backend = backend.name(), "Closed execution context");
        Ok(())
    }
}
