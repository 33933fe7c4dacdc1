//! IBM Quantum backend implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jozsa_hal::{
    Backend, BackendAvailability, BackendConfig, Capabilities, Counts, EnvTokenProvider,
    ExecutionResult, HalError, HalResult, JobId, JobStatus, TokenProvider, ValidationResult,
};
use jozsa_ir::Circuit;
use jozsa_qasm3::emit;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::api::{BackendInfo, IbmClient, JobResultResponse, JobStatusResponse, LEGACY_ENDPOINT};
use crate::error::{IbmError, IbmResult};

/// Device used when no target is configured.
pub const DEFAULT_TARGET: &str = "ibm_torino";

/// How long to cache backend info before refreshing from the API.
const BACKEND_INFO_TTL: Duration = Duration::from_secs(5 * 60);

/// Shots assumed when a V1 quasi-distribution arrives without metadata.
const FALLBACK_SHOTS: f64 = 1024.0;

/// IBM Quantum backend adapter.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    target: String,
    capabilities: Capabilities,
    backend_info: RwLock<Option<(BackendInfo, Instant)>>,
    /// Classical register width of each submitted job, for padding results.
    clbit_widths: Mutex<HashMap<String, usize>>,
}

impl std::fmt::Debug for IbmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IbmBackend")
            .field("client", &self.client)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl IbmBackend {
    fn from_client(client: IbmClient, target: String, num_qubits: u32) -> Self {
        Self {
            client: Arc::new(client),
            capabilities: Capabilities::ibm(&target, num_qubits),
            target,
            backend_info: RwLock::new(None),
            clbit_widths: Mutex::new(HashMap::new()),
        }
    }

    /// Connect to the legacy endpoint with a direct API token.
    pub async fn connect(
        target: impl Into<String>,
        tokens: &dyn TokenProvider,
    ) -> IbmResult<Self> {
        let token = tokens
            .get_token()
            .await
            .map_err(|_| IbmError::MissingToken)?;
        let client = IbmClient::new(LEGACY_ENDPOINT, &token)?;
        Ok(Self::from_client(client, target.into(), 127))
    }

    /// Connect to the IBM Cloud API, exchanging `api_key` for an IAM token.
    pub async fn connect_cloud(
        target: impl Into<String>,
        api_key: &dyn TokenProvider,
        service_crn: &str,
    ) -> IbmResult<Self> {
        let key = api_key
            .get_token()
            .await
            .map_err(|_| IbmError::MissingToken)?;
        info!("Connecting to IBM Cloud API (IAM key exchange)");
        let client = IbmClient::connect(&key, service_crn).await?;
        Ok(Self::from_client(client, target.into(), 133))
    }

    /// Pick credentials from the environment.
    ///
    /// `IBM_API_KEY` (with `IBM_SERVICE_CRN`) selects the Cloud API;
    /// otherwise `IBM_QUANTUM_TOKEN` selects the legacy endpoint.
    pub async fn from_env(target: impl Into<String>) -> IbmResult<Self> {
        let api_key = EnvTokenProvider::new("IBM_API_KEY");
        if api_key.has_valid_token() {
            let crn = std::env::var("IBM_SERVICE_CRN").map_err(|_| IbmError::MissingServiceCrn)?;
            return Self::connect_cloud(target, &api_key, &crn).await;
        }

        let token = EnvTokenProvider::ibm();
        if token.has_valid_token() {
            info!("Using legacy IBM Quantum token");
            return Self::connect(target, &token).await;
        }

        Err(IbmError::MissingToken)
    }

    /// Create a legacy-mode backend from explicit configuration.
    ///
    /// Reads the device from the `target` extra and an optional `instance`.
    pub fn with_config(config: &BackendConfig) -> IbmResult<Self> {
        let endpoint = config.endpoint.as_deref().unwrap_or(LEGACY_ENDPOINT);
        let token = config.token.as_deref().ok_or(IbmError::MissingToken)?;
        let target = config.extra_str("target").unwrap_or(DEFAULT_TARGET);

        let mut client = IbmClient::new(endpoint, token)?;
        if let Some(instance) = config.extra_str("instance") {
            client = client.with_instance(instance);
        }

        Ok(Self::from_client(client, target.to_string(), 127))
    }

    /// Get the target device name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Backend information, refreshed once the cached copy is stale.
    async fn get_backend_info(&self) -> IbmResult<BackendInfo> {
        {
            let cached = self.backend_info.read().await;
            if let Some((info, fetched_at)) = cached.as_ref() {
                if fetched_at.elapsed() < BACKEND_INFO_TTL {
                    return Ok(info.clone());
                }
            }
        }

        let info = self.client.get_backend(&self.target).await?;
        *self.backend_info.write().await = Some((info.clone(), Instant::now()));
        Ok(info)
    }

    fn record_width(&self, job_id: &str, width: usize) {
        self.clbit_widths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.to_string(), width);
    }

    /// Remove and return the recorded width. Called once a job is finished with.
    fn take_width(&self, job_id: &str) -> Option<usize> {
        self.clbit_widths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(job_id)
    }
}

/// Map an API job status onto the HAL lifecycle. Unknown states count as running.
fn map_job_status(status: &JobStatusResponse) -> JobStatus {
    match status.normalized_status().as_str() {
        "QUEUED" => JobStatus::Queued,
        "VALIDATING" | "RUNNING" => JobStatus::Running,
        "COMPLETED" => JobStatus::Completed,
        "FAILED" | "ERROR" => JobStatus::Failed(
            status
                .error_message()
                .unwrap_or_else(|| "Unknown error".to_string()),
        ),
        "CANCELLED" => JobStatus::Cancelled,
        _ => JobStatus::Running,
    }
}

/// Smallest width that holds the largest V2 hex sample; 1 if all are zero.
fn infer_bit_width(samples: &[String]) -> usize {
    let max_val = samples
        .iter()
        .filter_map(|s| u64::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16).ok())
        .max()
        .unwrap_or(0);

    if max_val == 0 {
        1
    } else {
        64 - max_val.leading_zeros() as usize
    }
}

/// Render a measured register value as a bit-string of `width` characters.
///
/// `0x`-prefixed keys are hex; unprefixed keys of only `0`/`1` are already
/// binary. With `width == 0` the width comes from the key itself.
fn hex_to_binary(raw: &str, width: usize) -> String {
    let (digits, radix, bits_per_digit) = match raw.strip_prefix("0x") {
        Some(hex) => (hex, 16, 4),
        None if raw.chars().all(|c| c == '0' || c == '1') => (raw, 2, 1),
        None => (raw, 16, 4),
    };

    match u64::from_str_radix(digits, radix) {
        Ok(value) => {
            let width = if width > 0 {
                width
            } else {
                digits.len() * bits_per_digit
            };
            format!("{value:0>width$b}")
        }
        Err(_) => raw.to_string(),
    }
}

/// Convert the first Sampler result into counts.
///
/// `width` is the circuit's classical bit count when known; device qubit
/// counts must never be used here.
fn results_to_counts(results: &JobResultResponse, width: Option<usize>) -> Counts {
    let mut counts = Counts::new();
    let Some(result) = results.results.first() else {
        return counts;
    };

    if let Some(data) = &result.data {
        for register in data.values() {
            let width = width.unwrap_or_else(|| infer_bit_width(&register.samples));
            for sample in &register.samples {
                counts.insert(hex_to_binary(sample, width), 1);
            }
        }
        return counts;
    }

    let width = width.unwrap_or(0);
    if let Some(raw_counts) = &result.counts {
        for (key, &n) in raw_counts {
            counts.insert(hex_to_binary(key, width), n);
        }
    } else if let Some(dist) = result.quasi_dists.as_ref().and_then(|d| d.first()) {
        let shots = result
            .metadata
            .as_ref()
            .and_then(|m| m.get("shots"))
            .and_then(serde_json::Value::as_u64)
            .map_or(FALLBACK_SHOTS, |s| s as f64);
        for (key, &prob) in dist {
            let n = (prob * shots).max(0.0).round() as u64;
            if n > 0 {
                counts.insert(hex_to_binary(key, width), n);
            }
        }
    }

    counts
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        "ibm"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.get_backend_info().await {
            Ok(info) if info.status.operational => Ok(BackendAvailability {
                is_available: true,
                queue_depth: info.status.pending_jobs,
                status_message: info.status.status_msg,
            }),
            Ok(info) => Ok(BackendAvailability::unavailable(
                info.status
                    .status_msg
                    .unwrap_or_else(|| "backend offline".to_string()),
            )),
            Err(e) => {
                warn!(device = %self.target, error = %e, "IBM availability check failed");
                Ok(BackendAvailability::unavailable(format!(
                    "failed to query {}: {e}",
                    self.target
                )))
            }
        }
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = match self.capabilities.check(circuit) {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid { reasons } => reasons,
        };
        if circuit.num_clbits() == 0 {
            reasons.push("the Sampler needs at least one classical bit".to_string());
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(device = %self.target))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let info = self.get_backend_info().await?;

        if circuit.num_qubits() > info.num_qubits {
            return Err(IbmError::TooManyQubits {
                required: circuit.num_qubits(),
                available: info.num_qubits,
            }
            .into());
        }
        if !info.status.operational {
            return Err(HalError::BackendUnavailable(
                info.status
                    .status_msg
                    .unwrap_or_else(|| "backend offline".to_string()),
            ));
        }

        let qasm = emit(circuit).map_err(|e| IbmError::Circuit(e.to_string()))?;
        debug!(bytes = qasm.len(), "Emitted OpenQASM 3");

        let response = self
            .client
            .submit_sampler_job(&self.target, vec![qasm], shots)
            .await
            .map_err(|e| HalError::SubmissionFailed(e.to_string()))?;

        self.record_width(&response.id, circuit.num_clbits());
        info!(job_id = %response.id, shots, "Submitted Sampler job");
        Ok(JobId::new(response.id))
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let status = self.client.get_job_status(&job_id.0).await?;
        Ok(map_job_status(&status))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let status = self.client.get_job_status(&job_id.0).await?;
        match map_job_status(&status) {
            JobStatus::Completed => {}
            JobStatus::Failed(msg) => {
                self.take_width(&job_id.0);
                return Err(HalError::JobFailed(msg));
            }
            JobStatus::Cancelled => {
                self.take_width(&job_id.0);
                return Err(HalError::JobCancelled);
            }
            pending => {
                return Err(HalError::Backend(format!(
                    "job {job_id} not yet completed ({pending})"
                )));
            }
        }

        let results = self.client.get_job_results(&job_id.0).await?;
        let counts = results_to_counts(&results, self.take_width(&job_id.0));
        let shots = u32::try_from(counts.total_shots()).unwrap_or(u32::MAX);

        let mut result = ExecutionResult::new(counts, shots)
            .with_metadata("backend", serde_json::json!(self.target))
            .with_metadata("job_id", serde_json::json!(job_id.0));
        if let Some(elapsed) = status.elapsed() {
            if let Ok(ms) = u64::try_from(elapsed.num_milliseconds()) {
                result = result.with_execution_time(ms);
            }
        }
        Ok(result)
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.client.cancel_job(&job_id.0).await?;
        self.take_width(&job_id.0);
        info!(job_id = %job_id, "Cancelled IBM job");
        Ok(())
    }
}
