//! IBM Quantum Platform API client.
//!
//! Covers the subset of the REST API a Sampler run needs:
//! - Authentication via IAM token exchange (API key flow) or a direct token
//! - Backend configuration and status
//! - Job submission through the Sampler primitive
//! - Job status, results and cancellation
//!
//! Supports both the IBM Cloud API (`quantum.cloud.ibm.com/api`) and the
//! legacy endpoint (`api.quantum-computing.ibm.com`).

// Response fields mirror the API contract; not all of them are read.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IbmError, IbmResult};

/// Default IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Legacy IBM Quantum API endpoint.
pub const LEGACY_ENDPOINT: &str = "https://api.quantum-computing.ibm.com";

const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

const IBM_API_VERSION: &str = "2026-02-01";

/// Cloudflare in front of the API rejects reqwest's default agent.
const USER_AGENT: &str = concat!("jozsa/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
    /// Selected instance (hub/group/project), legacy mode only.
    instance: Option<String>,
    cloud_api: bool,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("instance", &self.instance)
            .field("cloud_api", &self.cloud_api)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

fn json_headers(bearer: &str) -> IbmResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {bearer}"))
            .map_err(|_| IbmError::InvalidToken)?,
    );
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(headers)
}

fn build_client(headers: header::HeaderMap) -> IbmResult<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Turn a non-success response into an API error, preferring the
/// structured error body when there is one.
async fn api_error(response: Response, context: &str) -> IbmError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(err) => IbmError::Api {
            code: err.code,
            message: format!("{context}: {}", err.message),
        },
        Err(_) => IbmError::Api {
            code: Some(status.as_u16().to_string()),
            message: format!("{context}: {body}"),
        },
    }
}

impl IbmClient {
    /// Create a client for the legacy direct-token mode.
    pub fn new(endpoint: impl Into<String>, token: &str) -> IbmResult<Self> {
        let client = build_client(json_headers(token)?)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            instance: None,
            cloud_api: false,
        })
    }

    /// Create a client for the IBM Cloud API.
    ///
    /// Exchanges the API key for an IAM bearer token and sets the
    /// `Service-CRN` header that every Cloud API request requires.
    pub async fn connect(api_key: &str, service_crn: &str) -> IbmResult<Self> {
        let iam_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let iam_response = iam_client
            .post(IAM_TOKEN_URL)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!(
                "grant_type=urn:ibm:params:oauth:grant-type:apikey&apikey={api_key}"
            ))
            .send()
            .await
            .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

        if !iam_response.status().is_success() {
            let status = iam_response.status();
            let body = iam_response
                .text()
                .await
                .unwrap_or_else(|_| "no body".to_string());
            return Err(IbmError::IamTokenExchange(format!(
                "IAM returned {status}: {body}"
            )));
        }

        let iam_token: IamTokenResponse = iam_response.json().await.map_err(|e| {
            IbmError::IamTokenExchange(format!("failed to parse IAM response: {e}"))
        })?;
        debug!(expires_in = ?iam_token.expires_in, "Obtained IAM bearer token");

        let mut headers = json_headers(&iam_token.access_token)?;
        headers.insert(
            header::HeaderName::from_static("service-crn"),
            header::HeaderValue::from_str(service_crn)
                .map_err(|_| IbmError::InvalidParameter("invalid Service-CRN value".into()))?,
        );
        headers.insert(
            header::HeaderName::from_static("ibm-api-version"),
            header::HeaderValue::from_static(IBM_API_VERSION),
        );

        Ok(Self {
            client: build_client(headers)?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            instance: None,
            cloud_api: true,
        })
    }

    /// Set the instance (hub/group/project) used for legacy submissions.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Whether this client talks to the IBM Cloud API.
    pub fn is_cloud_api(&self) -> bool {
        self.cloud_api
    }

    /// The API base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get details for a specific backend.
    pub async fn get_backend(&self, name: &str) -> IbmResult<BackendInfo> {
        if self.cloud_api {
            self.get_backend_cloud(name).await
        } else {
            self.get_backend_legacy(name).await
        }
    }

    /// The Cloud API splits configuration and status into two resources.
    async fn get_backend_cloud(&self, name: &str) -> IbmResult<BackendInfo> {
        let config_url = format!("{}/v1/backends/{}/configuration", self.endpoint, name);
        let response = self.client.get(&config_url).send().await?;

        if !response.status().is_success() {
            if response.status() == StatusCode::NOT_FOUND {
                return Err(IbmError::BackendUnavailable(name.to_string()));
            }
            return Err(api_error(response, &format!("backend configuration for {name}")).await);
        }
        let config: BackendConfigResponse = response.json().await?;

        let status_url = format!("{}/v1/backends/{}/status", self.endpoint, name);
        let response = self.client.get(&status_url).send().await?;
        let status = if response.status().is_success() {
            let s: BackendStatusResponse = response.json().await?;
            s.into()
        } else {
            // Configuration succeeded, so assume the device is up.
            BackendStatus {
                operational: true,
                status_msg: None,
                pending_jobs: None,
            }
        };

        Ok(config.into_info(status))
    }

    async fn get_backend_legacy(&self, name: &str) -> IbmResult<BackendInfo> {
        let url = format!("{}/v1/backends/{}", self.endpoint, name);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            if response.status() == StatusCode::NOT_FOUND {
                return Err(IbmError::BackendUnavailable(name.to_string()));
            }
            return Err(api_error(response, &format!("backend {name}")).await);
        }

        response.json().await.map_err(IbmError::from)
    }

    /// Submit a job using the Sampler primitive.
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        circuits: Vec<String>,
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let url = format!("{}/v1/jobs", self.endpoint);
        let body = sampler_request(
            backend,
            circuits,
            shots,
            self.cloud_api,
            self.instance.as_deref(),
        )?;

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response, "job submission failed").await);
        }

        response.json().await.map_err(IbmError::from)
    }

    /// Get job status.
    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{}", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            if response.status() == StatusCode::NOT_FOUND {
                return Err(IbmError::JobNotFound(job_id.to_string()));
            }
            return Err(api_error(response, "job status").await);
        }

        response.json().await.map_err(IbmError::from)
    }

    /// Get job results.
    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{}/results", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            if response.status() == StatusCode::NOT_FOUND {
                return Err(IbmError::JobNotFound(job_id.to_string()));
            }
            return Err(api_error(response, "job results").await);
        }

        response.json().await.map_err(IbmError::from)
    }

    /// Cancel a job.
    pub async fn cancel_job(&self, job_id: &str) -> IbmResult<()> {
        let url = format!("{}/v1/jobs/{}/cancel", self.endpoint, job_id);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            if response.status() == StatusCode::NOT_FOUND {
                return Err(IbmError::JobNotFound(job_id.to_string()));
            }
            return Err(api_error(response, "job cancellation").await);
        }

        Ok(())
    }
}

// ============================================================================
// Request types
// ============================================================================

/// Sampler job request.
#[derive(Debug, Serialize)]
struct SamplerJobRequest<P> {
    program_id: &'static str,
    backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hub: Option<String>,
    params: P,
}

/// V2 Sampler parameters: one PUB `(circuit, parameter values, shots)` per circuit.
#[derive(Debug, Serialize)]
struct SamplerV2Params {
    version: u8,
    pubs: Vec<(String, serde_json::Map<String, serde_json::Value>, u32)>,
    options: SamplerOptions,
}

#[derive(Debug, Serialize)]
struct SamplerOptions {
    /// Level 1 lets IBM map the logical circuit onto its coupling graph.
    optimization_level: u8,
}

/// V1 Sampler parameters (legacy endpoint).
#[derive(Debug, Serialize)]
struct SamplerV1Params {
    circuits: Vec<String>,
    shots: u32,
    skip_transpilation: bool,
}

/// Build the JSON body of a Sampler submission.
///
/// Circuits are never pre-transpiled here, so the server always runs its
/// own transpilation.
fn sampler_request(
    backend: &str,
    circuits: Vec<String>,
    shots: u32,
    cloud_api: bool,
    instance: Option<&str>,
) -> IbmResult<serde_json::Value> {
    let body = if cloud_api {
        serde_json::to_value(SamplerJobRequest {
            program_id: "sampler",
            backend: backend.to_string(),
            hub: None,
            params: SamplerV2Params {
                version: 2,
                pubs: circuits
                    .into_iter()
                    .map(|c| (c, serde_json::Map::new(), shots))
                    .collect(),
                options: SamplerOptions {
                    optimization_level: 1,
                },
            },
        })
    } else {
        serde_json::to_value(SamplerJobRequest {
            program_id: "sampler",
            backend: backend.to_string(),
            hub: instance.map(str::to_string),
            params: SamplerV1Params {
                circuits,
                shots,
                skip_transpilation: false,
            },
        })
    };
    body.map_err(IbmError::from)
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(alias = "error")]
    message: String,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Job ID.
    pub id: String,
    /// Initial job status.
    #[serde(default)]
    pub status: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: String,
    /// Job status; mixed case on the Cloud API.
    pub status: String,
    /// Backend name.
    #[serde(default)]
    pub backend: Option<String>,
    /// Creation time (RFC 3339).
    #[serde(default)]
    pub created: Option<String>,
    /// Completion time (RFC 3339).
    #[serde(default)]
    pub ended: Option<String>,
    /// Error information (legacy API).
    #[serde(default)]
    pub error: Option<JobError>,
    /// State with failure reason (Cloud API).
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Job error information (legacy API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Error message.
    pub message: String,
}

/// Job state with reason (Cloud API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// Status string.
    #[serde(default)]
    pub status: String,
    /// Reason for failure.
    #[serde(default)]
    pub reason: Option<String>,
    /// Reason code.
    #[serde(default)]
    pub reason_code: Option<u32>,
}

impl JobStatusResponse {
    /// Uppercased status for comparison.
    pub fn normalized_status(&self) -> String {
        self.status.to_uppercase()
    }

    /// Check if job completed successfully.
    pub fn is_completed(&self) -> bool {
        self.normalized_status() == "COMPLETED"
    }

    /// Check if job failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.normalized_status().as_str(), "FAILED" | "ERROR")
    }

    /// Check if job was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.normalized_status() == "CANCELLED"
    }

    /// Failure reason, from `state.reason` or the legacy `error.message`.
    pub fn error_message(&self) -> Option<String> {
        self.state
            .as_ref()
            .and_then(|s| s.reason.clone())
            .or_else(|| self.error.as_ref().map(|e| e.message.clone()))
    }

    /// Wall-clock time between creation and completion.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        let parse = |s: &Option<String>| {
            s.as_deref()
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&Utc))
        };
        Some(parse(&self.ended)? - parse(&self.created)?)
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    /// Job ID (absent on the V2 results endpoint).
    #[serde(default)]
    pub id: Option<String>,
    /// One entry per submitted circuit.
    pub results: Vec<SamplerResult>,
}

/// Sampler result for one circuit.
#[derive(Debug, Default, Deserialize)]
pub struct SamplerResult {
    /// V2: classical register name to per-shot samples.
    #[serde(default)]
    pub data: Option<HashMap<String, ClassicalRegisterData>>,
    /// V1: quasi-probability distributions.
    #[serde(default)]
    pub quasi_dists: Option<Vec<HashMap<String, f64>>>,
    /// V1: measurement counts.
    #[serde(default)]
    pub counts: Option<HashMap<String, u64>>,
    /// Metadata.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Classical register data from V2 Sampler results.
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    /// Samples as hex strings, one per shot (e.g. `"0x3"`).
    pub samples: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BackendConfigResponse {
    backend_name: String,
    n_qubits: usize,
    #[serde(default)]
    basis_gates: Vec<String>,
    #[serde(default)]
    simulator: Option<bool>,
    #[serde(default)]
    max_shots: Option<u32>,
}

impl BackendConfigResponse {
    fn into_info(self, status: BackendStatus) -> BackendInfo {
        BackendInfo {
            name: self.backend_name,
            num_qubits: self.n_qubits,
            status,
            basis_gates: self.basis_gates,
            simulator: self.simulator.unwrap_or(false),
            max_shots: self.max_shots,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BackendStatusResponse {
    state: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    length_queue: u64,
}

impl From<BackendStatusResponse> for BackendStatus {
    fn from(s: BackendStatusResponse) -> Self {
        Self {
            operational: s.state,
            status_msg: Some(s.status),
            pending_jobs: Some(u32::try_from(s.length_queue).unwrap_or(u32::MAX)),
        }
    }
}

/// Backend information.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendInfo {
    /// Backend name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: usize,
    /// Backend status.
    pub status: BackendStatus,
    /// Native gates.
    #[serde(default)]
    pub basis_gates: Vec<String>,
    /// Whether this is a simulator.
    #[serde(default)]
    pub simulator: bool,
    /// Maximum number of shots.
    #[serde(default)]
    pub max_shots: Option<u32>,
}

/// Backend status.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendStatus {
    /// Whether the backend is operational.
    pub operational: bool,
    /// Status message.
    #[serde(default)]
    pub status_msg: Option<String>,
    /// Number of pending jobs.
    #[serde(default)]
    pub pending_jobs: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(s: &str) -> JobStatusResponse {
        JobStatusResponse {
            id: "test".to_string(),
            status: s.to_string(),
            backend: None,
            created: None,
            ended: None,
            error: None,
            state: None,
        }
    }

    #[test]
    fn test_job_status_predicates() {
        assert!(status("COMPLETED").is_completed());
        assert!(status("Completed").is_completed());
        assert!(status("ERROR").is_failed());
        assert!(status("Cancelled").is_cancelled());
        assert!(!status("RUNNING").is_completed());
    }

    #[test]
    fn test_error_message_prefers_cloud_reason() {
        let mut failed = status("Failed");
        failed.error = Some(JobError {
            code: None,
            message: "legacy message".to_string(),
        });
        assert_eq!(failed.error_message().unwrap(), "legacy message");

        failed.state = Some(JobState {
            status: "Failed".to_string(),
            reason: Some("circuit too deep".to_string()),
            reason_code: Some(1513),
        });
        assert_eq!(failed.error_message().unwrap(), "circuit too deep");
    }

    #[test]
    fn test_elapsed_from_timestamps() {
        let mut done = status("COMPLETED");
        assert!(done.elapsed().is_none());
        done.created = Some("2026-03-01T10:00:00Z".to_string());
        done.ended = Some("2026-03-01T10:00:02.500Z".to_string());
        assert_eq!(done.elapsed().unwrap().num_milliseconds(), 2500);
    }

    #[test]
    fn test_v2_sampler_request_shape() {
        let body = sampler_request(
            "ibm_torino",
            vec!["OPENQASM 3.0;".to_string()],
            1024,
            true,
            Some("ignored/in/cloud"),
        )
        .unwrap();
        assert_eq!(body["program_id"], "sampler");
        assert_eq!(body["backend"], "ibm_torino");
        assert_eq!(body["params"]["version"], 2);
        assert_eq!(body["params"]["pubs"][0][0], "OPENQASM 3.0;");
        assert_eq!(body["params"]["pubs"][0][1], serde_json::json!({}));
        assert_eq!(body["params"]["pubs"][0][2], 1024);
        assert_eq!(body["params"]["options"]["optimization_level"], 1);
        assert!(body.get("hub").is_none());
    }

    #[test]
    fn test_v1_sampler_request_shape() {
        let body = sampler_request(
            "ibm_brisbane",
            vec!["OPENQASM 3.0;".to_string()],
            100,
            false,
            Some("ibm-q/open/main"),
        )
        .unwrap();
        assert_eq!(body["hub"], "ibm-q/open/main");
        assert_eq!(body["params"]["shots"], 100);
        assert_eq!(body["params"]["skip_transpilation"], false);
        assert_eq!(body["params"]["circuits"][0], "OPENQASM 3.0;");

        let no_hub = sampler_request("ibm_brisbane", vec![], 1, false, None).unwrap();
        assert!(no_hub.get("hub").is_none());
    }

    #[test]
    fn test_backend_config_into_info() {
        let json = r#"{
            "backend_name": "ibm_torino",
            "n_qubits": 133,
            "basis_gates": ["cz", "id", "rx", "rz", "rzz", "sx", "x"],
            "coupling_map": [[0, 1], [1, 0]],
            "simulator": false
        }"#;
        let config: BackendConfigResponse = serde_json::from_str(json).unwrap();
        let status: BackendStatusResponse = serde_json::from_str(
            r#"{"state": true, "status": "active", "message": "", "length_queue": 4}"#,
        )
        .unwrap();

        let info = config.into_info(status.into());
        assert_eq!(info.name, "ibm_torino");
        assert_eq!(info.num_qubits, 133);
        assert_eq!(info.basis_gates.len(), 7);
        assert!(info.status.operational);
        assert_eq!(info.status.pending_jobs, Some(4));
        assert!(!info.simulator);
    }

    #[test]
    fn test_legacy_backend_info_deserialization() {
        let json = r#"{
            "name": "ibm_brisbane",
            "num_qubits": 127,
            "status": {"operational": false, "status_msg": "maintenance"}
        }"#;
        let info: BackendInfo = serde_json::from_str(json).unwrap();
        assert!(!info.status.operational);
        assert_eq!(info.status.status_msg.as_deref(), Some("maintenance"));
    }

    #[test]
    fn test_api_error_response_accepts_error_field() {
        let err: ApiErrorResponse =
            serde_json::from_str(r#"{"error": "Unauthorized"}"#).unwrap();
        assert_eq!(err.message, "Unauthorized");
        assert!(err.code.is_none());
    }

    #[test]
    fn test_legacy_client_is_not_cloud() {
        let client = IbmClient::new(LEGACY_ENDPOINT, "test-token").unwrap();
        assert!(!client.is_cloud_api());
        assert_eq!(client.endpoint(), LEGACY_ENDPOINT);
        assert!(!format!("{client:?}").contains("test-token"));
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        assert!(matches!(
            IbmClient::new(LEGACY_ENDPOINT, "bad\ntoken"),
            Err(IbmError::InvalidToken)
        ));
    }
}
