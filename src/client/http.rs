//! HTTP client for the remote processing service.
//!
//! One synchronous request-response exchange per submission, treated as
//! atomic. A busy flag rejects overlapping submissions up front; the spec of
//! record for what goes over the wire lives in [`super::protocol`].

use crate::client::protocol::{HealthStatus, ProcessRequest, ProcessResponse, UploadedImage};
use crate::core::error::{ClientError, ClientResult, PixelGraphError, PixelGraphResult};
use crate::graph::structure::Graph;
use crate::validation::validate_inputs;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default service endpoint during local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Client for the remote processing service.
///
/// Holds one connection-pooling agent and an in-flight flag. The flag makes
/// overlapping submissions fail fast with [`ClientError::Busy`] instead of
/// racing each other's reconciliation.
pub struct ProcessingClient {
    base_url: String,
    agent: ureq::Agent,
    in_flight: AtomicBool,
}

impl ProcessingClient {
    /// Create a client against the default local endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a specific endpoint, e.g.
    /// `http://localhost:5000`. A trailing slash is tolerated.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(120))
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a submission is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate and submit the graph for processing.
    ///
    /// Fails with [`ClientError::Busy`] if a prior submission has not
    /// resolved, with a [`ValidationReport`](crate::core::ValidationReport)
    /// if any raw input is inconsistent, and with a client error if the
    /// exchange itself fails. A top-level `error` in the response aborts
    /// before any node state is touched.
    pub fn submit(&self, graph: &Graph) -> PixelGraphResult<ProcessResponse> {
        let _guard = self.acquire_slot()?;

        let report = validate_inputs(graph);
        if !report.can_submit() {
            return Err(PixelGraphError::Validation(report));
        }

        if graph.has_cycle() {
            // the service decides what to do with cycles; we only flag it
            warn!("submitting a graph that contains a cycle");
        }

        let request = ProcessRequest::from_graph(graph)?;
        debug!(
            "submitting {} node(s), {} edge(s) to {}",
            request.nodes.len(),
            request.edges.len(),
            self.base_url
        );

        let body = serde_json::to_value(&request)?;
        let response: ProcessResponse = self
            .agent
            .post(&format!("{}/process", self.base_url))
            .send_json(body)
            .map_err(classify)?
            .into_json()
            .map_err(ClientError::Decode)?;

        if let Some(message) = response.error {
            return Err(ClientError::Processing(message).into());
        }
        Ok(response)
    }

    /// Upload a raw pixel buffer, getting back the dimensions the service
    /// settled on. The query hints are advisory; the response is
    /// authoritative and must overwrite any locally-held values.
    pub fn upload_raw(
        &self,
        bytes: &[u8],
        width_hint: u32,
        height_hint: u32,
    ) -> ClientResult<UploadedImage> {
        let uploaded: UploadedImage = self
            .agent
            .post(&format!("{}/upload-raw", self.base_url))
            .query("width", &width_hint.to_string())
            .query("height", &height_hint.to_string())
            .set("Content-Type", "application/octet-stream")
            .send_bytes(bytes)
            .map_err(classify)?
            .into_json()
            .map_err(ClientError::Decode)?;
        debug!(
            "uploaded {} byte(s), service settled on {}x{}",
            bytes.len(),
            uploaded.width,
            uploaded.height
        );
        Ok(uploaded)
    }

    /// Liveness probe. Not part of the processing contract.
    pub fn health(&self) -> ClientResult<HealthStatus> {
        self.agent
            .get(&format!("{}/health", self.base_url))
            .call()
            .map_err(classify)?
            .into_json()
            .map_err(ClientError::Decode)
    }

    fn acquire_slot(&self) -> Result<SubmissionGuard<'_>, ClientError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ClientError::Busy);
        }
        Ok(SubmissionGuard { client: self })
    }
}

impl Default for ProcessingClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the in-flight flag when the submission resolves, on any path.
struct SubmissionGuard<'a> {
    client: &'a ProcessingClient,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.client.in_flight.store(false, Ordering::Release);
    }
}

/// Failure body of a non-2xx response. The service reports domain failures
/// in `error`; framework-level rejections arrive in `detail` instead.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

/// Map a transport error, pulling a best-effort message out of non-2xx
/// responses so service-side failures surface as processing errors.
fn classify(err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Status(code, response) => {
            let message = response
                .into_json::<ErrorBody>()
                .ok()
                .and_then(|body| body.error.or(body.detail))
                .unwrap_or_else(|| format!("service returned HTTP {code}"));
            ClientError::Processing(message)
        }
        other => ClientError::Transport(Box::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::payload::NodeKind;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ProcessingClient::with_base_url("http://example.test:5000/");
        assert_eq!(client.base_url(), "http://example.test:5000");
    }

    #[test]
    fn test_busy_flag_rejects_second_submission() {
        let client = ProcessingClient::new();
        let guard = client.acquire_slot().unwrap();
        assert!(client.is_busy());

        let graph = Graph::new();
        match client.submit(&graph) {
            Err(PixelGraphError::Client(ClientError::Busy)) => {}
            other => panic!("expected Busy, got {other:?}"),
        }

        // the rejected call must not have cleared the original slot
        assert!(client.is_busy());
        drop(guard);
        assert!(!client.is_busy());
    }

    fn processing_message(err: ClientError) -> String {
        match err {
            ClientError::Processing(msg) => msg,
            other => panic!("expected a processing error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_error_reads_error_field() {
        let response =
            ureq::Response::new(500, "Internal Server Error", r#"{"error": "node_3 failed"}"#)
                .unwrap();
        let err = classify(ureq::Error::Status(500, response));
        assert_eq!(processing_message(err), "node_3 failed");
    }

    #[test]
    fn test_status_error_reads_detail_field() {
        let response =
            ureq::Response::new(422, "Unprocessable Entity", r#"{"detail": "edges malformed"}"#)
                .unwrap();
        let err = classify(ureq::Error::Status(422, response));
        assert_eq!(processing_message(err), "edges malformed");
    }

    #[test]
    fn test_status_error_without_body_keeps_code() {
        let response = ureq::Response::new(502, "Bad Gateway", "upstream died").unwrap();
        let err = classify(ureq::Error::Status(502, response));
        assert_eq!(processing_message(err), "service returned HTTP 502");
    }

    #[test]
    fn test_validation_gate_runs_before_network() {
        // no server is listening; a validation failure proves we never
        // reached the transport
        let client = ProcessingClient::with_base_url("http://127.0.0.1:1");
        let mut graph = Graph::new();
        graph.add_node(NodeKind::RawReader);

        match client.submit(&graph) {
            Err(PixelGraphError::Validation(report)) => {
                assert!(!report.can_submit());
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(!client.is_busy());
    }
}
