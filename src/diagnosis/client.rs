use serde::Deserialize;

use super::parser::parse_diagnoses;
use super::{DiagnosisError, MAX_IMAGE_BYTES};
use crate::config;
use crate::models::{DiagnosisEntry, PatientHistory};

/// Default request timeout: 2 minutes (classification of a single image).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A single image plus the flattened patient history, ready for upload.
///
/// Constructed fresh per submission and not retained after the request
/// completes.
#[derive(Debug, Clone)]
pub struct DiagnosisRequest {
    pub filename: String,
    pub image: Vec<u8>,
    pub mime: String,
    pub patient_history: String,
}

impl DiagnosisRequest {
    /// Bundle an uploaded image with the patient's history.
    ///
    /// The MIME type is guessed from the filename; non-image uploads and
    /// images over the 5MB bound are rejected.
    pub fn new(
        filename: &str,
        image: Vec<u8>,
        history: &PatientHistory,
    ) -> Result<Self, DiagnosisError> {
        if image.len() > MAX_IMAGE_BYTES {
            return Err(DiagnosisError::ImageTooLarge(image.len()));
        }
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(DiagnosisError::UnsupportedImageType(mime.to_string()));
        }
        Ok(Self {
            filename: filename.to_string(),
            image,
            mime: mime.to_string(),
            patient_history: history.history_text(),
        })
    }
}

/// Raw body returned by the diagnostic service on success.
///
/// `response` is natural-language text wrapping the diagnosis JSON in a
/// fenced block; see [`parse_diagnoses`].
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosisResponse {
    pub response: String,
}

/// Error body returned by the diagnostic service on failure.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Liveness report from the diagnostic service (shape is service-defined).
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub serde_json::Value);

/// HTTP client for the remote diagnostic service.
pub struct DiagnosisClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
    /// Cooperative exclusion: one diagnosis request in flight at a time.
    in_flight: tokio::sync::Mutex<()>,
}

impl DiagnosisClient {
    /// Create a new DiagnosisClient pointing at the given service.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Client for the configured service URL with the default timeout.
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), DEFAULT_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Is a diagnosis request currently in flight?
    ///
    /// Callers disable the submit action while this is true; a submission
    /// that races anyway queues behind the in-flight request.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// POST the image and history to `/predict` and return the raw response.
    ///
    /// The multipart body carries the image as a binary part and the history
    /// text JSON-encoded under `patient_history`, matching the service
    /// contract. Non-success statuses surface the payload's `error` field.
    pub async fn submit(
        &self,
        request: &DiagnosisRequest,
    ) -> Result<DiagnosisResponse, DiagnosisError> {
        let _in_flight = self.in_flight.lock().await;
        let url = format!("{}/predict", self.base_url);

        let image_part = reqwest::multipart::Part::bytes(request.image.clone())
            .file_name(request.filename.clone())
            .mime_str(&request.mime)
            .map_err(|e| DiagnosisError::Network(e.to_string()))?;
        let history_json = serde_json::to_string(&request.patient_history)
            .map_err(|e| DiagnosisError::JsonParsing(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("image", image_part)
            .text("patient_history", history_json);

        tracing::debug!("Submitting diagnosis request for {}", request.filename);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Failed to get diagnosis".to_string());
            return Err(DiagnosisError::Service {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DiagnosisResponse>()
            .await
            .map_err(|e| DiagnosisError::MalformedResponse(e.to_string()))
    }

    /// Submit and parse in one step.
    ///
    /// Transport and service failures propagate; a malformed response body
    /// degrades to an empty list per the parser's contract.
    pub async fn diagnose(
        &self,
        request: &DiagnosisRequest,
    ) -> Result<Vec<DiagnosisEntry>, DiagnosisError> {
        let response = self.submit(request).await?;
        Ok(parse_diagnoses(&response))
    }

    /// GET `/health`; fails unless the service answers with a success status.
    pub async fn check_health(&self) -> Result<HealthStatus, DiagnosisError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DiagnosisError::Health(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiagnosisError::Health(format!(
                "service returned status {}",
                status.as_u16()
            )));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| DiagnosisError::Health(e.to_string()))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> DiagnosisError {
        if e.is_connect() {
            DiagnosisError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            DiagnosisError::Timeout(self.timeout_secs)
        } else {
            DiagnosisError::Network(e.to_string())
        }
    }
}
