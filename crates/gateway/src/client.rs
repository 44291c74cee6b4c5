//! The authenticated HTTP client for the SkinMorph API.

use std::sync::Arc;

use credential_store::CredentialStore;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use skinmorph_common::auth::{
    ErrorDetail, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
};
use skinmorph_common::prediction::PredictOutcome;
use skinmorph_common::roster::{PatientInfo, PatientPredictions};
use skinmorph_common::simulation::RiskTrajectory;
use skinmorph_common::timeline::TimelineResponse;
use skinmorph_common::{Error, Result};
use tracing::{debug, warn};

use crate::config::GatewayConfig;

/// An image file staged for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn png(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "image/png".to_string(),
            bytes,
        }
    }

    fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?;
        Ok(part)
    }
}

/// Gateway fronting every remote SkinMorph operation.
///
/// The gateway only reads the credential store. On a 401 it surfaces
/// [`Error::Unauthorized`] and leaves the store untouched: whether a
/// rejected token warrants signing out is the caller's decision, which
/// avoids thrashing the store from racing in-flight requests.
pub struct ApiGateway {
    config: GatewayConfig,
    http: reqwest::Client,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiGateway {
    pub fn new(config: GatewayConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Attach the current bearer token, if one is stored.
    ///
    /// The store is consulted on every dispatch, so a token removed by
    /// sign-out is never attached from a cached copy.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.load() {
            Ok(Some(credentials)) => request.bearer_auth(credentials.access_token),
            Ok(None) => request,
            Err(e) => {
                warn!("Credential store unreadable, sending unauthenticated: {}", e);
                request
            }
        }
    }

    /// Sign in and obtain a bearer token.
    ///
    /// Bad credentials map to [`Error::Authentication`]; the gateway does
    /// not persist anything on success, that is the session controller's
    /// job.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.config.endpoint("/auth/login");
        debug!("POST {}", url);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .authorize(self.http.post(&url))
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let detail = read_detail(response).await;
            return Err(Error::Authentication(detail));
        }

        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Register a new account. Does not authenticate.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse> {
        let url = self.config.endpoint("/auth/signup");
        debug!("POST {}", url);

        let response = self
            .authorize(self.http.post(&url))
            .json(request)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Single-image analysis. Multipart field `file`.
    pub async fn predict(&self, image: ImageUpload) -> Result<PredictOutcome> {
        let url = self.config.endpoint("/predict");
        debug!("POST {} ({} bytes)", url, image.bytes.len());

        let form = Form::new().part("file", image.into_part()?);
        let response = self
            .authorize(self.http.post(&url))
            .multipart(form)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Multi-frame analysis over an ordered frame sequence. Multipart
    /// repeated field `files`.
    pub async fn predict_sequence(&self, frames: Vec<ImageUpload>) -> Result<RiskTrajectory> {
        let url = self.config.endpoint("/predict_sequence");
        debug!("POST {} ({} frames)", url, frames.len());

        let mut form = Form::new();
        for frame in frames {
            form = form.part("files", frame.into_part()?);
        }
        let response = self
            .authorize(self.http.post(&url))
            .multipart(form)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// List all patients. Clinician accounts only; the server enforces the
    /// role and the route guard keeps patients away from the view.
    pub async fn patients(&self) -> Result<Vec<PatientInfo>> {
        let url = self.config.endpoint("/dermatologist/patients");
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Stored analysis history for one patient. Clinician accounts only.
    pub async fn patient_predictions(&self, patient_id: &str) -> Result<PatientPredictions> {
        let url = self
            .config
            .endpoint(&format!("/dermatologist/patient/{}/predictions", patient_id));
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the lesion history for the current identity.
    pub async fn timeline(&self) -> Result<TimelineResponse> {
        let url = self.config.endpoint("/timeline");
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the clinician handoff report as raw PDF bytes.
    pub async fn report(&self) -> Result<Vec<u8>> {
        let url = self.config.endpoint("/report");
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Map non-success statuses into the error taxonomy.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let detail = read_detail(response).await;
            warn!("Remote rejected the request ({}): {}", status, detail);
            Err(Error::Unauthorized)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            Err(Error::Validation(read_detail(response).await))
        }
        // 5xx and anything unexpected surface as transport failures.
        _ => match response.error_for_status() {
            Ok(response) => Ok(response),
            Err(e) => Err(Error::Transport(e)),
        },
    }
}

/// Best-effort extraction of the server's `{"detail": ...}` error body.
async fn read_detail(response: Response) -> String {
    match response.json::<ErrorDetail>().await {
        Ok(body) if !body.detail.is_empty() => body.detail,
        _ => "remote request failed".to_string(),
    }
}
