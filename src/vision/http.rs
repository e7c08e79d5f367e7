//! HTTP client for the vision-classification collaborator.

use std::time::Duration;

use serde::Serialize;

use super::{BoardClassifier, Classification};
use crate::error::AppError;

/// JSON request body sent to the vision API.
#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    /// Base64-encoded image payload.
    image: &'a str,
}

/// `reqwest`-backed [`BoardClassifier`] talking to the configured
/// vision API endpoint.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    /// Builds a classifier client with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl BoardClassifier for HttpClassifier {
    async fn classify(&self, image_b64: &str) -> Result<Classification, AppError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { image: image_b64 });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "vision api returned {status}"
            )));
        }

        response
            .json::<Classification>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid classification payload: {e}")))
    }
}
