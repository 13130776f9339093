use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::time::{timeout, Duration};
use url::Url;

use crate::api::{ConvertRequest, ConvertResponse, FORM_CONTENT_TYPE, SUBMIT_PATH};
use crate::config::{ClientConfig, FailureMode};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to encode form body: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("server responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Posts queries to the conversion endpoint and decodes its JSON reply.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    endpoint: Url,
    timeout_ms: u64,
    check_status: bool,
}

impl Transport {
    pub fn new(client: Client, cfg: &ClientConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: cfg.origin.join(SUBMIT_PATH)?,
            timeout_ms: cfg.timeout_ms,
            check_status: cfg.failure_mode == FailureMode::Defensive,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn submit(&self, query: &str) -> Result<ConvertResponse, SubmitError> {
        let body = ConvertRequest::new(query).to_form()?;

        let exchange = async {
            let response = self
                .client
                .post(self.endpoint.clone())
                .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
                .body(body)
                .send()
                .await?;

            if self.check_status && !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unable to read response body>".to_string());
                return Err(SubmitError::Status { status, body });
            }

            let raw = response.text().await?;
            Ok::<_, SubmitError>(ConvertResponse::from_json(&raw)?)
        };

        timeout(Duration::from_millis(self.timeout_ms), exchange)
            .await
            .map_err(|_| SubmitError::Timeout(self.timeout_ms))?
    }
}
