// HTTP client for the remote analysis service.
//
// Sends the selected file as `multipart/form-data` with a single part named
// `file`, then parses the JSON body into an AnalysisResult. No auth, no
// retries, no timeout: the request runs until the service answers or the
// connection fails.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::result::AnalysisResult;
use super::traits::{AnalysisService, UPLOAD_FIELD};
use crate::config::Config;
use crate::media::SelectedFile;

/// Analysis service reached over HTTP.
pub struct HttpAnalysisService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisService {
    /// Create a client that POSTs to the given full endpoint URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lucid-trace/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Create a client from configuration (base URL + analyze path).
    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_service()?;
        Self::new(&config.analyze_url())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(file: &SelectedFile) -> Result<Form> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(mime) = &file.mime {
            part = part
                .mime_str(mime)
                .with_context(|| format!("Invalid MIME type {mime}"))?;
        }
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult> {
        let form = Self::build_form(file)?;

        debug!(
            endpoint = %self.endpoint,
            file = %file.name,
            bytes = file.bytes.len(),
            "Uploading media for analysis"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("Analysis service request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Analysis service returned {}: {}", status, body);
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read analysis response body")?;

        let result = AnalysisResult::from_slice(&body)?;
        debug!(verdict = ?result.verdict(), "Analysis response parsed");
        Ok(result)
    }
}
