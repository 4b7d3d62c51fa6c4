// Analysis service trait, the seam between the controller and the network.
//
// The controller only ever talks to `dyn AnalysisService`. The HTTP client
// implements it for real use; tests implement it with canned responses.

use anyhow::Result;
use async_trait::async_trait;

use super::result::AnalysisResult;
use crate::media::SelectedFile;

/// Multipart field name the service reads the upload from.
pub const UPLOAD_FIELD: &str = "file";

/// Trait for submitting a file for authenticity analysis.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Upload one file and return the parsed verdict.
    ///
    /// Any transport failure, non-2xx status, or unparseable body is an error.
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult>;
}
