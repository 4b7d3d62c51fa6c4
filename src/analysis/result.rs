// Analysis response model.
//
// The service answers in one of two shapes: a flat object, or a two-element
// array pairing a detailed primary record with an optional external review.
// The shape is decided once here, at parse time. Nothing downstream looks at
// raw JSON again.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed response payload describing the authenticity verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AnalysisResult {
    /// Flat record: frames, AI probability, verdict.
    Simple(SimpleResult),
    /// Detailed primary record plus an optional secondary review.
    Paired(PairedResult),
}

/// The flat response shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleResult {
    #[serde(default)]
    pub frames_analyzed: Option<u64>,
    #[serde(default)]
    pub ai_probability: Option<f64>,
    #[serde(default)]
    pub verdict: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedResult {
    pub primary: DetailedResult,
    pub secondary: Option<ExternalReview>,
}

/// Element 0 of the paired shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedResult {
    #[serde(default)]
    pub frames_analyzed: Option<u64>,
    #[serde(default)]
    pub details: Option<BranchDetails>,
    #[serde(default)]
    pub verdict: Option<String>,
    /// Overall confidence; only some service versions send it.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Per-branch detector probabilities, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchDetails {
    #[serde(default)]
    pub ai_image_branch: Option<f64>,
    #[serde(default)]
    pub deepfake_branch: Option<f64>,
}

/// Element 1 of the paired shape: the opt-in external review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalReview {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub confidence_avg: Option<f64>,
    #[serde(default)]
    pub confidence_max: Option<f64>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_hash: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error envelope the service returns (with a 2xx status) when it could
/// not extract anything from the upload.
#[derive(Deserialize)]
struct ErrorEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl AnalysisResult {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).context("Analysis response is not valid JSON")?;
        Self::from_json(value)
    }

    /// Decide the result shape from the top-level JSON value.
    ///
    /// An array is the paired shape (element 0 primary, element 1 optional
    /// review); an object is the flat shape. Anything else is rejected.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let mut items = items.into_iter();
                let primary = match items.next() {
                    Some(v @ Value::Object(_)) => serde_json::from_value::<DetailedResult>(v)
                        .context("Malformed primary record in analysis response")?,
                    Some(_) => anyhow::bail!("Primary record in analysis response is not an object"),
                    None => anyhow::bail!("Analysis response is an empty array"),
                };
                let secondary = match items.next() {
                    Some(v @ Value::Object(_)) => Some(
                        serde_json::from_value::<ExternalReview>(v)
                            .context("Malformed external review in analysis response")?,
                    ),
                    _ => None,
                };
                Ok(Self::Paired(PairedResult { primary, secondary }))
            }
            Value::Object(_) => {
                if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(value.clone()) {
                    if envelope.status == "error" {
                        anyhow::bail!(
                            "Analysis service reported an error: {}",
                            envelope.message.as_deref().unwrap_or("no message")
                        );
                    }
                }
                let simple = serde_json::from_value::<SimpleResult>(value)
                    .context("Malformed analysis response")?;
                Ok(Self::Simple(simple))
            }
            other => anyhow::bail!(
                "Analysis response must be a JSON object or array, got {}",
                json_kind(&other)
            ),
        }
    }

    /// The secondary review, if this result carries one.
    pub fn secondary(&self) -> Option<&ExternalReview> {
        match self {
            Self::Simple(_) => None,
            Self::Paired(paired) => paired.secondary.as_ref(),
        }
    }

    pub fn verdict(&self) -> Option<&str> {
        match self {
            Self::Simple(r) => r.verdict.as_deref(),
            Self::Paired(p) => p.primary.verdict.as_deref(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
