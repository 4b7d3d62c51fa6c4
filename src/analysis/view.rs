// Display derivation: which fields to show for a result.
//
// Pure functions only. Front ends render the `ResultView` however they
// like; the terminal renderer lives in output::terminal.

use serde::Serialize;

use super::result::{AnalysisResult, ExternalReview};

/// Placeholder shown when the service omitted a field.
pub const MISSING: &str = "—";

/// Everything a front end needs to render the current result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub primary: PrimaryPanel,
    /// Whether the result carries an external review at all.
    pub secondary_available: bool,
    /// The external review panel. Present only once revealed.
    pub secondary: Option<SecondaryPanel>,
}

/// Primary panel, as (label, formatted value) rows in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryPanel {
    pub rows: Vec<(String, String)>,
}

impl PrimaryPanel {
    /// Look up a row's formatted value by label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryPanel {
    pub risk_level: String,
    pub color_code: Option<String>,
    /// Average confidence, one decimal place with a percent sign.
    pub confidence: String,
    pub confidence_max: Option<String>,
    pub filename: Option<String>,
    pub file_hash: Option<String>,
    /// Whether `file_hash` matches the local file. None when either side is unknown.
    pub hash_matches: Option<bool>,
}

pub const FRAMES_ANALYZED: &str = "Frames Analyzed";
pub const AI_PROBABILITY: &str = "AI Probability";
pub const AI_IMAGE_BRANCH: &str = "AI Image Branch";
pub const DEEPFAKE_BRANCH: &str = "Deepfake Branch";
pub const CONFIDENCE: &str = "Confidence";
pub const VERDICT: &str = "Verdict";

/// Build the view for a result.
///
/// `revealed` is the controller's reveal flag; `local_hash` is the SHA-256
/// of the submitted bytes, used to check the review's chain of custody.
pub fn derive_view(result: &AnalysisResult, revealed: bool, local_hash: Option<&str>) -> ResultView {
    match result {
        AnalysisResult::Simple(simple) => ResultView {
            primary: PrimaryPanel {
                rows: vec![
                    row(FRAMES_ANALYZED, simple.frames_analyzed.map(|n| n.to_string())),
                    row(AI_PROBABILITY, simple.ai_probability.map(percent)),
                    row(VERDICT, simple.verdict.clone()),
                ],
            },
            secondary_available: false,
            secondary: None,
        },
        AnalysisResult::Paired(paired) => {
            let p = &paired.primary;
            let details = p.details.clone().unwrap_or_default();

            let mut rows = vec![
                row(FRAMES_ANALYZED, p.frames_analyzed.map(|n| n.to_string())),
                row(AI_IMAGE_BRANCH, details.ai_image_branch.map(percent)),
                row(DEEPFAKE_BRANCH, details.deepfake_branch.map(percent)),
            ];
            if let Some(confidence) = p.confidence {
                rows.push(row(CONFIDENCE, Some(percent(confidence))));
            }
            rows.push(row(VERDICT, p.verdict.clone()));

            let secondary = paired
                .secondary
                .as_ref()
                .filter(|_| revealed)
                .map(|review| secondary_panel(review, local_hash));

            ResultView {
                primary: PrimaryPanel { rows },
                secondary_available: paired.secondary.is_some(),
                secondary,
            }
        }
    }
}

fn secondary_panel(review: &ExternalReview, local_hash: Option<&str>) -> SecondaryPanel {
    let hash_matches = match (review.file_hash.as_deref(), local_hash) {
        (Some(remote), Some(local)) => Some(remote.eq_ignore_ascii_case(local)),
        _ => None,
    };

    SecondaryPanel {
        risk_level: review
            .risk_level
            .clone()
            .unwrap_or_else(|| MISSING.to_string()),
        color_code: review.color_code.clone(),
        confidence: review
            .confidence_avg
            .map(one_decimal_percent)
            .unwrap_or_else(|| MISSING.to_string()),
        confidence_max: review.confidence_max.map(one_decimal_percent),
        filename: review.filename.clone(),
        file_hash: review.file_hash.clone(),
        hash_matches,
    }
}

fn row(label: &str, value: Option<String>) -> (String, String) {
    (label.to_string(), value.unwrap_or_else(|| MISSING.to_string()))
}

/// A percentage as the service sent it: `80` stays `80%`, `17.3` stays `17.3%`.
pub fn percent(value: f64) -> String {
    format!("{value}%")
}

/// Confidence values are always shown with exactly one decimal place.
///
/// Ties round away from zero: `12.25` shows as `12.3%`.
pub fn one_decimal_percent(value: f64) -> String {
    format!("{:.1}%", (value * 10.0).round() / 10.0)
}
