use std::fmt;

/// Errors surfaced by the controller to whoever triggered the action.
///
/// Neither is fatal: after either one the controller is back in a state
/// that accepts another submit.
#[derive(Debug)]
pub enum ControllerError {
    /// Submit was attempted with no file selected. No request was made.
    MissingFile,
    /// The request failed: transport error, non-2xx status, or a body
    /// that could not be parsed.
    AnalysisFailed(anyhow::Error),
}

impl ControllerError {
    /// Message shown to the user in the blocking notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingFile => "Please choose a media file first.",
            Self::AnalysisFailed(_) => "Error analyzing media.",
        }
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile => write!(f, "no file selected"),
            Self::AnalysisFailed(err) => write!(f, "analysis failed: {err:#}"),
        }
    }
}

impl std::error::Error for ControllerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingFile => None,
            Self::AnalysisFailed(err) => Some(&**err),
        }
    }
}
