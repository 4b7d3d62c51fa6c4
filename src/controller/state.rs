// Controller state and its transitions.
//
// Every transition is a plain method on ControllerState with no I/O, so the
// whole state machine can be driven from unit tests:
//
//   Idle -[submit, file]-> Loading -[ok]-> Completed -[submit]-> Loading
//                          Loading -[err]-> Failed   -[submit]-> Loading

use crate::analysis::result::AnalysisResult;
use crate::analysis::view::{derive_view, ResultView};
use crate::media::SelectedFile;

use super::error::ControllerError;

/// Where the current request stands, with its result once one arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Completed(AnalysisResult),
    Failed,
}

/// Payload-free view of RequestState, cheap to broadcast to observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestPhase {
    #[default]
    Idle,
    Loading,
    Completed,
    Failed,
}

impl RequestState {
    pub fn phase(&self) -> RequestPhase {
        match self {
            Self::Idle => RequestPhase::Idle,
            Self::Loading => RequestPhase::Loading,
            Self::Completed(_) => RequestPhase::Completed,
            Self::Failed => RequestPhase::Failed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    selected_file: Option<SelectedFile>,
    request: RequestState,
    secondary_revealed: bool,
    /// SHA-256 of the submitted bytes, kept only when the result has a
    /// `file_hash` to compare against.
    local_hash: Option<String>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected file. No validation of any kind.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
    }

    /// Enter Loading, dropping any previous result and hiding the review.
    ///
    /// Returns the file to upload. With no file selected, the state is left
    /// untouched and `MissingFile` is returned.
    pub fn begin_submit(&mut self) -> Result<&SelectedFile, ControllerError> {
        let file = self
            .selected_file
            .as_ref()
            .ok_or(ControllerError::MissingFile)?;
        self.request = RequestState::Loading;
        self.secondary_revealed = false;
        self.local_hash = None;
        Ok(file)
    }

    /// Loading -> Completed.
    pub fn complete(&mut self, result: AnalysisResult) {
        let wants_hash = result
            .secondary()
            .is_some_and(|review| review.file_hash.is_some());
        self.local_hash = if wants_hash {
            self.selected_file.as_ref().map(SelectedFile::sha256_hex)
        } else {
            None
        };
        self.request = RequestState::Completed(result);
    }

    /// Loading -> Failed.
    pub fn fail(&mut self) {
        self.request = RequestState::Failed;
        self.local_hash = None;
    }

    /// Show the external review panel.
    ///
    /// Returns whether the panel is now revealed. Without a review on the
    /// current result this does nothing and returns false. Once revealed it
    /// stays revealed until the next submit.
    pub fn reveal_secondary(&mut self) -> bool {
        if self.secondary_available() {
            self.secondary_revealed = true;
        }
        self.secondary_revealed
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn phase(&self) -> RequestPhase {
        self.request.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.request == RequestState::Loading
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.request {
            RequestState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn secondary_available(&self) -> bool {
        self.result().and_then(AnalysisResult::secondary).is_some()
    }

    pub fn secondary_revealed(&self) -> bool {
        self.secondary_revealed
    }

    /// What to render for the current result, if there is one.
    pub fn view(&self) -> Option<ResultView> {
        self.result()
            .map(|result| derive_view(result, self.secondary_revealed, self.local_hash.as_deref()))
    }
}
