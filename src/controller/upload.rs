// The Upload-and-Reveal Controller.
//
// Owns one ControllerState and drives it against an AnalysisService.
// `submit` takes `&mut self`, so a single controller can never have two
// requests in flight. Phase changes are broadcast on a watch channel for
// front ends that render the loading indicator from another task.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::analysis::result::AnalysisResult;
use crate::analysis::traits::AnalysisService;
use crate::analysis::view::ResultView;
use crate::media::SelectedFile;

use super::drag::{DragEvent, DropZone};
use super::error::ControllerError;
use super::notify::{Notice, NoticeLevel, Notifier};
use super::state::{ControllerState, RequestPhase};

pub struct UploadController {
    state: ControllerState,
    service: Arc<dyn AnalysisService>,
    notifier: Arc<dyn Notifier>,
    drop_zone: Option<DropZone>,
    phase_tx: watch::Sender<RequestPhase>,
}

impl UploadController {
    pub fn new(service: Arc<dyn AnalysisService>, notifier: Arc<dyn Notifier>) -> Self {
        let (phase_tx, _) = watch::channel(RequestPhase::Idle);
        Self {
            state: ControllerState::new(),
            service,
            notifier,
            drop_zone: None,
            phase_tx,
        }
    }

    /// Attach a drop region. Without one, drag events are ignored.
    pub fn with_drop_zone(mut self, zone: DropZone) -> Self {
        self.drop_zone = Some(zone);
        self
    }

    /// Watch the request phase. The receiver sees Loading for exactly the
    /// span between dispatch and response.
    pub fn subscribe(&self) -> watch::Receiver<RequestPhase> {
        self.phase_tx.subscribe()
    }

    /// Replace the selected file. Any file is accepted.
    pub fn select_file(&mut self, file: SelectedFile) {
        info!(file = %file.name, bytes = file.bytes.len(), "File selected");
        self.state.select_file(file);
    }

    /// Upload the selected file and wait for the verdict.
    ///
    /// Errors are also raised on the notifier, exactly once per call. On
    /// every return path the controller is out of Loading and ready for
    /// another submit.
    pub async fn submit(&mut self) -> Result<(), ControllerError> {
        let file = match self.state.begin_submit() {
            Ok(file) => file,
            Err(err) => {
                warn!("Submit attempted with no file selected");
                raise(self.notifier.as_ref(), &err, NoticeLevel::Warning);
                return Err(err);
            }
        };

        info!(file = %file.name, "Submitting media for analysis");
        self.phase_tx.send_replace(RequestPhase::Loading);

        let outcome = self.service.analyze(file).await;

        match outcome {
            Ok(result) => {
                info!(verdict = ?result.verdict(), "Analysis complete");
                self.state.complete(result);
                self.phase_tx.send_replace(RequestPhase::Completed);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                self.state.fail();
                self.phase_tx.send_replace(RequestPhase::Failed);
                let err = ControllerError::AnalysisFailed(e);
                raise(self.notifier.as_ref(), &err, NoticeLevel::Error);
                Err(err)
            }
        }
    }

    /// Reveal the external review. Returns whether it is now shown; false
    /// when the current result has no review.
    pub fn reveal_secondary_analysis(&mut self) -> bool {
        self.state.reveal_secondary()
    }

    /// Feed a drag event to the drop zone. A drop carrying a file selects it.
    pub fn handle_drag(&mut self, event: DragEvent) {
        let Some(zone) = self.drop_zone.as_mut() else {
            return;
        };
        if let Some(file) = zone.handle(event) {
            self.select_file(file);
        }
    }

    pub fn drop_zone_armed(&self) -> bool {
        self.drop_zone.as_ref().is_some_and(DropZone::is_armed)
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.state.result()
    }

    pub fn view(&self) -> Option<ResultView> {
        self.state.view()
    }
}

fn raise(notifier: &dyn Notifier, err: &ControllerError, level: NoticeLevel) {
    let detail = match err {
        ControllerError::MissingFile => None,
        ControllerError::AnalysisFailed(e) => Some(format!("{e:#}")),
    };
    notifier.notify(&Notice {
        level,
        message: err.user_message().to_string(),
        detail,
    });
}
