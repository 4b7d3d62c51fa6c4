// Unit tests for the Upload-and-Reveal Controller.
//
// The analysis service and notifier are replaced with in-memory doubles,
// so these exercise the full submit flow without any network access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::watch;

use lucid_trace::analysis::result::AnalysisResult;
use lucid_trace::analysis::traits::AnalysisService;
use lucid_trace::controller::drag::{DragEvent, DropZone, ElementId, ElementTree};
use lucid_trace::controller::notify::{NoticeLevel, RecordingNotifier};
use lucid_trace::controller::{ControllerError, RequestPhase, RequestState, UploadController};
use lucid_trace::media::SelectedFile;

/// Service double that replays canned responses in order and records
/// what it saw.
#[derive(Default)]
struct ScriptedService {
    responses: Mutex<VecDeque<Result<Value, String>>>,
    calls: AtomicUsize,
    uploaded: Mutex<Vec<String>>,
    /// Phase observed by the service while its request was in flight.
    phase_watch: Mutex<Option<watch::Receiver<RequestPhase>>>,
    observed: Mutex<Vec<RequestPhase>>,
}

impl ScriptedService {
    fn with(responses: Vec<Result<Value, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded.lock().unwrap().push(file.name.clone());

        if let Some(rx) = self.phase_watch.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(*rx.borrow());
        }

        // Yield once so the call is genuinely asynchronous.
        tokio::task::yield_now().await;

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(body)) => AnalysisResult::from_json(body),
            Some(Err(message)) => anyhow::bail!(message),
            None => anyhow::bail!("no scripted response left"),
        }
    }
}

fn flat_body() -> Value {
    json!({"frames_analyzed": 42, "ai_probability": 17.3, "verdict": "likely authentic"})
}

fn paired_body() -> Value {
    json!([
        {"frames_analyzed": 10, "details": {"ai_image_branch": 80, "deepfake_branch": 65}, "verdict": "synthetic"},
        {"risk_level": "high", "color_code": "#ff0000", "confidence_avg": 91.47, "filename": "x.mp4", "file_hash": "abc"}
    ])
}

fn controller(service: Arc<ScriptedService>) -> (UploadController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = UploadController::new(service, notifier.clone());
    (controller, notifier)
}

#[tokio::test]
async fn submit_without_file_never_calls_service() {
    let service = ScriptedService::with(vec![Ok(flat_body())]);
    let (mut controller, notifier) = controller(service.clone());

    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, ControllerError::MissingFile));
    assert_eq!(service.calls(), 0);
    assert_eq!(notifier.count(), 1);
    assert_eq!(notifier.notices()[0].level, NoticeLevel::Warning);
    assert_eq!(controller.state().phase(), RequestPhase::Idle);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn loading_is_visible_only_while_in_flight() {
    let service = ScriptedService::with(vec![Ok(flat_body()), Err("connection refused".into())]);
    let (mut controller, _notifier) = controller(service.clone());
    *service.phase_watch.lock().unwrap() = Some(controller.subscribe());

    controller.select_file(SelectedFile::new("clip.mp4", vec![0; 16]));

    controller.submit().await.unwrap();
    assert!(!controller.is_loading());
    assert_eq!(controller.state().phase(), RequestPhase::Completed);

    controller.submit().await.unwrap_err();
    assert!(!controller.is_loading());
    assert_eq!(controller.state().phase(), RequestPhase::Failed);

    assert_eq!(
        *service.observed.lock().unwrap(),
        vec![RequestPhase::Loading, RequestPhase::Loading]
    );
}

#[tokio::test]
async fn watch_channel_ends_on_final_phase() {
    let service = ScriptedService::with(vec![Err("boom".into())]);
    let (mut controller, _notifier) = controller(service);
    let rx = controller.subscribe();

    controller.select_file(SelectedFile::new("clip.mp4", vec![]));
    let _ = controller.submit().await;

    assert_eq!(*rx.borrow(), RequestPhase::Failed);
}

#[tokio::test]
async fn flat_result_completes_without_secondary() {
    let service = ScriptedService::with(vec![Ok(flat_body())]);
    let (mut controller, notifier) = controller(service);

    controller.select_file(SelectedFile::new("photo.jpg", vec![1, 2, 3]));
    controller.submit().await.unwrap();

    assert!(matches!(
        controller.state().request(),
        RequestState::Completed(AnalysisResult::Simple(_))
    ));
    assert!(!controller.reveal_secondary_analysis());
    let view = controller.view().unwrap();
    assert_eq!(view.primary.rows.len(), 3);
    assert!(view.secondary.is_none());
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn paired_result_reveal_is_explicit_and_idempotent() {
    let service = ScriptedService::with(vec![Ok(paired_body())]);
    let (mut controller, _notifier) = controller(service);

    controller.select_file(SelectedFile::new("x.mp4", vec![9]));
    controller.submit().await.unwrap();

    let view = controller.view().unwrap();
    assert!(view.secondary_available);
    assert!(view.secondary.is_none());

    assert!(controller.reveal_secondary_analysis());
    assert!(controller.reveal_secondary_analysis());

    let panel = controller.view().unwrap().secondary.unwrap();
    assert_eq!(panel.risk_level, "high");
    assert_eq!(panel.confidence, "91.5%");
    // "abc" is not the digest of [9]
    assert_eq!(panel.hash_matches, Some(false));
}

#[tokio::test]
async fn resubmit_clears_previous_result_and_reveal() {
    let service = ScriptedService::with(vec![Ok(paired_body()), Ok(paired_body())]);
    let (mut controller, _notifier) = controller(service.clone());
    *service.phase_watch.lock().unwrap() = Some(controller.subscribe());

    controller.select_file(SelectedFile::new("x.mp4", vec![]));
    controller.submit().await.unwrap();
    controller.reveal_secondary_analysis();
    assert!(controller.state().secondary_revealed());

    controller.submit().await.unwrap();

    // The new result starts hidden again
    assert!(!controller.state().secondary_revealed());
    assert!(controller.view().unwrap().secondary.is_none());
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn failed_resubmit_drops_previous_result() {
    let service = ScriptedService::with(vec![Ok(flat_body()), Err("HTTP 500".into())]);
    let (mut controller, _notifier) = controller(service);

    controller.select_file(SelectedFile::new("a.mp4", vec![]));
    controller.submit().await.unwrap();
    assert!(controller.result().is_some());

    controller.submit().await.unwrap_err();
    // The earlier Completed result does not survive a failed resubmit
    assert!(controller.result().is_none());
    assert!(controller.view().is_none());
}

#[tokio::test]
async fn network_rejection_notifies_exactly_once() {
    let service = ScriptedService::with(vec![Err("connection reset by peer".into())]);
    let (mut controller, notifier) = controller(service);

    controller.select_file(SelectedFile::new("a.mp4", vec![]));
    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, ControllerError::AnalysisFailed(_)));
    assert!(err.to_string().contains("connection reset by peer"));
    assert_eq!(controller.state().phase(), RequestPhase::Failed);
    assert!(!controller.is_loading());

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0]
        .detail
        .as_deref()
        .is_some_and(|d| d.contains("connection reset by peer")));
}

#[tokio::test]
async fn failure_then_retry_succeeds() {
    let service = ScriptedService::with(vec![Err("timeout".into()), Ok(flat_body())]);
    let (mut controller, notifier) = controller(service);

    controller.select_file(SelectedFile::new("a.mp4", vec![]));
    assert!(controller.submit().await.is_err());
    assert!(controller.submit().await.is_ok());
    assert_eq!(controller.state().phase(), RequestPhase::Completed);
    assert_eq!(notifier.count(), 1);
}

#[tokio::test]
async fn select_file_replaces_previous_selection() {
    let service = ScriptedService::with(vec![Ok(flat_body())]);
    let (mut controller, _notifier) = controller(service.clone());

    controller.select_file(SelectedFile::new("first.mp4", vec![]));
    controller.select_file(SelectedFile::new("second.txt", vec![]));
    controller.submit().await.unwrap();

    assert_eq!(*service.uploaded.lock().unwrap(), vec!["second.txt".to_string()]);
}

#[tokio::test]
async fn dropped_file_is_submitted_like_a_picked_one() {
    let region = ElementId(1);
    let mut tree = ElementTree::new();
    tree.add_child(region, ElementId(2));

    let service = ScriptedService::with(vec![Ok(flat_body())]);
    let (controller, _notifier) = controller(service.clone());
    let mut controller = controller.with_drop_zone(DropZone::new(region, tree));

    controller.handle_drag(DragEvent::Enter {
        target: ElementId(2),
        carries_files: true,
    });
    assert!(controller.drop_zone_armed());

    controller.handle_drag(DragEvent::Drop {
        file: Some(SelectedFile::new("dropped.webm", vec![7])),
    });
    assert!(!controller.drop_zone_armed());
    assert_eq!(
        controller.state().selected_file().map(|f| f.name.as_str()),
        Some("dropped.webm")
    );

    controller.submit().await.unwrap();
    assert_eq!(*service.uploaded.lock().unwrap(), vec!["dropped.webm".to_string()]);
}

#[tokio::test]
async fn drag_events_without_drop_zone_are_ignored() {
    let service = ScriptedService::with(vec![]);
    let (mut controller, _notifier) = controller(service);

    controller.handle_drag(DragEvent::Drop {
        file: Some(SelectedFile::new("ignored.mp4", vec![])),
    });
    assert!(controller.state().selected_file().is_none());
    assert!(!controller.drop_zone_armed());
}
