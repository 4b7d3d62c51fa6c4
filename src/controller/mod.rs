// Upload-and-Reveal Controller.
//
// `state` holds the pure transitions, `upload` wires them to an
// AnalysisService and a Notifier, and `drag` models the drop region.
// Nothing in here touches a terminal or a rendering environment.

pub mod drag;
pub mod error;
pub mod notify;
pub mod state;
pub mod upload;

pub use error::ControllerError;
pub use state::{ControllerState, RequestPhase, RequestState};
pub use upload::UploadController;
