use thiserror::Error;

use crate::host::SurfaceId;

/// Failures from the collaborators a popup depends on.
///
/// Misuse of the popup itself (showing an active popup, dismissing one that
/// is not shown) is not an error: those calls are ignored.
#[derive(Debug, Error)]
pub enum PopupError {
    #[error("no normal-level surface to attach the popup to")]
    NoSurface,
    #[error("unknown surface {0:?}")]
    UnknownSurface(SurfaceId),
    #[error("event loop rejected the timer: {0}")]
    Scheduler(#[from] calloop::Error),
}
