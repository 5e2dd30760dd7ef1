pub mod animation;
pub mod config;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod layout;
pub mod popup;
pub mod registry;
pub mod scheduler;
pub mod transform;

mod context;
mod error;

pub use context::PopupContext;
pub use error::PopupError;

pub mod prelude {
    pub use crate::animation::{DismissStyle, Edge, ShowStyle};
    pub use crate::config::{MaskStyle, PopupConfig};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::host::{Host, SurfaceId, SurfaceLevel, SurfaceStack};
    pub use crate::layer::{Color, Layer};
    pub use crate::layout::{HorizontalLayout, Placement, PopupLayout, VerticalLayout};
    pub use crate::popup::{Content, Hit, Phase, Popup, PopupDelegate, WeakPopup};
    pub use crate::scheduler::{LoopScheduler, ManualScheduler, Scheduler};
    pub use crate::transform::Transform;
    pub use crate::{PopupContext, PopupError};
}
