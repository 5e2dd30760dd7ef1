mod animatable;
mod animator;
pub mod preset;
mod spring;
mod timing;
mod tween;

pub use animatable::Animatable;
pub use animator::{Animator, Completion, FrameAnimator, PropsSink, FRAME_INTERVAL};
pub use preset::{DismissStyle, Edge, ShowStyle};
pub use spring::{SpringConfig, SpringState};
pub use timing::{CubicBezier, TimingFunction};
pub use tween::{Step, Tween};

/// Configuration for how a property animates from one value to another
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of the animation in milliseconds (the upper bound for springs)
    pub duration_ms: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in milliseconds
    pub delay_ms: f32,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0.0,
        }
    }

    /// Jump straight to the target.
    pub fn instant() -> Self {
        Self::new(0.0, TimingFunction::Linear)
    }

    /// Create a spring-based transition with the given configuration
    pub fn spring(config: SpringConfig) -> Self {
        Self {
            duration_ms: 1000.0, // Spring duration is dynamic, this is max
            timing: TimingFunction::Spring(config),
            delay_ms: 0.0,
        }
    }

    /// Whether the transition completes without any intermediate frames.
    pub fn is_instant(&self) -> bool {
        self.duration_ms <= 0.0 && self.delay_ms <= 0.0
    }
}
