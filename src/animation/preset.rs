//! Show and dismiss animation presets.
//!
//! Every preset is data: an optional starting [`Keyframe`] and a list of
//! [`Phase`]s, each moving the container to another keyframe with its own
//! [`Transition`]. Keyframes are resolved against the container's resting
//! frame and the popup bounds, then [`ResolvedMotion::play`] chains the phases
//! through an [`Animator`].
//!
//! | Preset | Motion | Duration | Timing |
//! |---|---|---|---|
//! | fade | opacity | 150 ms | linear |
//! | grow / shrink | opacity + scale | 150 ms | system curve |
//! | slide | frame from/to an edge | 300 ms | system curve |
//! | bounce in | opacity + scale or frame from an edge | ~600 ms | spring |
//! | bounce out | nudge 130 ms, then exit 260 ms | 390 ms | ease-out, ease-in |

use std::collections::VecDeque;
use std::rc::Rc;

use crate::animation::{Animator, Completion, SpringConfig, TimingFunction, Transition};
use crate::geometry::Rect;
use crate::layer::LayerProps;

const FADE_MS: f32 = 150.0;
const SCALE_MS: f32 = 150.0;
const SLIDE_MS: f32 = 300.0;
const BOUNCE_NUDGE_MS: f32 = 130.0;
const BOUNCE_EXIT_MS: f32 = BOUNCE_NUDGE_MS * 2.0;
const BOUNCE_NUDGE_PX: f32 = 40.0;
const BOUNCE_DAMPING_RATIO: f32 = 0.8;
const BOUNCE_SETTLE_SECS: f32 = 0.6;

/// Edge of the popup bounds a slide or bounce enters from or exits through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

/// How the popup is presented. Default: [`ShowStyle::ShrinkIn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShowStyle {
    None,
    FadeIn,
    GrowIn,
    #[default]
    ShrinkIn,
    SlideInFrom(Edge),
    BounceIn,
    BounceInFrom(Edge),
}

impl ShowStyle {
    pub const ALL: [ShowStyle; 13] = [
        ShowStyle::None,
        ShowStyle::FadeIn,
        ShowStyle::GrowIn,
        ShowStyle::ShrinkIn,
        ShowStyle::SlideInFrom(Edge::Top),
        ShowStyle::SlideInFrom(Edge::Bottom),
        ShowStyle::SlideInFrom(Edge::Left),
        ShowStyle::SlideInFrom(Edge::Right),
        ShowStyle::BounceIn,
        ShowStyle::BounceInFrom(Edge::Top),
        ShowStyle::BounceInFrom(Edge::Bottom),
        ShowStyle::BounceInFrom(Edge::Left),
        ShowStyle::BounceInFrom(Edge::Right),
    ];

    pub fn motion(self) -> Motion {
        let rest = Keyframe::REST;
        match self {
            ShowStyle::None => Motion::starting_at(rest),
            ShowStyle::FadeIn => Motion::starting_at(rest.alpha(0.0))
                .then(rest, Transition::new(FADE_MS, TimingFunction::Linear)),
            ShowStyle::GrowIn => Motion::starting_at(rest.alpha(0.0).scale(0.85))
                .then(rest, Transition::new(SCALE_MS, TimingFunction::SYSTEM)),
            ShowStyle::ShrinkIn => Motion::starting_at(rest.alpha(0.0).scale(1.25))
                .then(rest, Transition::new(SCALE_MS, TimingFunction::SYSTEM)),
            ShowStyle::SlideInFrom(edge) => Motion::starting_at(rest.at(Position::OffEdge(edge)))
                .then(rest, Transition::new(SLIDE_MS, TimingFunction::SYSTEM)),
            ShowStyle::BounceIn => {
                Motion::starting_at(rest.alpha(0.0).scale(0.1)).then(rest, bounce_spring(15.0))
            }
            ShowStyle::BounceInFrom(edge) => {
                Motion::starting_at(rest.at(Position::OffEdge(edge))).then(rest, bounce_spring(10.0))
            }
        }
    }
}

/// How the popup is dismissed. Default: [`DismissStyle::ShrinkOut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DismissStyle {
    None,
    FadeOut,
    GrowOut,
    #[default]
    ShrinkOut,
    SlideOutTo(Edge),
    BounceOut,
    BounceOutTo(Edge),
}

impl DismissStyle {
    pub const ALL: [DismissStyle; 13] = [
        DismissStyle::None,
        DismissStyle::FadeOut,
        DismissStyle::GrowOut,
        DismissStyle::ShrinkOut,
        DismissStyle::SlideOutTo(Edge::Top),
        DismissStyle::SlideOutTo(Edge::Bottom),
        DismissStyle::SlideOutTo(Edge::Left),
        DismissStyle::SlideOutTo(Edge::Right),
        DismissStyle::BounceOut,
        DismissStyle::BounceOutTo(Edge::Top),
        DismissStyle::BounceOutTo(Edge::Bottom),
        DismissStyle::BounceOutTo(Edge::Left),
        DismissStyle::BounceOutTo(Edge::Right),
    ];

    /// Dismiss motions start wherever the container currently is.
    pub fn motion(self) -> Motion {
        let rest = Keyframe::REST;
        let hidden = rest.alpha(0.0);
        match self {
            DismissStyle::None => Motion::from_current().then(hidden, Transition::instant()),
            DismissStyle::FadeOut => {
                Motion::from_current().then(hidden, Transition::new(FADE_MS, TimingFunction::Linear))
            }
            DismissStyle::GrowOut => Motion::from_current()
                .then(hidden.scale(1.1), Transition::new(SCALE_MS, TimingFunction::SYSTEM)),
            DismissStyle::ShrinkOut => Motion::from_current()
                .then(hidden.scale(0.8), Transition::new(SCALE_MS, TimingFunction::SYSTEM)),
            DismissStyle::SlideOutTo(edge) => Motion::from_current().then(
                rest.at(Position::OffEdge(edge)),
                Transition::new(SLIDE_MS, TimingFunction::SYSTEM),
            ),
            DismissStyle::BounceOut => Motion::from_current()
                .then(
                    rest.scale(1.1),
                    Transition::new(BOUNCE_NUDGE_MS, TimingFunction::EaseOut),
                )
                .then(
                    hidden.scale(0.1),
                    Transition::new(BOUNCE_EXIT_MS, TimingFunction::EaseIn),
                ),
            DismissStyle::BounceOutTo(edge) => Motion::from_current()
                .then(
                    rest.at(Position::AwayFrom(edge, BOUNCE_NUDGE_PX)),
                    Transition::new(BOUNCE_NUDGE_MS, TimingFunction::EaseOut),
                )
                .then(
                    rest.at(Position::OffEdge(edge)),
                    Transition::new(BOUNCE_EXIT_MS, TimingFunction::EaseIn),
                ),
        }
    }
}

fn bounce_spring(initial_velocity: f32) -> Transition {
    Transition::spring(
        SpringConfig::from_damping_ratio(BOUNCE_DAMPING_RATIO, BOUNCE_SETTLE_SECS)
            .initial_velocity(initial_velocity),
    )
}

/// Where a keyframe puts the container, relative to its resting frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// The resting frame itself
    Rest,
    /// Just outside the popup bounds past the given edge
    OffEdge(Edge),
    /// The resting frame moved away from the given edge by some pixels
    AwayFrom(Edge, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub alpha: f32,
    pub scale: f32,
    pub position: Position,
}

impl Keyframe {
    pub const REST: Keyframe = Keyframe {
        alpha: 1.0,
        scale: 1.0,
        position: Position::Rest,
    };

    pub const fn alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    pub const fn scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    pub const fn at(self, position: Position) -> Self {
        Self { position, ..self }
    }

    /// Concrete layer props for a container resting at `rest` inside `bounds`.
    pub fn resolve(&self, rest: Rect, bounds: Rect) -> LayerProps {
        let frame = match self.position {
            Position::Rest => rest,
            Position::OffEdge(Edge::Top) => rest.with_origin(rest.x, -rest.height),
            Position::OffEdge(Edge::Bottom) => rest.with_origin(rest.x, bounds.height),
            Position::OffEdge(Edge::Left) => rest.with_origin(-rest.width, rest.y),
            Position::OffEdge(Edge::Right) => rest.with_origin(bounds.width, rest.y),
            Position::AwayFrom(Edge::Top, px) => rest.offset(0.0, px),
            Position::AwayFrom(Edge::Bottom, px) => rest.offset(0.0, -px),
            Position::AwayFrom(Edge::Left, px) => rest.offset(px, 0.0),
            Position::AwayFrom(Edge::Right, px) => rest.offset(-px, 0.0),
        };
        LayerProps::new(frame).alpha(self.alpha).scale(self.scale)
    }
}

#[derive(Debug, Clone)]
pub struct Phase {
    pub to: Keyframe,
    pub transition: Transition,
}

#[derive(Debug, Clone)]
pub struct Motion {
    /// Starting keyframe; `None` starts from the container's current props
    pub from: Option<Keyframe>,
    pub phases: Vec<Phase>,
}

impl Motion {
    fn starting_at(keyframe: Keyframe) -> Self {
        Self {
            from: Some(keyframe),
            phases: Vec::new(),
        }
    }

    fn from_current() -> Self {
        Self {
            from: None,
            phases: Vec::new(),
        }
    }

    fn then(mut self, to: Keyframe, transition: Transition) -> Self {
        self.phases.push(Phase { to, transition });
        self
    }

    /// Total nominal duration in milliseconds (spring phases count their cap).
    pub fn duration_ms(&self) -> f32 {
        self.phases
            .iter()
            .map(|phase| phase.transition.delay_ms + phase.transition.duration_ms)
            .sum()
    }

    pub fn resolve(&self, rest: Rect, bounds: Rect) -> ResolvedMotion {
        ResolvedMotion {
            start: self.from.map(|keyframe| keyframe.resolve(rest, bounds)),
            steps: self
                .phases
                .iter()
                .map(|phase| (phase.to.resolve(rest, bounds), phase.transition.clone()))
                .collect(),
        }
    }
}

/// A motion with concrete layer props for every keyframe.
pub struct ResolvedMotion {
    pub start: Option<LayerProps>,
    pub steps: VecDeque<(LayerProps, Transition)>,
}

impl ResolvedMotion {
    /// Run the phases one after another from `current` (or the motion's own
    /// start), feeding every value into `sink`. `done` runs exactly once after
    /// the last phase, synchronously when there are no timed phases.
    pub fn play(
        self,
        animator: Rc<dyn Animator>,
        current: LayerProps,
        sink: Rc<dyn Fn(LayerProps)>,
        done: Completion,
    ) {
        let from = match self.start {
            Some(start) => {
                sink(start);
                start
            }
            None => current,
        };
        play_steps(animator, from, self.steps, sink, done);
    }
}

fn play_steps(
    animator: Rc<dyn Animator>,
    from: LayerProps,
    mut steps: VecDeque<(LayerProps, Transition)>,
    sink: Rc<dyn Fn(LayerProps)>,
    done: Completion,
) {
    let Some((to, transition)) = steps.pop_front() else {
        done();
        return;
    };

    let phase_sink = Rc::clone(&sink);
    let next_animator = Rc::clone(&animator);
    animator.animate(
        from,
        to,
        transition,
        Box::new(move |props| phase_sink(props)),
        Box::new(move || play_steps(next_animator, to, steps, sink, done)),
    );
}
