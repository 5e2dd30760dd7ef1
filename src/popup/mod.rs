//! The popup controller.
//!
//! A [`Popup`] presents a caller-owned [`Content`] above everything else on a
//! top-level surface. It owns two layers: a full-surface backdrop and a
//! container that exactly fits the content. Presentation runs through a
//! small state machine:
//!
//! ```text
//! Idle --show--> Showing --animation done--> Shown --dismiss--> Dismissing --animation done--> Idle
//! ```
//!
//! `show` is only honored while idle and `dismiss` only while shown; any
//! other call is ignored. The work behind both is deferred to the next turn
//! of the event loop, and every show and dismiss reports its completion
//! exactly once.
//!
//! ```ignore
//! let popup = Popup::with_config(
//!     &ctx,
//!     Size::new(200.0, 120.0),
//!     PopupConfig::new().show_style(ShowStyle::BounceIn),
//! );
//! popup.on_dismissed(|popup| log::info!("popup {} gone", popup.id().raw()));
//! popup.show_with_duration(Duration::from_secs(2));
//! ```

mod content;
mod hooks;

pub use content::Content;
pub use hooks::{Callback, PopupDelegate};

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::animation::{DismissStyle, ShowStyle, TimingFunction, Transition};
use crate::config::{MaskStyle, PopupConfig};
use crate::context::PopupContext;
use crate::error::PopupError;
use crate::geometry::{Point, Rect};
use crate::host::{Attachment, SurfaceId};
use crate::layer::{Color, Layer, LayerProps};
use crate::layout::{self, Autoresizing, Placement, PopupLayout};
use crate::registry;
use crate::scheduler::TimerToken;
use crate::transform::Transform;
use hooks::{Event, Hooks};

const BACKDROP_FADE_MS: f32 = 150.0;

/// Unique identifier for each popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopupId(u64);

impl PopupId {
    /// Create a new unique popup ID.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        PopupId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value (for debugging/logging).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Presentation phase of a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Showing,
    Shown,
    Dismissing,
}

/// Outcome of routing a touch through a popup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// The touch belongs to whatever is below the popup
    PassThrough,
    /// The backdrop swallowed the touch
    Backdrop,
    /// The touch landed on the content, at `local` in container coordinates
    Content { local: Point },
}

struct State {
    config: PopupConfig,
    phase: Phase,
    /// Bumped on every show and dismiss; animation values and completions
    /// carry the generation they were started in and are dropped when stale.
    generation: u64,
    attachment: Option<Attachment>,
    frame: Rect,
    backdrop: Layer,
    container: Layer,
    /// Last resting frame of the container, in popup coordinates
    rest: Rect,
    autoresizing: Autoresizing,
    content_attached: bool,
    dismiss_timer: Option<TimerToken>,
}

pub(crate) struct PopupInner {
    id: PopupId,
    ctx: PopupContext,
    content: Box<dyn Content>,
    state: RefCell<State>,
    hooks: RefCell<Hooks>,
}

impl Drop for PopupInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(token) = state.dismiss_timer.take() {
            self.ctx.scheduler.cancel(token);
        }
        if state.attachment.take().is_some() {
            log::debug!("Popup {} dropped while attached", self.id.raw());
            self.ctx.host.detach(self.id);
        }
        registry::unregister(self.id);
    }
}

/// Handle to a popup. Clones share the same popup; it is torn down when the
/// last handle is dropped.
#[derive(Clone)]
pub struct Popup {
    inner: Rc<PopupInner>,
}

/// Non-owning handle to a popup, for content and long-lived closures.
#[derive(Clone, Default)]
pub struct WeakPopup {
    inner: Weak<PopupInner>,
}

impl WeakPopup {
    pub fn upgrade(&self) -> Option<Popup> {
        self.inner.upgrade().map(Popup::from_inner)
    }

    /// Dismiss the popup presenting this handle's content, if it still exists.
    pub fn dismiss_presenting(&self, animated: bool) {
        match self.upgrade() {
            Some(popup) => popup.dismiss(animated),
            None => log::debug!("No presenting popup to dismiss"),
        }
    }
}

impl fmt::Debug for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("id", &self.inner.id)
            .field("phase", &self.phase())
            .finish()
    }
}

impl Popup {
    /// Create an idle popup with the default configuration.
    pub fn new(ctx: &PopupContext, content: impl Content + 'static) -> Self {
        Self::with_config(ctx, content, PopupConfig::default())
    }

    pub fn with_config(ctx: &PopupContext, content: impl Content + 'static, config: PopupConfig) -> Self {
        let state = State {
            config,
            phase: Phase::Idle,
            generation: 0,
            attachment: None,
            frame: Rect::default(),
            backdrop: Layer::default(),
            container: Layer::default(),
            rest: Rect::default(),
            autoresizing: Autoresizing::empty(),
            content_attached: false,
            dismiss_timer: None,
        };
        Self {
            inner: Rc::new(PopupInner {
                id: PopupId::next(),
                ctx: ctx.clone(),
                content: Box::new(content),
                state: RefCell::new(state),
                hooks: RefCell::new(Hooks::default()),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<PopupInner>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> PopupId {
        self.inner.id
    }

    pub fn downgrade(&self) -> WeakPopup {
        WeakPopup {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // Configuration

    pub fn config(&self) -> PopupConfig {
        self.inner.state.borrow().config.clone()
    }

    pub fn set_config(&self, config: PopupConfig) {
        self.inner.state.borrow_mut().config = config;
    }

    pub fn set_show_style(&self, style: ShowStyle) {
        self.inner.state.borrow_mut().config.show_style = style;
    }

    pub fn set_dismiss_style(&self, style: DismissStyle) {
        self.inner.state.borrow_mut().config.dismiss_style = style;
    }

    pub fn set_mask(&self, mask: MaskStyle) {
        self.inner.state.borrow_mut().config.mask = mask;
    }

    /// Opacity of the dimmed backdrop, clamped to `[0, 1]`. Takes effect on
    /// the next show.
    pub fn set_dimmed_alpha(&self, alpha: f32) {
        self.inner.state.borrow_mut().config.dimmed_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_dismiss_on_backdrop_touch(&self, dismiss: bool) {
        self.inner.state.borrow_mut().config.dismiss_on_backdrop_touch = dismiss;
    }

    pub fn set_dismiss_on_content_touch(&self, dismiss: bool) {
        self.inner.state.borrow_mut().config.dismiss_on_content_touch = dismiss;
    }

    /// Origin the container keeps on axes laid out as `Custom`.
    pub fn set_container_origin(&self, origin: Point) {
        let mut state = self.inner.state.borrow_mut();
        state.rest = state.rest.with_origin(origin.x, origin.y);
    }

    pub fn set_delegate(&self, delegate: Rc<dyn PopupDelegate>) {
        self.inner.hooks.borrow_mut().delegate = Some(delegate);
    }

    pub fn on_shown(&self, callback: impl FnMut(&Popup) + 'static) {
        self.inner.hooks.borrow_mut().on_shown = Some(Box::new(callback));
    }

    pub fn on_will_dismiss(&self, callback: impl FnMut(&Popup) + 'static) {
        self.inner.hooks.borrow_mut().on_will_dismiss = Some(Box::new(callback));
    }

    pub fn on_dismissed(&self, callback: impl FnMut(&Popup) + 'static) {
        self.inner.hooks.borrow_mut().on_dismissed = Some(Box::new(callback));
    }

    // Presentation state

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    pub fn is_being_shown(&self) -> bool {
        self.phase() == Phase::Showing
    }

    pub fn is_showing(&self) -> bool {
        self.phase() == Phase::Shown
    }

    pub fn is_being_dismissed(&self) -> bool {
        self.phase() == Phase::Dismissing
    }

    /// Frame of the popup in surface coordinates; the surface bounds while
    /// attached.
    pub fn frame(&self) -> Rect {
        self.inner.state.borrow().frame
    }

    /// The backdrop layer, in popup coordinates.
    pub fn backdrop(&self) -> Layer {
        self.inner.state.borrow().backdrop
    }

    /// The container layer, in popup coordinates.
    pub fn container(&self) -> Layer {
        self.inner.state.borrow().container
    }

    pub fn container_autoresizing(&self) -> Autoresizing {
        self.inner.state.borrow().autoresizing
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.inner
            .state
            .borrow()
            .attachment
            .map(|attachment| attachment.surface)
    }

    pub fn has_pending_auto_dismiss(&self) -> bool {
        self.inner.state.borrow().dismiss_timer.is_some()
    }

    // Showing

    /// Show centered, until dismissed.
    pub fn show(&self) {
        self.present(Placement::default(), Duration::ZERO);
    }

    pub fn show_with_layout(&self, layout: PopupLayout) {
        self.present(Placement::Layout(layout), Duration::ZERO);
    }

    /// Show centered and dismiss automatically after `duration`. A zero
    /// duration never auto-dismisses.
    pub fn show_with_duration(&self, duration: Duration) {
        self.present(Placement::default(), duration);
    }

    pub fn show_with_layout_and_duration(&self, layout: PopupLayout, duration: Duration) {
        self.present(Placement::Layout(layout), duration);
    }

    /// Show centered on `point`. `space` maps the coordinate space `point` is
    /// given in to surface coordinates; `None` means surface coordinates.
    pub fn show_at_center(&self, point: Point, space: Option<Transform>) {
        self.present(Placement::Center { point, space }, Duration::ZERO);
    }

    pub fn show_at_center_with_duration(&self, point: Point, space: Option<Transform>, duration: Duration) {
        self.present(Placement::Center { point, space }, duration);
    }

    /// Start showing the popup. Ignored unless the popup is idle.
    pub fn present(&self, placement: Placement, duration: Duration) {
        let generation = {
            let mut state = self.inner.state.borrow_mut();
            if state.phase != Phase::Idle {
                log::debug!(
                    "Ignoring show of popup {} while {:?}",
                    self.id().raw(),
                    state.phase
                );
                return;
            }
            state.phase = Phase::Showing;
            state.generation += 1;
            state.generation
        };

        registry::register(self.id(), Rc::downgrade(&self.inner));
        hooks::notify_delegate(&self.inner.hooks, self, |delegate, popup| {
            delegate.will_start_showing(popup)
        });

        let weak = self.downgrade();
        self.inner.ctx.scheduler.defer(Box::new(move || {
            if let Some(popup) = weak.upgrade() {
                popup.run_show(generation, placement, duration);
            }
        }));
    }

    fn run_show(&self, generation: u64, placement: Placement, duration: Duration) {
        if !self.is_current(generation, Phase::Showing) {
            return;
        }

        let attachment = match self.attach() {
            Ok(attachment) => attachment,
            Err(err) => {
                log::error!("Failed to show popup {}: {}", self.id().raw(), err);
                self.inner.state.borrow_mut().phase = Phase::Idle;
                registry::unregister(self.id());
                return;
            }
        };

        let bounds = Rect::from_size(attachment.bounds.size());
        let (show_style, backdrop_from) = {
            let mut state = self.inner.state.borrow_mut();
            state.frame = attachment.bounds;
            let color = match state.config.mask {
                MaskStyle::Dimmed => Color::BLACK.with_alpha(state.config.dimmed_alpha),
                MaskStyle::Clear | MaskStyle::None => Color::TRANSPARENT,
            };
            state.backdrop.set_color(color);
            state.backdrop.set_props(LayerProps::new(bounds).alpha(0.0));
            (state.config.show_style, state.backdrop.props())
        };

        let backdrop_transition = if show_style == ShowStyle::None {
            Transition::instant()
        } else {
            Transition::new(BACKDROP_FADE_MS, TimingFunction::Linear)
        };
        self.animate_backdrop(generation, backdrop_from, backdrop_from.alpha(1.0), backdrop_transition);

        let first_attach = !std::mem::replace(&mut self.inner.state.borrow_mut().content_attached, true);
        if first_attach {
            self.inner.content.attached(self.downgrade());
        }
        self.inner.content.layout_if_needed();
        let size = self.inner.content.size();

        let (rest, current) = {
            let mut state = self.inner.state.borrow_mut();
            let (rest, autoresizing) = layout::resolve(&placement, size, state.rest, bounds);
            state.rest = rest;
            state.autoresizing = autoresizing;
            (rest, state.container.props())
        };
        log::debug!(
            "Showing popup {} with {:?} at {:?}",
            self.id().raw(),
            show_style,
            rest
        );

        let weak = self.downgrade();
        show_style.motion().resolve(rest, bounds).play(
            Rc::clone(&self.inner.ctx.animator),
            current,
            self.container_sink(generation, rest),
            Box::new(move || {
                if let Some(popup) = weak.upgrade() {
                    popup.finish_show(generation, duration);
                }
            }),
        );
    }

    fn finish_show(&self, generation: u64, duration: Duration) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.generation != generation || state.phase != Phase::Showing {
                return;
            }
            state.phase = Phase::Shown;
        }

        hooks::notify_delegate(&self.inner.hooks, self, |delegate, popup| {
            delegate.did_finish_showing(popup)
        });
        hooks::fire(&self.inner.hooks, self, Event::Shown);

        // A callback may already have dismissed the popup
        if !duration.is_zero() && self.is_current(generation, Phase::Shown) {
            self.schedule_auto_dismiss(duration);
        }
    }

    fn schedule_auto_dismiss(&self, duration: Duration) {
        let previous = self.inner.state.borrow_mut().dismiss_timer.take();
        if let Some(token) = previous {
            self.inner.ctx.scheduler.cancel(token);
        }

        let weak = self.downgrade();
        let scheduled = self.inner.ctx.scheduler.schedule(
            duration,
            Box::new(move || {
                if let Some(popup) = weak.upgrade() {
                    popup.inner.state.borrow_mut().dismiss_timer = None;
                    popup.dismiss(true);
                }
            }),
        );

        match scheduled {
            Ok(token) => self.inner.state.borrow_mut().dismiss_timer = Some(token),
            Err(err) => log::warn!(
                "Popup {} will not dismiss automatically: {}",
                self.id().raw(),
                err
            ),
        }
    }

    // Dismissing

    /// Start dismissing the popup. Ignored unless the popup is shown.
    pub fn dismiss(&self, animated: bool) {
        let (generation, timer) = {
            let mut state = self.inner.state.borrow_mut();
            if state.phase != Phase::Shown {
                log::debug!(
                    "Ignoring dismiss of popup {} while {:?}",
                    self.id().raw(),
                    state.phase
                );
                return;
            }
            state.phase = Phase::Dismissing;
            state.generation += 1;
            (state.generation, state.dismiss_timer.take())
        };

        if let Some(token) = timer {
            self.inner.ctx.scheduler.cancel(token);
        }

        hooks::notify_delegate(&self.inner.hooks, self, |delegate, popup| {
            delegate.will_start_dismissing(popup)
        });
        hooks::fire(&self.inner.hooks, self, Event::WillDismiss);

        let weak = self.downgrade();
        self.inner.ctx.scheduler.defer(Box::new(move || {
            if let Some(popup) = weak.upgrade() {
                popup.run_dismiss(generation, animated);
            }
        }));
    }

    fn run_dismiss(&self, generation: u64, animated: bool) {
        if !self.is_current(generation, Phase::Dismissing) {
            return;
        }

        let (dismiss_style, backdrop_from, current, rest, bounds) = {
            let state = self.inner.state.borrow();
            (
                state.config.dismiss_style,
                state.backdrop.props(),
                state.container.props(),
                state.rest,
                Rect::from_size(state.frame.size()),
            )
        };

        let backdrop_transition = if animated && dismiss_style != DismissStyle::None {
            Transition::new(BACKDROP_FADE_MS, TimingFunction::Linear)
        } else {
            Transition::instant()
        };
        self.animate_backdrop(generation, backdrop_from, backdrop_from.alpha(0.0), backdrop_transition);

        let motion = if animated {
            dismiss_style.motion()
        } else {
            DismissStyle::None.motion()
        };
        log::debug!(
            "Dismissing popup {} with {:?} (animated: {})",
            self.id().raw(),
            dismiss_style,
            animated
        );

        let weak = self.downgrade();
        motion.resolve(rest, bounds).play(
            Rc::clone(&self.inner.ctx.animator),
            current,
            self.container_sink(generation, rest),
            Box::new(move || {
                if let Some(popup) = weak.upgrade() {
                    popup.finish_dismiss(generation);
                }
            }),
        );
    }

    fn finish_dismiss(&self, generation: u64) {
        let attachment = {
            let mut state = self.inner.state.borrow_mut();
            if state.generation != generation || state.phase != Phase::Dismissing {
                return;
            }
            state.phase = Phase::Idle;
            state.attachment.take()
        };

        if attachment.is_some() {
            self.inner.ctx.host.detach(self.id());
        }
        registry::unregister(self.id());

        hooks::notify_delegate(&self.inner.hooks, self, |delegate, popup| {
            delegate.did_finish_dismissing(popup)
        });
        hooks::fire(&self.inner.hooks, self, Event::Dismissed);
    }

    /// Dismiss every shown popup on this thread, without animation.
    pub fn dismiss_all() {
        for popup in registry::live() {
            if popup.is_showing() {
                popup.dismiss(false);
            }
        }
    }

    // Touches and bounds

    /// Route a touch at `point` (surface coordinates) through the popup,
    /// dismissing it when the configuration asks for that.
    pub fn hit_test(&self, point: Point) -> Hit {
        let (frame, container, config) = {
            let state = self.inner.state.borrow();
            if state.attachment.is_none() {
                return Hit::PassThrough;
            }
            (state.frame, state.container, state.config.clone())
        };

        if !frame.contains(point.x, point.y) {
            return Hit::PassThrough;
        }

        let point = Point::new(point.x - frame.x, point.y - frame.y);
        if let Some(local) = container.locate(point) {
            if config.dismiss_on_content_touch {
                self.dismiss(true);
            }
            return Hit::Content { local };
        }

        if config.dismiss_on_backdrop_touch {
            self.dismiss(true);
        }
        match config.mask {
            MaskStyle::None => Hit::PassThrough,
            MaskStyle::Clear | MaskStyle::Dimmed => Hit::Backdrop,
        }
    }

    /// Follow a change of the attached surface's bounds: the popup and
    /// backdrop cover the new bounds and the container moves according to its
    /// autoresizing flags. A running show or dismiss animation moves along
    /// with the resting frame.
    pub fn surface_resized(&self, bounds: Rect) {
        let mut state = self.inner.state.borrow_mut();
        let Some(attachment) = state.attachment.as_mut() else {
            return;
        };
        attachment.bounds = bounds;

        let old = state.frame.size();
        let new = bounds.size();
        let autoresizing = state.autoresizing;
        state.frame = bounds;
        state.backdrop.set_frame(Rect::from_size(new));
        let rest = autoresizing.apply(state.rest, old, new);
        let container = state
            .container
            .frame()
            .offset(rest.x - state.rest.x, rest.y - state.rest.y);
        state.rest = rest;
        state.container.set_frame(container);
        log::debug!(
            "Popup {} follows surface resize to {:?}, container at {:?}",
            self.inner.id.raw(),
            bounds,
            container
        );
    }

    /// The surface the popup is attached to went away. A popup that is still
    /// showing goes straight back to idle, a shown one is dismissed without
    /// animation. Either way it stops covering the old surface at once.
    pub(crate) fn surface_removed(&self) {
        let phase = {
            let mut state = self.inner.state.borrow_mut();
            if state.attachment.take().is_none() {
                return;
            }
            if state.phase == Phase::Showing {
                state.generation += 1;
                state.phase = Phase::Idle;
            }
            state.phase
        };

        match phase {
            Phase::Idle => {
                log::warn!("Popup {} lost its surface while showing", self.id().raw());
                registry::unregister(self.id());
            }
            Phase::Shown => self.dismiss(false),
            Phase::Showing | Phase::Dismissing => {}
        }
    }

    // Internals

    fn is_current(&self, generation: u64, phase: Phase) -> bool {
        let state = self.inner.state.borrow();
        state.generation == generation && state.phase == phase
    }

    fn attach(&self) -> Result<Attachment, PopupError> {
        let attached = self.inner.state.borrow().attachment;
        if let Some(attachment) = attached {
            return Ok(attachment);
        }
        let attachment = self.inner.ctx.host.attach(self.id())?;
        self.inner.state.borrow_mut().attachment = Some(attachment);
        Ok(attachment)
    }

    fn animate_backdrop(&self, generation: u64, from: LayerProps, to: LayerProps, transition: Transition) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.ctx.animator.animate(
            from,
            to,
            transition,
            Box::new(move |props| {
                if let Some(inner) = weak.upgrade() {
                    let mut state = inner.state.borrow_mut();
                    if state.generation == generation {
                        state.backdrop.set_props(props);
                    }
                }
            }),
            Box::new(|| {}),
        );
    }

    /// Sink for a container motion resolved against `resolved_rest`. Frames
    /// are shifted by however far the resting frame has moved since.
    fn container_sink(&self, generation: u64, resolved_rest: Rect) -> Rc<dyn Fn(LayerProps)> {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move |props: LayerProps| {
            if let Some(inner) = weak.upgrade() {
                let mut state = inner.state.borrow_mut();
                if state.generation == generation {
                    let dx = state.rest.x - resolved_rest.x;
                    let dy = state.rest.y - resolved_rest.y;
                    let frame = props.frame.offset(dx, dy);
                    state.container.set_props(props.frame(frame));
                }
            }
        })
    }
}
