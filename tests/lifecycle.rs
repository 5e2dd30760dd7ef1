use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use guido_popup::animation::{Animator, Completion, PropsSink, Transition};
use guido_popup::layer::LayerProps;
use guido_popup::layout::Autoresizing;
use guido_popup::prelude::*;
use guido_popup::registry;

const SETTLE: Duration = Duration::from_secs(2);

struct Fixture {
    scheduler: Rc<ManualScheduler>,
    stack: Rc<SurfaceStack>,
    surface: SurfaceId,
    ctx: PopupContext,
}

fn fixture() -> Fixture {
    let scheduler = Rc::new(ManualScheduler::new());
    let stack = Rc::new(SurfaceStack::new());
    let surface = stack.add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 375.0, 667.0));
    let ctx = PopupContext::with_frame_animator(scheduler.clone(), stack.clone());
    Fixture {
        scheduler,
        stack,
        surface,
        ctx,
    }
}

#[derive(Default)]
struct Counts {
    shown: Cell<u32>,
    will_dismiss: Cell<u32>,
    dismissed: Cell<u32>,
}

fn count(popup: &Popup) -> Rc<Counts> {
    let counts = Rc::new(Counts::default());
    let c = Rc::clone(&counts);
    popup.on_shown(move |_| c.shown.set(c.shown.get() + 1));
    let c = Rc::clone(&counts);
    popup.on_will_dismiss(move |_| c.will_dismiss.set(c.will_dismiss.get() + 1));
    let c = Rc::clone(&counts);
    popup.on_dismissed(move |_| c.dismissed.set(c.dismissed.get() + 1));
    counts
}

fn instant(ctx: &PopupContext, size: Size) -> Popup {
    Popup::with_config(
        ctx,
        size,
        PopupConfig::new()
            .show_style(ShowStyle::None)
            .dismiss_style(DismissStyle::None),
    )
}

#[test]
fn test_every_style_pair_completes_exactly_once() {
    let f = fixture();
    for show_style in ShowStyle::ALL {
        for dismiss_style in DismissStyle::ALL {
            for animated in [true, false] {
                let popup = Popup::with_config(
                    &f.ctx,
                    Size::new(120.0, 80.0),
                    PopupConfig::new()
                        .show_style(show_style)
                        .dismiss_style(dismiss_style),
                );
                let counts = count(&popup);
                let case = format!("{:?} / {:?} / animated {}", show_style, dismiss_style, animated);

                popup.show();
                assert_eq!(popup.phase(), Phase::Showing, "{}", case);
                assert_eq!(counts.shown.get(), 0, "{}", case);

                f.scheduler.advance(SETTLE);
                assert_eq!(popup.phase(), Phase::Shown, "{}", case);
                assert_eq!(counts.shown.get(), 1, "{}", case);
                assert_eq!(popup.container().alpha(), 1.0, "{}", case);
                assert_eq!(popup.container().scale(), 1.0, "{}", case);

                popup.dismiss(animated);
                assert_eq!(popup.phase(), Phase::Dismissing, "{}", case);
                assert_eq!(counts.will_dismiss.get(), 1, "{}", case);
                assert_eq!(counts.dismissed.get(), 0, "{}", case);

                f.scheduler.advance(SETTLE);
                assert_eq!(popup.phase(), Phase::Idle, "{}", case);
                assert_eq!(counts.shown.get(), 1, "{}", case);
                assert_eq!(counts.dismissed.get(), 1, "{}", case);
                assert_eq!(popup.surface(), None, "{}", case);
                assert_eq!(popup.backdrop().alpha(), 0.0, "{}", case);
            }
        }
    }
    assert_eq!(f.scheduler.pending_timers(), 0);
    assert!(f.stack.attached_popups(f.surface).unwrap().is_empty());
}

#[test]
fn test_completion_is_deferred() {
    let f = fixture();
    let popup = instant(&f.ctx, Size::new(10.0, 10.0));
    let counts = count(&popup);

    popup.show();
    assert_eq!(counts.shown.get(), 0);
    assert_eq!(f.scheduler.pending_tasks(), 1);
    f.scheduler.run_pending();
    assert_eq!(counts.shown.get(), 1);

    popup.dismiss(true);
    assert_eq!(counts.dismissed.get(), 0);
    f.scheduler.run_pending();
    assert_eq!(counts.dismissed.get(), 1);
}

#[test]
fn test_show_is_idempotent_while_active() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    let counts = count(&popup);

    popup.show();
    popup.show();
    f.scheduler.advance(SETTLE);
    popup.show_with_layout(PopupLayout::CENTER);
    f.scheduler.advance(SETTLE);

    assert_eq!(counts.shown.get(), 1);
    assert_eq!(popup.phase(), Phase::Shown);
}

#[test]
fn test_dismiss_is_ignored_unless_shown() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    let counts = count(&popup);

    popup.dismiss(true);
    assert_eq!(popup.phase(), Phase::Idle);

    popup.show();
    popup.dismiss(true);
    assert_eq!(popup.phase(), Phase::Showing);
    f.scheduler.advance(SETTLE);

    popup.dismiss(true);
    popup.dismiss(false);
    f.scheduler.advance(SETTLE);

    assert_eq!(counts.will_dismiss.get(), 1);
    assert_eq!(counts.dismissed.get(), 1);
}

#[test]
fn test_popup_can_be_shown_again() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    let counts = count(&popup);

    for _ in 0..3 {
        popup.show();
        f.scheduler.advance(SETTLE);
        popup.dismiss(true);
        f.scheduler.advance(SETTLE);
    }
    assert_eq!(counts.shown.get(), 3);
    assert_eq!(counts.dismissed.get(), 3);
}

#[test]
fn test_auto_dismiss_after_duration() {
    let f = fixture();
    let popup = Popup::with_config(
        &f.ctx,
        Size::new(10.0, 10.0),
        PopupConfig::new()
            .show_style(ShowStyle::FadeIn)
            .dismiss_style(DismissStyle::FadeOut),
    );
    let counts = count(&popup);

    popup.show_with_duration(Duration::from_secs(1));
    // Fade in ends on the frame at 160 ms, the timer then runs for a second
    f.scheduler.advance(Duration::from_millis(1100));
    assert_eq!(popup.phase(), Phase::Shown);
    assert!(popup.has_pending_auto_dismiss());

    f.scheduler.advance(Duration::from_millis(100));
    assert_eq!(popup.phase(), Phase::Dismissing);
    assert_eq!(counts.will_dismiss.get(), 1);

    f.scheduler.advance(SETTLE);
    assert_eq!(popup.phase(), Phase::Idle);
    assert_eq!(counts.dismissed.get(), 1);
    assert!(!popup.has_pending_auto_dismiss());
}

#[test]
fn test_manual_dismiss_cancels_auto_dismiss() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    let counts = count(&popup);

    popup.show_with_duration(Duration::from_secs(10));
    f.scheduler.advance(Duration::from_secs(1));
    assert!(popup.has_pending_auto_dismiss());

    popup.dismiss(true);
    assert!(!popup.has_pending_auto_dismiss());
    f.scheduler.advance(SETTLE);
    assert_eq!(f.scheduler.pending_timers(), 0);

    // Shown again without a duration: the old timer must not dismiss it
    popup.show();
    f.scheduler.advance(Duration::from_secs(20));
    assert_eq!(popup.phase(), Phase::Shown);
    assert_eq!(counts.dismissed.get(), 1);
}

#[test]
fn test_center_layout() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(100.0, 51.0));
    popup.show();
    f.scheduler.advance(SETTLE);

    assert_eq!(popup.frame(), Rect::new(0.0, 0.0, 375.0, 667.0));
    assert_eq!(popup.backdrop().frame(), Rect::new(0.0, 0.0, 375.0, 667.0));
    assert_eq!(popup.container().frame(), Rect::new(137.0, 308.0, 100.0, 51.0));
    assert_eq!(popup.container_autoresizing(), Autoresizing::all());
}

#[test]
fn test_anchor_layout() {
    let f = fixture();
    let popup = instant(&f.ctx, Size::new(100.0, 50.0));
    popup.show_with_layout(PopupLayout::new(
        HorizontalLayout::Right,
        VerticalLayout::Top,
    ));
    f.scheduler.run_pending();

    assert_eq!(popup.container().frame().origin(), Point::new(275.0, 0.0));
    assert_eq!(
        popup.container_autoresizing(),
        Autoresizing::FLEXIBLE_LEFT_MARGIN | Autoresizing::FLEXIBLE_BOTTOM_MARGIN
    );
}

#[test]
fn test_custom_layout_keeps_container_origin() {
    let f = fixture();
    let popup = instant(&f.ctx, Size::new(100.0, 50.0));
    popup.set_container_origin(Point::new(20.0, 40.0));
    popup.show_with_layout(PopupLayout::new(
        HorizontalLayout::Custom,
        VerticalLayout::Bottom,
    ));
    f.scheduler.run_pending();

    assert_eq!(popup.container().frame().origin(), Point::new(20.0, 617.0));
}

#[test]
fn test_explicit_center() {
    let f = fixture();
    let popup = instant(&f.ctx, Size::new(50.0, 31.0));
    popup.show_at_center(Point::new(100.0, 100.0), None);
    f.scheduler.run_pending();
    assert_eq!(popup.container().frame().origin(), Point::new(75.0, 84.5));

    popup.dismiss(false);
    f.scheduler.run_pending();

    // Center given in a view placed at (40, 60) on the surface
    popup.show_at_center(Point::new(10.0, 10.0), Some(Transform::translate(40.0, 60.0)));
    f.scheduler.run_pending();
    assert_eq!(popup.container().frame().center(), Point::new(50.0, 70.0));
}

#[test]
fn test_content_size_is_read_when_show_runs() {
    let f = fixture();
    let size = Rc::new(Cell::new(Size::new(10.0, 10.0)));
    let popup = Popup::with_config(
        &f.ctx,
        Rc::clone(&size),
        PopupConfig::new().show_style(ShowStyle::None),
    );
    popup.show();
    size.set(Size::new(200.0, 100.0));
    f.scheduler.run_pending();

    assert_eq!(popup.container().frame().size(), Size::new(200.0, 100.0));
}

#[test]
fn test_dimmed_backdrop() {
    let f = fixture();
    let popup = Popup::with_config(
        &f.ctx,
        Size::new(10.0, 10.0),
        PopupConfig::new().dimmed_alpha(0.3),
    );
    popup.show();
    f.scheduler.run_pending();
    assert_eq!(popup.backdrop().alpha(), 0.0);

    f.scheduler.advance(SETTLE);
    assert_eq!(popup.backdrop().alpha(), 1.0);
    assert_eq!(popup.backdrop().color(), Color::BLACK.with_alpha(0.3));
}

#[test]
fn test_clear_backdrop_blocks_touches() {
    let f = fixture();
    let popup = instant(&f.ctx, Size::new(100.0, 100.0));
    popup.set_mask(MaskStyle::Clear);
    popup.show();
    f.scheduler.run_pending();

    assert_eq!(popup.backdrop().color(), Color::TRANSPARENT);
    assert_eq!(popup.hit_test(Point::new(5.0, 5.0)), Hit::Backdrop);
    assert_eq!(popup.phase(), Phase::Dismissing);
}

#[test]
fn test_mask_none_passes_touches_through_and_dismisses() {
    let f = fixture();
    let popup = Popup::with_config(
        &f.ctx,
        Size::new(100.0, 100.0),
        PopupConfig::new()
            .show_style(ShowStyle::None)
            .mask(MaskStyle::None),
    );
    let counts = count(&popup);
    popup.show();
    f.scheduler.run_pending();

    assert_eq!(popup.hit_test(Point::new(5.0, 5.0)), Hit::PassThrough);
    assert_eq!(popup.phase(), Phase::Dismissing);
    f.scheduler.advance(SETTLE);
    assert_eq!(counts.dismissed.get(), 1);
}

#[test]
fn test_content_touch() {
    let f = fixture();
    let popup = instant(&f.ctx, Size::new(100.0, 100.0));
    popup.show();
    f.scheduler.run_pending();

    // Container rests at (137, 283)
    let hit = popup.hit_test(Point::new(147.0, 303.0));
    assert_eq!(
        hit,
        Hit::Content {
            local: Point::new(10.0, 20.0)
        }
    );
    assert_eq!(popup.phase(), Phase::Shown);

    popup.set_dismiss_on_content_touch(true);
    popup.hit_test(Point::new(147.0, 303.0));
    assert_eq!(popup.phase(), Phase::Dismissing);
}

#[test]
fn test_idle_popup_passes_touches_through() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(100.0, 100.0));
    assert_eq!(popup.hit_test(Point::new(5.0, 5.0)), Hit::PassThrough);
}

#[test]
fn test_dismiss_all_across_surfaces() {
    let f = fixture();
    let first = instant(&f.ctx, Size::new(10.0, 10.0));
    first.show();
    f.scheduler.run_pending();

    f.stack
        .add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 800.0, 600.0));
    let second = instant(&f.ctx, Size::new(10.0, 10.0));
    second.show();
    f.scheduler.run_pending();
    assert_ne!(first.surface(), second.surface());

    let idle = instant(&f.ctx, Size::new(10.0, 10.0));
    let showing = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    showing.show();
    let counts = count(&first);

    Popup::dismiss_all();
    assert_eq!(counts.will_dismiss.get(), 1);
    f.scheduler.run_pending();

    assert_eq!(first.phase(), Phase::Idle);
    assert_eq!(second.phase(), Phase::Idle);
    assert_eq!(idle.phase(), Phase::Idle);
    assert_eq!(showing.phase(), Phase::Showing);
    assert_eq!(registry::live().len(), 1);
}

#[test]
fn test_surface_resize_keeps_popup_centered() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(100.0, 50.0));
    popup.show();
    f.scheduler.advance(SETTLE);

    let landscape = Rect::new(0.0, 0.0, 667.0, 375.0);
    f.stack.resize(f.surface, landscape).unwrap();

    assert_eq!(popup.frame(), landscape);
    assert_eq!(popup.backdrop().frame(), landscape);
    let center = popup.container().frame().center();
    assert!((center.x - 333.5).abs() <= 1.0, "{:?}", center);
    assert!((center.y - 187.5).abs() <= 1.0, "{:?}", center);
}

#[test]
fn test_surface_resize_during_slide_in_lands_centered() {
    let scheduler = Rc::new(ManualScheduler::new());
    let stack = Rc::new(SurfaceStack::new());
    let surface = stack.add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 400.0, 800.0));
    let ctx = PopupContext::with_frame_animator(scheduler.clone(), stack.clone());

    let popup = Popup::with_config(
        &ctx,
        Size::new(100.0, 100.0),
        PopupConfig::new().show_style(ShowStyle::SlideInFrom(Edge::Bottom)),
    );
    popup.show();
    scheduler.advance(Duration::from_millis(100));
    assert_eq!(popup.phase(), Phase::Showing);

    stack.resize(surface, Rect::new(0.0, 0.0, 800.0, 400.0)).unwrap();
    scheduler.advance(SETTLE);

    assert_eq!(popup.phase(), Phase::Shown);
    let center = popup.container().frame().center();
    assert!((center.x - 400.0).abs() <= 1.0, "{:?}", center);
    assert!((center.y - 200.0).abs() <= 1.0, "{:?}", center);
}

#[test]
fn test_removing_surface_while_showing_returns_to_idle() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(100.0, 100.0));
    let counts = count(&popup);
    popup.show();
    f.scheduler.run_pending();
    assert_eq!(popup.surface(), Some(f.surface));

    f.stack.remove_surface(f.surface).unwrap();
    assert_eq!(popup.phase(), Phase::Idle);
    assert_eq!(popup.surface(), None);
    assert_eq!(popup.hit_test(Point::new(10.0, 10.0)), Hit::PassThrough);

    f.scheduler.advance(SETTLE);
    assert_eq!(popup.phase(), Phase::Idle);
    assert_eq!(popup.surface(), None);
    assert!(registry::get(popup.id()).is_none());
    assert_eq!(counts.shown.get(), 0);
    assert_eq!(counts.dismissed.get(), 0);

    // Shows again on whatever surface is left
    let other = f.stack.add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 200.0, 200.0));
    popup.show();
    f.scheduler.advance(SETTLE);
    assert_eq!(popup.phase(), Phase::Shown);
    assert_eq!(popup.surface(), Some(other));
}

#[test]
fn test_removing_surface_dismisses_shown_popup() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(100.0, 100.0));
    let counts = count(&popup);
    popup.show_with_duration(Duration::from_secs(5));
    f.scheduler.advance(SETTLE);
    assert!(popup.is_showing());

    f.stack.remove_surface(f.surface).unwrap();
    assert_eq!(popup.surface(), None);
    assert_eq!(popup.hit_test(Point::new(10.0, 10.0)), Hit::PassThrough);
    assert_eq!(f.scheduler.pending_timers(), 0);

    f.scheduler.advance(SETTLE);
    assert_eq!(popup.phase(), Phase::Idle);
    assert_eq!(counts.will_dismiss.get(), 1);
    assert_eq!(counts.dismissed.get(), 1);
    assert!(registry::get(popup.id()).is_none());
}

#[test]
fn test_drop_cancels_timer_and_detaches() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    let id = popup.id();
    popup.show_with_duration(Duration::from_secs(5));
    f.scheduler.advance(Duration::from_secs(1));
    assert_eq!(f.scheduler.pending_timers(), 1);
    assert_eq!(f.stack.attached_popups(f.surface).unwrap(), vec![id]);

    drop(popup);
    assert_eq!(f.scheduler.pending_timers(), 0);
    assert!(f.stack.attached_popups(f.surface).unwrap().is_empty());
    assert!(registry::get(id).is_none());
}

#[test]
fn test_drop_while_showing_is_harmless() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    popup.show();
    drop(popup);
    f.scheduler.advance(SETTLE);
    assert!(f.stack.attached_popups(f.surface).unwrap().is_empty());
}

#[derive(Default)]
struct Journal {
    events: RefCell<Vec<&'static str>>,
}

impl PopupDelegate for Journal {
    fn will_start_showing(&self, _popup: &Popup) {
        self.events.borrow_mut().push("will show");
    }

    fn did_finish_showing(&self, _popup: &Popup) {
        self.events.borrow_mut().push("shown");
    }

    fn will_start_dismissing(&self, _popup: &Popup) {
        self.events.borrow_mut().push("will dismiss");
    }

    fn did_finish_dismissing(&self, _popup: &Popup) {
        self.events.borrow_mut().push("dismissed");
    }
}

#[test]
fn test_delegate_hooks_in_order() {
    let f = fixture();
    let journal = Rc::new(Journal::default());
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    popup.set_delegate(journal.clone());

    popup.show();
    assert_eq!(*journal.events.borrow(), vec!["will show"]);
    f.scheduler.advance(SETTLE);
    popup.dismiss(true);
    f.scheduler.advance(SETTLE);

    assert_eq!(
        *journal.events.borrow(),
        vec!["will show", "shown", "will dismiss", "dismissed"]
    );
}

#[test]
fn test_callbacks_may_dismiss_the_popup() {
    let f = fixture();
    let popup = Popup::new(&f.ctx, Size::new(10.0, 10.0));
    let counts = count(&popup);
    popup.on_shown(|popup| popup.dismiss(false));

    popup.show_with_duration(Duration::from_secs(1));
    f.scheduler.advance(SETTLE);

    assert_eq!(popup.phase(), Phase::Idle);
    assert_eq!(counts.dismissed.get(), 1);
    assert!(!popup.has_pending_auto_dismiss());
}

#[derive(Default)]
struct SelfDismissingContent {
    popup: RefCell<Option<WeakPopup>>,
    attached: Cell<u32>,
}

impl SelfDismissingContent {
    fn close(&self) {
        if let Some(popup) = self.popup.borrow().as_ref() {
            popup.dismiss_presenting(true);
        }
    }
}

impl Content for SelfDismissingContent {
    fn size(&self) -> Size {
        Size::new(40.0, 40.0)
    }

    fn attached(&self, popup: WeakPopup) {
        self.attached.set(self.attached.get() + 1);
        *self.popup.borrow_mut() = Some(popup);
    }
}

#[test]
fn test_content_dismisses_presenting_popup() {
    let f = fixture();
    let content = Rc::new(SelfDismissingContent::default());
    let popup = Popup::new(&f.ctx, Rc::clone(&content));

    for _ in 0..2 {
        popup.show();
        f.scheduler.advance(SETTLE);
        content.close();
        assert_eq!(popup.phase(), Phase::Dismissing);
        f.scheduler.advance(SETTLE);
    }
    assert_eq!(content.attached.get(), 1);

    drop(popup);
    // The handle no longer resolves
    content.close();
}

/// Records timed animations so a test decides when they run.
#[derive(Default)]
struct HeldAnimator {
    held: RefCell<Vec<(PropsSink, Completion)>>,
}

impl Animator for HeldAnimator {
    fn animate(
        &self,
        _from: LayerProps,
        to: LayerProps,
        transition: Transition,
        mut sink: PropsSink,
        done: Completion,
    ) {
        if transition.is_instant() {
            sink(to);
            done();
        } else {
            self.held.borrow_mut().push((sink, done));
        }
    }
}

#[test]
fn test_stale_animation_values_are_ignored() {
    let f = fixture();
    let animator = Rc::new(HeldAnimator::default());
    let ctx = PopupContext::new(f.scheduler.clone(), animator.clone(), f.stack.clone());
    let popup = Popup::with_config(
        &ctx,
        Size::new(100.0, 100.0),
        PopupConfig::new().show_style(ShowStyle::FadeIn),
    );

    popup.show();
    f.scheduler.run_pending();
    // Backdrop fade and container fade
    let mut held: Vec<_> = animator.held.borrow_mut().drain(..).collect();
    assert_eq!(held.len(), 2);
    let (mut stale_sink, container_done) = held.remove(1);
    container_done();
    assert_eq!(popup.phase(), Phase::Shown);

    popup.dismiss(false);
    f.scheduler.run_pending();
    assert_eq!(popup.phase(), Phase::Idle);
    let dismissed = popup.container();

    stale_sink(LayerProps::new(Rect::new(1.0, 2.0, 3.0, 4.0)).alpha(0.5));
    assert_eq!(popup.container(), dismissed);
    assert_eq!(popup.container().alpha(), 0.0);
}
