use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use calloop::EventLoop;
use guido_popup::prelude::*;

#[test]
fn test_auto_dismiss_on_calloop() {
    let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new().unwrap();
    let scheduler = Rc::new(LoopScheduler::new(event_loop.handle()));
    let stack = Rc::new(SurfaceStack::new());
    let surface = stack.add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 640.0, 480.0));
    let ctx = PopupContext::with_frame_animator(scheduler.clone(), stack.clone());

    let popup = Popup::with_config(
        &ctx,
        Size::new(200.0, 100.0),
        PopupConfig::new()
            .show_style(ShowStyle::GrowIn)
            .dismiss_style(DismissStyle::SlideOutTo(Edge::Bottom)),
    );
    let shown = Rc::new(Cell::new(0));
    let dismissed = Rc::new(Cell::new(0));
    {
        let shown = Rc::clone(&shown);
        popup.on_shown(move |_| shown.set(shown.get() + 1));
        let dismissed = Rc::clone(&dismissed);
        popup.on_dismissed(move |_| dismissed.set(dismissed.get() + 1));
    }

    popup.show_with_duration(Duration::from_millis(100));
    assert_eq!(shown.get(), 0);

    let deadline = Instant::now() + Duration::from_secs(5);
    while dismissed.get() == 0 && Instant::now() < deadline {
        event_loop
            .dispatch(Some(Duration::from_millis(5)), &mut ())
            .unwrap();
    }

    assert_eq!(shown.get(), 1);
    assert_eq!(dismissed.get(), 1);
    assert_eq!(popup.phase(), Phase::Idle);
    assert_eq!(popup.container().frame().origin().y, 480.0);
    assert!(stack.attached_popups(surface).unwrap().is_empty());
    assert_eq!(scheduler.pending_timers(), 0);
}

#[test]
fn test_dropped_popup_leaves_no_timer_behind() {
    let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new().unwrap();
    let scheduler = Rc::new(LoopScheduler::new(event_loop.handle()));
    let stack = Rc::new(SurfaceStack::new());
    stack.add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 640.0, 480.0));
    let ctx = PopupContext::with_frame_animator(scheduler.clone(), stack.clone());

    let popup = Popup::with_config(
        &ctx,
        Size::new(10.0, 10.0),
        PopupConfig::new().show_style(ShowStyle::None),
    );
    popup.show_with_duration(Duration::from_secs(60));
    event_loop
        .dispatch(Some(Duration::from_millis(10)), &mut ())
        .unwrap();
    assert!(popup.is_showing());
    assert_eq!(scheduler.pending_timers(), 1);

    drop(popup);
    assert_eq!(scheduler.pending_timers(), 0);
}
