//! Shows a few popups on a calloop event loop and logs their lifecycle.
//!
//! Run with `RUST_LOG=debug cargo run --example popup_demo`.

use std::rc::Rc;
use std::time::Duration;

use calloop::EventLoop;
use guido_popup::prelude::*;

struct Logger;

impl PopupDelegate for Logger {
    fn did_finish_showing(&self, popup: &Popup) {
        log::info!(
            "popup {} shown, container at {:?}",
            popup.id().raw(),
            popup.container().frame()
        );
    }

    fn did_finish_dismissing(&self, popup: &Popup) {
        log::info!("popup {} dismissed", popup.id().raw());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new()?;
    let scheduler = Rc::new(LoopScheduler::new(event_loop.handle()));
    let stack = Rc::new(SurfaceStack::new());
    let surface = stack.add_surface(SurfaceLevel::Normal, Rect::new(0.0, 0.0, 375.0, 667.0));
    let ctx = PopupContext::with_frame_animator(scheduler, stack.clone());
    let logger: Rc<dyn PopupDelegate> = Rc::new(Logger);

    let toast = Popup::with_config(
        &ctx,
        Size::new(240.0, 48.0),
        PopupConfig::new()
            .show_style(ShowStyle::SlideInFrom(Edge::Bottom))
            .dismiss_style(DismissStyle::SlideOutTo(Edge::Bottom))
            .mask(MaskStyle::None),
    );
    toast.set_delegate(Rc::clone(&logger));
    toast.show_with_layout_and_duration(
        PopupLayout::new(HorizontalLayout::Center, VerticalLayout::Bottom),
        Duration::from_millis(800),
    );

    let alert = Popup::with_config(
        &ctx,
        Size::new(280.0, 160.0),
        PopupConfig::new()
            .show_style(ShowStyle::BounceIn)
            .dismiss_style(DismissStyle::BounceOut)
            .dimmed_alpha(0.6),
    );
    alert.set_delegate(logger);
    alert.on_shown(|popup| {
        // Tap the backdrop, which dismisses the alert
        let hit = popup.hit_test(Point::new(10.0, 10.0));
        log::info!("tap on backdrop: {:?}", hit);
    });
    alert.on_dismissed(|_| log::info!("alert closed, rotating the surface"));
    alert.show();

    let mut rotated = false;
    loop {
        event_loop.dispatch(Some(Duration::from_millis(16)), &mut ())?;

        if !rotated && alert.phase() == Phase::Idle && toast.is_showing() {
            stack.resize(surface, Rect::new(0.0, 0.0, 667.0, 375.0))?;
            log::info!("toast now at {:?}", toast.container().frame());
            rotated = true;
        }

        if toast.phase() == Phase::Idle && alert.phase() == Phase::Idle {
            break;
        }
    }

    Popup::dismiss_all();
    Ok(())
}
