use std::cell::RefCell;
use std::rc::Rc;

use crate::popup::Popup;

/// A callback invoked with the popup that triggered it.
pub type Callback = Box<dyn FnMut(&Popup)>;

/// Lifecycle hooks, for types that present popups with shared behavior.
///
/// Every hook defaults to doing nothing.
pub trait PopupDelegate {
    fn will_start_showing(&self, _popup: &Popup) {}
    fn did_finish_showing(&self, _popup: &Popup) {}
    fn will_start_dismissing(&self, _popup: &Popup) {}
    fn did_finish_dismissing(&self, _popup: &Popup) {}
}

#[derive(Default)]
pub(crate) struct Hooks {
    pub delegate: Option<Rc<dyn PopupDelegate>>,
    pub on_shown: Option<Callback>,
    pub on_will_dismiss: Option<Callback>,
    pub on_dismissed: Option<Callback>,
}

#[derive(Clone, Copy)]
pub(crate) enum Event {
    Shown,
    WillDismiss,
    Dismissed,
}

impl Hooks {
    fn slot(&mut self, event: Event) -> &mut Option<Callback> {
        match event {
            Event::Shown => &mut self.on_shown,
            Event::WillDismiss => &mut self.on_will_dismiss,
            Event::Dismissed => &mut self.on_dismissed,
        }
    }
}

/// Call the delegate with no borrow of `hooks` held.
pub(crate) fn notify_delegate(
    hooks: &RefCell<Hooks>,
    popup: &Popup,
    hook: impl FnOnce(&dyn PopupDelegate, &Popup),
) {
    let delegate = hooks.borrow().delegate.clone();
    if let Some(delegate) = delegate {
        hook(delegate.as_ref(), popup);
    }
}

/// Call the callback for `event`. It is taken out while it runs so it may
/// call back into the popup, and put back unless it was replaced meanwhile.
pub(crate) fn fire(hooks: &RefCell<Hooks>, popup: &Popup, event: Event) {
    let callback = hooks.borrow_mut().slot(event).take();
    if let Some(mut callback) = callback {
        callback(popup);
        let mut hooks = hooks.borrow_mut();
        let slot = hooks.slot(event);
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}
