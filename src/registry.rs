//! Live popups on this thread.
//!
//! Entries are weak: the registry finds popups, it never keeps them alive.
//! A popup is registered from `show` until its dismiss completes or it is
//! dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::popup::{Popup, PopupId, PopupInner};

thread_local! {
    static POPUPS: RefCell<Vec<(PopupId, Weak<PopupInner>)>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn register(id: PopupId, popup: Weak<PopupInner>) {
    POPUPS.with(|popups| {
        let mut popups = popups.borrow_mut();
        popups.retain(|(registered, entry)| *registered != id && entry.strong_count() > 0);
        popups.push((id, popup));
    });
}

pub(crate) fn unregister(id: PopupId) {
    // Popups dropped during thread teardown may outlive the registry
    let _ = POPUPS.try_with(|popups| {
        popups.borrow_mut().retain(|(registered, _)| *registered != id);
    });
}

/// Look up a registered popup.
pub fn get(id: PopupId) -> Option<Popup> {
    POPUPS.with(|popups| {
        popups
            .borrow()
            .iter()
            .find(|(registered, _)| *registered == id)
            .and_then(|(_, popup)| popup.upgrade())
            .map(Popup::from_inner)
    })
}

/// Every registered popup that is still alive, in registration order.
pub fn live() -> Vec<Popup> {
    POPUPS.with(|popups| {
        popups
            .borrow()
            .iter()
            .filter_map(|(_, popup)| popup.upgrade())
            .collect::<Vec<Rc<PopupInner>>>()
    })
    .into_iter()
    .map(Popup::from_inner)
    .collect()
}
