use std::cell::Cell;
use std::rc::Rc;

use crate::geometry::Size;
use crate::popup::WeakPopup;

/// The view a popup presents.
///
/// The content is owned by the caller and sized by the caller before `show`.
/// Its size is read when the show is carried out on the next loop turn, so it
/// may still change right after `show` returns.
pub trait Content {
    fn size(&self) -> Size;

    /// Finish any pending layout before the size is read.
    fn layout_if_needed(&self) {}

    /// Called once, the first time the content is moved into the popup's
    /// container. Content that wants to dismiss its popup keeps the handle.
    fn attached(&self, popup: WeakPopup) {
        let _ = popup;
    }
}

impl Content for Size {
    fn size(&self) -> Size {
        *self
    }
}

impl Content for Cell<Size> {
    fn size(&self) -> Size {
        self.get()
    }
}

impl<T: Content + ?Sized> Content for Rc<T> {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn layout_if_needed(&self) {
        (**self).layout_if_needed()
    }

    fn attached(&self, popup: WeakPopup) {
        (**self).attached(popup)
    }
}
