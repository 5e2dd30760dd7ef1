use std::rc::Rc;

use crate::animation::{Animator, FrameAnimator};
use crate::host::Host;
use crate::scheduler::Scheduler;

/// The collaborators every popup needs. Cheap to clone; popups created from
/// the same context share them.
#[derive(Clone)]
pub struct PopupContext {
    pub scheduler: Rc<dyn Scheduler>,
    pub animator: Rc<dyn Animator>,
    pub host: Rc<dyn Host>,
}

impl PopupContext {
    pub fn new(scheduler: Rc<dyn Scheduler>, animator: Rc<dyn Animator>, host: Rc<dyn Host>) -> Self {
        Self {
            scheduler,
            animator,
            host,
        }
    }

    /// Context animating with a [`FrameAnimator`] on `scheduler`.
    pub fn with_frame_animator(scheduler: Rc<dyn Scheduler>, host: Rc<dyn Host>) -> Self {
        let animator = Rc::new(FrameAnimator::new(Rc::clone(&scheduler)));
        Self::new(scheduler, animator, host)
    }
}
