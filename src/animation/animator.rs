use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::{Step, Transition, Tween};
use crate::layer::LayerProps;
use crate::scheduler::Scheduler;

/// Called exactly once when an animation ends.
pub type Completion = Box<dyn FnOnce()>;

/// Receives every interpolated value of an animation.
pub type PropsSink = Box<dyn FnMut(LayerProps)>;

/// Interval between animation frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// The animation engine a popup drives.
///
/// Implementations interpolate from `from` to `to`, feed each value into
/// `sink`, finish by feeding exactly `to`, and then call `done` exactly once.
/// Instant transitions must apply `to` and call `done` before returning.
pub trait Animator {
    fn animate(
        &self,
        from: LayerProps,
        to: LayerProps,
        transition: Transition,
        sink: PropsSink,
        done: Completion,
    );
}

/// [`Animator`] that steps tweens on a fixed frame interval using a
/// [`Scheduler`]'s timers and clock.
pub struct FrameAnimator {
    scheduler: Rc<dyn Scheduler>,
    interval: Duration,
}

impl FrameAnimator {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            interval: FRAME_INTERVAL,
        }
    }

    /// Set the interval between frames.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }
}

impl Animator for FrameAnimator {
    fn animate(
        &self,
        from: LayerProps,
        to: LayerProps,
        transition: Transition,
        mut sink: PropsSink,
        done: Completion,
    ) {
        if transition.is_instant() {
            sink(to);
            done();
            return;
        }

        let running = Rc::new(RefCell::new(Running {
            tween: Tween::new(from, to, transition, self.scheduler.now()),
            sink,
            done: Some(done),
        }));
        tick(Rc::clone(&self.scheduler), self.interval, running);
    }
}

struct Running {
    tween: Tween<LayerProps>,
    sink: PropsSink,
    done: Option<Completion>,
}

impl Running {
    /// Apply the value for the current frame. Returns true once finished.
    fn step(&mut self, scheduler: &dyn Scheduler) -> bool {
        match self.tween.advance(scheduler.now()) {
            Step::Waiting => false,
            Step::Running(props) => {
                (self.sink)(props);
                false
            }
            Step::Finished(props) => {
                (self.sink)(props);
                true
            }
        }
    }

    fn jump_to_end(&mut self) -> Option<Completion> {
        let target = *self.tween.target();
        (self.sink)(target);
        self.done.take()
    }
}

fn tick(scheduler: Rc<dyn Scheduler>, interval: Duration, running: Rc<RefCell<Running>>) {
    let finished = running.borrow_mut().step(scheduler.as_ref());
    if finished {
        let done = running.borrow_mut().done.take();
        if let Some(done) = done {
            done();
        }
        return;
    }

    let next_scheduler = Rc::clone(&scheduler);
    let next_running = Rc::clone(&running);
    let scheduled = scheduler.schedule(
        interval,
        Box::new(move || tick(next_scheduler, interval, next_running)),
    );

    if let Err(err) = scheduled {
        log::warn!("Animation frame could not be scheduled, jumping to the end: {}", err);
        let done = running.borrow_mut().jump_to_end();
        if let Some(done) = done {
            done();
        }
    }
}
