//! Deferred work and cancellable timers on the UI event loop.
//!
//! A popup never blocks: `show` and `dismiss` push the bulk of their work to
//! the next loop turn, and the auto-dismiss is a one-shot timer whose
//! [`TimerToken`] the popup owns and cancels when it is dismissed by hand or
//! torn down.
//!
//! Two schedulers ship with the crate:
//!
//! - [`LoopScheduler`] runs on a calloop event loop: deferred tasks become idle
//!   callbacks and timers become `calloop::timer::Timer` sources.
//! - [`ManualScheduler`] keeps a virtual clock that the owner drives, which
//!   suits hosts with their own frame loop and deterministic tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

use crate::error::PopupError;

/// A unit of work run on the UI thread.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        TimerToken(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw token value (for debugging/logging).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// The UI event loop as seen by a popup.
pub trait Scheduler {
    /// Current time on this scheduler's clock.
    fn now(&self) -> Instant;

    /// Run `task` on a later turn of the loop, never synchronously.
    fn defer(&self, task: Task);

    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> Result<TimerToken, PopupError>;

    /// Cancel a timer. Tokens of timers that already fired are ignored.
    fn cancel(&self, token: TimerToken);
}

/// [`Scheduler`] backed by a calloop event loop.
pub struct LoopScheduler<D: 'static> {
    handle: LoopHandle<'static, D>,
    timers: Rc<RefCell<HashMap<TimerToken, RegistrationToken>>>,
}

impl<D: 'static> LoopScheduler<D> {
    pub fn new(handle: LoopHandle<'static, D>) -> Self {
        Self {
            handle,
            timers: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Number of timers registered and not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl<D: 'static> Scheduler for LoopScheduler<D> {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn defer(&self, task: Task) {
        // Dropping the Idle handle leaves the callback scheduled
        let _idle = self.handle.insert_idle(move |_| task());
    }

    fn schedule(&self, delay: Duration, task: Task) -> Result<TimerToken, PopupError> {
        let token = TimerToken::next();
        let timers = Rc::clone(&self.timers);
        let mut task = Some(task);

        let registration = self
            .handle
            .insert_source(Timer::from_duration(delay), move |_, _, _| {
                // Forget the registration first so a cancel issued by the task
                // itself does not try to remove the source being dispatched.
                timers.borrow_mut().remove(&token);
                if let Some(task) = task.take() {
                    task();
                }
                TimeoutAction::Drop
            })
            .map_err(|err| PopupError::Scheduler(err.error))?;

        self.timers.borrow_mut().insert(token, registration);
        Ok(token)
    }

    fn cancel(&self, token: TimerToken) {
        let registration = self.timers.borrow_mut().remove(&token);
        if let Some(registration) = registration {
            log::trace!("Cancelling timer {}", token.raw());
            self.handle.remove(registration);
        }
    }
}

struct ManualState {
    now: Instant,
    deferred: VecDeque<Task>,
    timers: BTreeMap<(Instant, TimerToken), Task>,
}

/// [`Scheduler`] with a virtual clock.
///
/// Nothing runs until the owner calls [`run_pending`](Self::run_pending) or
/// [`advance`](Self::advance), typically once per frame.
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            state: RefCell::new(ManualState {
                now,
                deferred: VecDeque::new(),
                timers: BTreeMap::new(),
            }),
        }
    }

    /// Drain deferred tasks, including tasks deferred while draining.
    /// Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        loop {
            // Pop in its own statement so the task runs with no borrow held
            let task = self.state.borrow_mut().deferred.pop_front();
            match task {
                Some(task) => {
                    task();
                    count += 1;
                }
                None => return count,
            }
        }
    }

    /// Move the clock forward by `by`, firing due timers in deadline order.
    /// Deferred tasks are drained before and after every timer.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            self.run_pending();

            let due = {
                let mut state = self.state.borrow_mut();
                let next_key = state
                    .timers
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                next_key.and_then(|key| {
                    state.now = key.0;
                    state.timers.remove(&key)
                })
            };

            match due {
                Some(task) => task(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
        self.run_pending();
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.state.borrow().deferred.len()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.state.borrow().now
    }

    fn defer(&self, task: Task) {
        self.state.borrow_mut().deferred.push_back(task);
    }

    fn schedule(&self, delay: Duration, task: Task) -> Result<TimerToken, PopupError> {
        let token = TimerToken::next();
        let deadline = self.now() + delay;
        self.state
            .borrow_mut()
            .timers
            .insert((deadline, token), task);
        Ok(token)
    }

    fn cancel(&self, token: TimerToken) {
        self.state
            .borrow_mut()
            .timers
            .retain(|(_, scheduled), _| *scheduled != token);
    }
}
