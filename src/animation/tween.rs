use std::time::Instant;

use crate::animation::{Animatable, SpringState, TimingFunction, Transition};

/// Result of advancing a tween
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// Still in the delay period, nothing to apply yet
    Waiting,
    /// Intermediate value
    Running(T),
    /// Final value; the tween will not produce anything else
    Finished(T),
}

/// A single interpolation from `start` to `target` over a [`Transition`],
/// advanced with explicit timestamps so any clock can drive it.
pub struct Tween<T: Animatable> {
    start: T,
    target: T,
    started_at: Instant,
    transition: Transition,
    spring_state: Option<SpringState>,
    finished: bool,
}

impl<T: Animatable> Tween<T> {
    pub fn new(start: T, target: T, transition: Transition, started_at: Instant) -> Self {
        let spring_state = match transition.timing {
            TimingFunction::Spring(config) => {
                Some(SpringState::with_velocity(config.initial_velocity))
            }
            _ => None,
        };
        Self {
            start,
            target,
            started_at,
            transition,
            spring_state,
            finished: false,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Advance to `now`.
    ///
    /// Non-spring tweens finish once the duration has elapsed. Springs finish
    /// when they settle, or when the transition duration (their cap) runs out.
    /// A finished tween always reports the exact target.
    pub fn advance(&mut self, now: Instant) -> Step<T> {
        if self.finished {
            return Step::Finished(self.target.clone());
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        let elapsed_ms = elapsed.as_micros() as f32 / 1000.0;
        let adjusted_ms = elapsed_ms - self.transition.delay_ms;

        if adjusted_ms < 0.0 {
            return Step::Waiting;
        }

        let duration_ms = self.transition.duration_ms;
        let out_of_time = adjusted_ms >= duration_ms;

        let (eased_t, done) = match (&mut self.spring_state, &self.transition.timing) {
            (Some(spring), TimingFunction::Spring(config)) => {
                let position = spring.step(adjusted_ms / 1000.0, config);
                (position, spring.is_settled(0.01) || out_of_time)
            }
            _ if out_of_time || duration_ms <= 0.0 => (1.0, true),
            _ => (self.transition.timing.evaluate(adjusted_ms / duration_ms), false),
        };

        if done {
            return self.finish();
        }

        Step::Running(T::lerp(&self.start, &self.target, eased_t))
    }

    fn finish(&mut self) -> Step<T> {
        self.finished = true;
        Step::Finished(self.target.clone())
    }
}
