/// Configuration for spring physics animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Mass of the spring
    pub mass: f32,
    /// Stiffness of the spring
    pub stiffness: f32,
    /// Damping coefficient
    pub damping: f32,
    /// Velocity at the start of the animation, in progress units per second
    pub initial_velocity: f32,
}

impl SpringConfig {
    /// Default spring with pleasant overshoot
    pub const DEFAULT: Self = Self {
        mass: 1.0,
        stiffness: 180.0,
        damping: 11.0,
        initial_velocity: 0.0,
    };

    /// Build a unit-mass spring from a damping ratio and the time it should
    /// take to settle.
    ///
    /// A ratio below 1.0 overshoots; 1.0 is critically damped.
    pub fn from_damping_ratio(ratio: f32, settle_secs: f32) -> Self {
        let ratio = ratio.max(0.01);
        // Settling time of a damped oscillator is roughly 4 / (ratio * omega)
        let omega = 4.0 / (ratio * settle_secs.max(0.01));
        Self {
            mass: 1.0,
            stiffness: omega * omega,
            damping: 2.0 * ratio * omega,
            initial_velocity: 0.0,
        }
    }

    /// Set the initial velocity.
    pub fn initial_velocity(mut self, velocity: f32) -> Self {
        self.initial_velocity = velocity;
        self
    }
}

/// State for spring physics simulation
#[derive(Clone, Debug)]
pub struct SpringState {
    /// Current position (0.0 = start, 1.0 = target)
    pub position: f32,
    /// Current velocity
    pub velocity: f32,
    /// Last evaluation time
    pub last_t: f32,
}

impl SpringState {
    /// Create a new spring state at rest at position 0.0
    pub fn new() -> Self {
        Self::with_velocity(0.0)
    }

    /// Create a new spring state at position 0.0 moving with `velocity`
    pub fn with_velocity(velocity: f32) -> Self {
        Self {
            position: 0.0,
            velocity,
            last_t: 0.0,
        }
    }

    /// Step the simulation forward to `elapsed_secs` (total time since the
    /// animation started) and return the current position, which can
    /// overshoot 1.0.
    pub fn step(&mut self, elapsed_secs: f32, config: &SpringConfig) -> f32 {
        let dt = (elapsed_secs - self.last_t).max(0.0);
        self.last_t = elapsed_secs;

        if dt < 1e-6 {
            return self.position;
        }

        let target = 1.0;

        // Cap individual timestep for numerical stability (~30fps minimum)
        let capped_dt = dt.min(0.033);

        let spring_force = -config.stiffness * (self.position - target);
        let damping_force = -config.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / config.mass;

        // Semi-implicit Euler
        self.velocity += acceleration * capped_dt;
        self.position += self.velocity * capped_dt;

        self.position
    }

    /// Check if the spring has settled (position near target, velocity near zero)
    pub fn is_settled(&self, threshold: f32) -> bool {
        (self.position - 1.0).abs() < threshold && self.velocity.abs() < threshold
    }
}

impl Default for SpringState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: &SpringConfig, secs: f32) -> (f32, f32) {
        let mut state = SpringState::with_velocity(config.initial_velocity);
        let mut position = 0.0;
        let mut max_position: f32 = 0.0;
        let frames = (secs * 60.0) as usize;
        for i in 0..=frames {
            position = state.step(i as f32 / 60.0, config);
            max_position = max_position.max(position);
        }
        (position, max_position)
    }

    #[test]
    fn test_spring_reaches_target() {
        let (position, _) = run(&SpringConfig::DEFAULT, 2.0);
        assert!(
            (position - 1.0).abs() < 0.1,
            "Spring should settle near target, got {}",
            position
        );
    }

    #[test]
    fn test_damping_ratio_spring_settles_in_time() {
        let config = SpringConfig::from_damping_ratio(0.8, 0.6);
        let mut state = SpringState::new();
        let mut settled_at = None;
        for i in 0..=120 {
            let t = i as f32 / 60.0;
            state.step(t, &config);
            if state.is_settled(0.01) {
                settled_at = Some(t);
                break;
            }
        }
        let settled_at = settled_at.expect("spring never settled");
        assert!(settled_at < 1.0, "settled at {}", settled_at);
    }

    #[test]
    fn test_initial_velocity_overshoots() {
        let config = SpringConfig::from_damping_ratio(0.8, 0.6).initial_velocity(15.0);
        let (_, max_position) = run(&config, 2.0);
        assert!(
            max_position > 1.05,
            "Kicked spring should overshoot, max was {}",
            max_position
        );
    }
}
