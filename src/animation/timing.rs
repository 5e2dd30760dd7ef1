//! Easing curves used by the presets.
//!
//! Fades run linear, the two bounce-out phases use ease-out then ease-in,
//! and grow, shrink and slide use [`TimingFunction::SYSTEM`], the platform's
//! decelerating sheet curve. Springs are not curves at all: a [`Tween`]
//! steps them with real elapsed time.
//!
//! [`Tween`]: super::Tween

use super::spring::SpringConfig;

/// How progress through a transition maps to progress between its values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimingFunction {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Bezier(CubicBezier),
    /// Spring physics (can overshoot)
    Spring(SpringConfig),
}

impl TimingFunction {
    /// Decelerating curve of keyboard and sheet animations.
    pub const SYSTEM: TimingFunction = TimingFunction::Bezier(CubicBezier::new(0.38, 0.7, 0.125, 1.0));

    /// Eased progress for linear progress `t` in `[0, 1]`. Springs return `t`.
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            TimingFunction::Linear | TimingFunction::Spring(_) => t,
            TimingFunction::EaseIn => t * t,
            TimingFunction::EaseOut => t * (2.0 - t),
            TimingFunction::EaseInOut if t < 0.5 => 2.0 * t * t,
            TimingFunction::EaseInOut => -1.0 + (4.0 - 2.0 * t) * t,
            TimingFunction::Bezier(curve) => curve.solve(t),
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, TimingFunction::Spring(_))
    }
}

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` curve from (0, 0) to (1, 1).
///
/// `x1` and `x2` must lie in `[0, 1]` so the curve is a function of x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The curve's y at the point whose x is `x`.
    pub fn solve(&self, x: f32) -> f32 {
        // Newton-Raphson on the x polynomial
        let mut s = x;
        for _ in 0..8 {
            let slope = self.dx(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= (bezier(s, self.x1, self.x2) - x) / slope;
        }
        bezier(s.clamp(0.0, 1.0), self.y1, self.y2)
    }

    fn dx(&self, s: f32) -> f32 {
        let ms = 1.0 - s;
        3.0 * ms * ms * self.x1 + 6.0 * ms * s * (self.x2 - self.x1) + 3.0 * s * s * (1.0 - self.x2)
    }
}

/// One coordinate of a bezier from 0 to 1 with control values `c1` and `c2`.
fn bezier(s: f32, c1: f32, c2: f32) -> f32 {
    let ms = 1.0 - s;
    3.0 * ms * ms * s * c1 + 3.0 * ms * s * s * c2 + s * s * s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(TimingFunction::Linear.evaluate(0.0), 0.0);
        assert_eq!(TimingFunction::Linear.evaluate(0.5), 0.5);
        assert_eq!(TimingFunction::Linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_and_out() {
        assert!(TimingFunction::EaseIn.evaluate(0.5) < 0.5);
        assert!(TimingFunction::EaseOut.evaluate(0.5) > 0.5);
        assert_eq!(TimingFunction::EaseInOut.evaluate(0.5), 0.5);
    }

    #[test]
    fn test_system_curve() {
        let curve = TimingFunction::SYSTEM;
        assert!(curve.evaluate(0.0).abs() < 1e-3);
        assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-3);
        // Decelerating: well past halfway at the midpoint
        assert!(curve.evaluate(0.5) > 0.7);
    }

    #[test]
    fn test_symmetric_bezier_is_linear_at_midpoint() {
        let curve = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        assert!((curve.solve(0.5) - 0.5).abs() < 1e-4);
        assert!((curve.solve(0.2) - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_spring_is_not_eased() {
        let spring = TimingFunction::Spring(SpringConfig::DEFAULT);
        assert!(spring.is_spring());
        assert_eq!(spring.evaluate(0.3), 0.3);
    }
}
