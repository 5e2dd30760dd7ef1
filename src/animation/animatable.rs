use crate::geometry::Rect;
use crate::layer::LayerProps;

/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    /// t can exceed [0, 1] range for overshoot effects
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for Rect {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Rect {
            x: f32::lerp(&from.x, &to.x, t),
            y: f32::lerp(&from.y, &to.y, t),
            width: f32::lerp(&from.width, &to.width, t),
            height: f32::lerp(&from.height, &to.height, t),
        }
    }
}

impl Animatable for LayerProps {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        LayerProps {
            frame: Rect::lerp(&from.frame, &to.frame, t),
            alpha: f32::lerp(&from.alpha, &to.alpha, t),
            scale: f32::lerp(&from.scale, &to.scale, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(f32::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 1.0), 10.0);
        // Overshoot
        assert_eq!(f32::lerp(&0.0, &10.0, 1.5), 15.0);
    }

    #[test]
    fn test_layer_props_lerp() {
        let from = LayerProps::new(Rect::new(0.0, -100.0, 50.0, 50.0)).alpha(0.0).scale(0.5);
        let to = LayerProps::new(Rect::new(0.0, 100.0, 50.0, 50.0));
        let mid = LayerProps::lerp(&from, &to, 0.5);
        assert_eq!(mid.frame, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(mid.alpha, 0.5);
        assert_eq!(mid.scale, 0.75);
    }
}
