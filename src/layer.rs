//! Presentation state of the popup's two owned layers.
//!
//! The popup never draws anything itself. The host reads the backdrop and
//! container [`Layer`]s after each frame and renders them: the backdrop fills
//! the popup frame with `color` at `alpha`, the container hosts the content
//! at `frame`, scaled about its center by `scale`.

use crate::geometry::{Point, Rect};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// The animatable properties of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerProps {
    pub frame: Rect,
    pub alpha: f32,
    /// Uniform scale applied about the frame center
    pub scale: f32,
}

impl LayerProps {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            alpha: 1.0,
            scale: 1.0,
        }
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }
}

impl Default for LayerProps {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layer {
    props: LayerProps,
    color: Color,
}

impl Layer {
    pub fn props(&self) -> LayerProps {
        self.props
    }

    /// Replace the animatable properties. Alpha is clamped to `[0, 1]` so
    /// spring overshoot never produces an invalid opacity.
    pub fn set_props(&mut self, props: LayerProps) {
        self.props = LayerProps {
            alpha: props.alpha.clamp(0.0, 1.0),
            ..props
        };
    }

    pub fn frame(&self) -> Rect {
        self.props.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.props.frame = frame;
    }

    pub fn alpha(&self) -> f32 {
        self.props.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.props.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn scale(&self) -> f32 {
        self.props.scale
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Transform from layer-local coordinates to the parent's coordinates,
    /// including the scale about the frame center.
    pub fn transform(&self) -> Transform {
        let frame = self.props.frame;
        Transform::scale_about(self.props.scale, frame.center())
            .then(&Transform::translate(frame.x, frame.y))
    }

    /// Map a point in parent coordinates into layer-local coordinates, or
    /// `None` when the point falls outside the (scaled) layer.
    pub fn locate(&self, point: Point) -> Option<Point> {
        let local = self.transform().inverse().transform_point(point);
        Rect::from_size(self.props.frame.size())
            .contains(local.x, local.y)
            .then_some(local)
    }
}
