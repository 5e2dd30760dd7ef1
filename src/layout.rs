//! Where the container comes to rest, and how it follows bounds changes.
//!
//! A popup is placed either by a relative [`PopupLayout`] anchor or at an
//! explicit center point. Resolution produces the container's resting frame
//! together with its [`Autoresizing`] flags, which decide how the frame moves
//! when the surface is later resized (orientation changes, output rescales).

use bitflags::bitflags;

use crate::geometry::{Point, Rect, Size};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalLayout {
    /// Leave the container where the caller put it
    Custom,
    Left,
    LeftOfCenter,
    #[default]
    Center,
    RightOfCenter,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalLayout {
    /// Leave the container where the caller put it
    Custom,
    Top,
    AboveCenter,
    #[default]
    Center,
    BelowCenter,
    Bottom,
}

/// Relative resting position of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PopupLayout {
    pub horizontal: HorizontalLayout,
    pub vertical: VerticalLayout,
}

impl PopupLayout {
    pub const CENTER: PopupLayout = PopupLayout::new(HorizontalLayout::Center, VerticalLayout::Center);

    pub const fn new(horizontal: HorizontalLayout, vertical: VerticalLayout) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// How a show call positions the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Layout(PopupLayout),
    /// Center the container on `point`, given in the coordinate space that
    /// `space` maps into surface coordinates (surface coordinates if `None`).
    Center {
        point: Point,
        space: Option<Transform>,
    },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Layout(PopupLayout::CENTER)
    }
}

impl From<PopupLayout> for Placement {
    fn from(layout: PopupLayout) -> Self {
        Placement::Layout(layout)
    }
}

bitflags! {
    /// Margins of the container that absorb size changes of the popup bounds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Autoresizing: u8 {
        const FLEXIBLE_LEFT_MARGIN   = 0b0001;
        const FLEXIBLE_RIGHT_MARGIN  = 0b0010;
        const FLEXIBLE_TOP_MARGIN    = 0b0100;
        const FLEXIBLE_BOTTOM_MARGIN = 0b1000;
    }
}

impl Autoresizing {
    /// Move `frame` for a change of its parent bounds from `old` to `new` size.
    ///
    /// Along each axis the size delta is shared by the flexible margins in
    /// proportion to their current length (evenly when both are zero). A
    /// fixed leading margin keeps the origin; a lone flexible leading margin
    /// takes the whole delta.
    pub fn apply(self, frame: Rect, old: Size, new: Size) -> Rect {
        let x = resize_axis(
            frame.x,
            frame.width,
            old.width,
            new.width,
            self.contains(Autoresizing::FLEXIBLE_LEFT_MARGIN),
            self.contains(Autoresizing::FLEXIBLE_RIGHT_MARGIN),
        );
        let y = resize_axis(
            frame.y,
            frame.height,
            old.height,
            new.height,
            self.contains(Autoresizing::FLEXIBLE_TOP_MARGIN),
            self.contains(Autoresizing::FLEXIBLE_BOTTOM_MARGIN),
        );
        frame.with_origin(x, y)
    }
}

fn resize_axis(
    origin: f32,
    length: f32,
    old_extent: f32,
    new_extent: f32,
    flexible_leading: bool,
    flexible_trailing: bool,
) -> f32 {
    let delta = new_extent - old_extent;
    match (flexible_leading, flexible_trailing) {
        (true, true) => {
            let leading = origin;
            let trailing = old_extent - origin - length;
            let total = leading + trailing;
            if total.abs() < f32::EPSILON {
                origin + delta / 2.0
            } else {
                origin + delta * leading / total
            }
        }
        (true, false) => origin + delta,
        _ => origin,
    }
}

/// Resting frame and autoresizing flags for a container of `size` inside
/// `bounds`. `current` is the container's frame before placement; it is kept
/// on axes laid out as `Custom`.
pub fn resolve(placement: &Placement, size: Size, current: Rect, bounds: Rect) -> (Rect, Autoresizing) {
    let frame = current.with_size(size);

    match placement {
        Placement::Center { point, space } => {
            let center = space
                .map(|space| space.transform_point(*point))
                .unwrap_or(*point);
            let origin = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
            (frame.with_origin(origin.x, origin.y), Autoresizing::all())
        }
        Placement::Layout(layout) => {
            let (x, horizontal) = resolve_horizontal(layout.horizontal, frame.x, size.width, bounds.width);
            let (y, vertical) = resolve_vertical(layout.vertical, frame.y, size.height, bounds.height);
            (frame.with_origin(x, y), horizontal | vertical)
        }
    }
}

fn resolve_horizontal(layout: HorizontalLayout, x: f32, w: f32, width: f32) -> (f32, Autoresizing) {
    let both = Autoresizing::FLEXIBLE_LEFT_MARGIN | Autoresizing::FLEXIBLE_RIGHT_MARGIN;
    match layout {
        HorizontalLayout::Custom => (x, Autoresizing::empty()),
        HorizontalLayout::Left => (0.0, Autoresizing::FLEXIBLE_RIGHT_MARGIN),
        HorizontalLayout::LeftOfCenter => ((width / 3.0 - w / 2.0).floor(), both),
        HorizontalLayout::Center => (((width - w) / 2.0).floor(), both),
        HorizontalLayout::RightOfCenter => ((width * 2.0 / 3.0 - w / 2.0).floor(), both),
        HorizontalLayout::Right => (width - w, Autoresizing::FLEXIBLE_LEFT_MARGIN),
    }
}

fn resolve_vertical(layout: VerticalLayout, y: f32, h: f32, height: f32) -> (f32, Autoresizing) {
    let both = Autoresizing::FLEXIBLE_TOP_MARGIN | Autoresizing::FLEXIBLE_BOTTOM_MARGIN;
    match layout {
        VerticalLayout::Custom => (y, Autoresizing::empty()),
        VerticalLayout::Top => (0.0, Autoresizing::FLEXIBLE_BOTTOM_MARGIN),
        VerticalLayout::AboveCenter => ((height / 3.0 - h / 2.0).floor(), both),
        VerticalLayout::Center => (((height - h) / 2.0).floor(), both),
        VerticalLayout::BelowCenter => ((height * 2.0 / 3.0 - h / 2.0).floor(), both),
        VerticalLayout::Bottom => (height - h, Autoresizing::FLEXIBLE_TOP_MARGIN),
    }
}
