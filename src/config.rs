//! Presentation settings of a popup.

use crate::animation::{DismissStyle, ShowStyle};

/// What the area around the container looks like and whether it swallows
/// touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskStyle {
    /// Touches outside the container reach whatever is below the popup
    None,
    /// Invisible backdrop that blocks touches
    Clear,
    /// Black backdrop at the popup's dimmed alpha that blocks touches
    #[default]
    Dimmed,
}

/// Configuration for a popup.
///
/// ```ignore
/// PopupConfig::new()
///     .show_style(ShowStyle::SlideInFrom(Edge::Bottom))
///     .dismiss_style(DismissStyle::BounceOutTo(Edge::Bottom))
///     .mask(MaskStyle::Dimmed)
///     .dimmed_alpha(0.3)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PopupConfig {
    pub show_style: ShowStyle,
    pub dismiss_style: DismissStyle,
    pub mask: MaskStyle,
    /// Opacity of the backdrop when `mask` is [`MaskStyle::Dimmed`], in `[0, 1]`.
    pub dimmed_alpha: f32,
    pub dismiss_on_backdrop_touch: bool,
    pub dismiss_on_content_touch: bool,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            show_style: ShowStyle::default(),
            dismiss_style: DismissStyle::default(),
            mask: MaskStyle::default(),
            dimmed_alpha: 0.5,
            dismiss_on_backdrop_touch: true,
            dismiss_on_content_touch: false,
        }
    }
}

impl PopupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_style(mut self, style: ShowStyle) -> Self {
        self.show_style = style;
        self
    }

    pub fn dismiss_style(mut self, style: DismissStyle) -> Self {
        self.dismiss_style = style;
        self
    }

    pub fn mask(mut self, mask: MaskStyle) -> Self {
        self.mask = mask;
        self
    }

    /// Set the dimmed backdrop opacity. Values outside `[0, 1]` are clamped.
    pub fn dimmed_alpha(mut self, alpha: f32) -> Self {
        self.dimmed_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn dismiss_on_backdrop_touch(mut self, dismiss: bool) -> Self {
        self.dismiss_on_backdrop_touch = dismiss;
        self
    }

    pub fn dismiss_on_content_touch(mut self, dismiss: bool) -> Self {
        self.dismiss_on_content_touch = dismiss;
        self
    }
}
