//! Top-level surfaces popups attach to.
//!
//! A popup covers the whole of one top-level surface. The [`Host`] picks that
//! surface when the popup is shown, forgets the popup when it is dismissed,
//! and tells attached popups when the surface is resized.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PopupError;
use crate::geometry::Rect;
use crate::popup::PopupId;
use crate::registry;

/// Unique identifier for each surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Create a new unique surface ID.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        SurfaceId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value (for debugging/logging).
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Stacking level of a surface. Popups only attach to `Normal` surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceLevel {
    #[default]
    Normal,
    StatusBar,
    Alert,
}

/// Where a popup was attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub surface: SurfaceId,
    /// Bounds of the surface at the time of attaching
    pub bounds: Rect,
}

/// The windowing side of a popup.
pub trait Host {
    /// Attach `popup` to the front-most normal-level surface.
    fn attach(&self, popup: PopupId) -> Result<Attachment, PopupError>;

    /// Detach `popup` from its surface. Unknown popups are ignored.
    fn detach(&self, popup: PopupId);
}

struct StackedSurface {
    id: SurfaceId,
    level: SurfaceLevel,
    bounds: Rect,
    popups: Vec<PopupId>,
}

/// [`Host`] keeping an ordered stack of surfaces, back to front.
#[derive(Default)]
pub struct SurfaceStack {
    surfaces: RefCell<Vec<StackedSurface>>,
}

impl SurfaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface in front of all others.
    pub fn add_surface(&self, level: SurfaceLevel, bounds: Rect) -> SurfaceId {
        let id = SurfaceId::next();
        log::debug!("Adding {:?} surface {} with bounds {:?}", level, id.raw(), bounds);
        self.surfaces.borrow_mut().push(StackedSurface {
            id,
            level,
            bounds,
            popups: Vec::new(),
        });
        id
    }

    /// Move a surface in front of all others.
    pub fn bring_to_front(&self, id: SurfaceId) -> Result<(), PopupError> {
        let mut surfaces = self.surfaces.borrow_mut();
        let index = surfaces
            .iter()
            .position(|surface| surface.id == id)
            .ok_or(PopupError::UnknownSurface(id))?;
        let surface = surfaces.remove(index);
        surfaces.push(surface);
        Ok(())
    }

    /// Remove a surface. Popups attached to it lose their attachment: shown
    /// ones are dismissed without animation and ones still showing return
    /// to idle.
    pub fn remove_surface(&self, id: SurfaceId) -> Result<(), PopupError> {
        let attached = self.attached_popups(id)?;
        self.surfaces.borrow_mut().retain(|surface| surface.id != id);

        for popup in attached.iter().filter_map(|popup| registry::get(*popup)) {
            log::info!("Surface {} removed while popup {} is attached", id.raw(), popup.id().raw());
            popup.surface_removed();
        }
        Ok(())
    }

    /// Change the bounds of a surface and relayout the popups attached to it.
    pub fn resize(&self, id: SurfaceId, bounds: Rect) -> Result<(), PopupError> {
        let attached = {
            let mut surfaces = self.surfaces.borrow_mut();
            let surface = surfaces
                .iter_mut()
                .find(|surface| surface.id == id)
                .ok_or(PopupError::UnknownSurface(id))?;
            surface.bounds = bounds;
            surface.popups.clone()
        };

        // Popups are notified with the stack released so they can query it
        for popup in attached.iter().filter_map(|popup| registry::get(*popup)) {
            popup.surface_resized(bounds);
        }
        Ok(())
    }

    pub fn bounds(&self, id: SurfaceId) -> Option<Rect> {
        self.surfaces
            .borrow()
            .iter()
            .find(|surface| surface.id == id)
            .map(|surface| surface.bounds)
    }

    /// Popups currently attached to a surface, in attach order.
    pub fn attached_popups(&self, id: SurfaceId) -> Result<Vec<PopupId>, PopupError> {
        self.surfaces
            .borrow()
            .iter()
            .find(|surface| surface.id == id)
            .map(|surface| surface.popups.clone())
            .ok_or(PopupError::UnknownSurface(id))
    }

    pub fn len(&self) -> usize {
        self.surfaces.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.borrow().is_empty()
    }
}

impl Host for SurfaceStack {
    fn attach(&self, popup: PopupId) -> Result<Attachment, PopupError> {
        let mut surfaces = self.surfaces.borrow_mut();
        let surface = surfaces
            .iter_mut()
            .rev()
            .find(|surface| surface.level == SurfaceLevel::Normal)
            .ok_or(PopupError::NoSurface)?;

        if !surface.popups.contains(&popup) {
            surface.popups.push(popup);
        }
        log::debug!("Attached popup {} to surface {}", popup.raw(), surface.id.raw());

        Ok(Attachment {
            surface: surface.id,
            bounds: surface.bounds,
        })
    }

    fn detach(&self, popup: PopupId) {
        for surface in self.surfaces.borrow_mut().iter_mut() {
            surface.popups.retain(|attached| *attached != popup);
        }
    }
}
