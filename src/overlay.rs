//! Route overlay: at most one polyline for the current path.

use tracing::{debug, info};

use crate::config::PolylineStyle;
use crate::coordinate::PathPoint;
use crate::polyline::Polyline;
use crate::surface::SurfaceRef;
use crate::traits::{MapSurface, OverlayId};

struct OverlayBinding<S> {
    surface: SurfaceRef<S>,
    overlay: OverlayId,
    path: Vec<PathPoint>,
}

pub struct RouteOverlayController<S: MapSurface> {
    style: PolylineStyle,
    binding: Option<OverlayBinding<S>>,
}

impl<S: MapSurface> RouteOverlayController<S> {
    pub fn new(style: PolylineStyle) -> Self {
        Self {
            style,
            binding: None,
        }
    }

    pub fn overlay(&self) -> Option<OverlayId> {
        self.binding.as_ref().map(|binding| binding.overlay)
    }

    /// Renders `path`, replacing any previous overlay.
    ///
    /// A missing surface or an empty path clears the overlay. Re-rendering
    /// the path already shown on the same surface does nothing.
    pub fn render(&mut self, surface: Option<&SurfaceRef<S>>, path: Option<&[PathPoint]>) {
        if self.binding.as_ref().is_some_and(|b| !b.surface.is_live()) {
            self.binding = None;
        }
        let path = path.filter(|points| !points.is_empty());
        let (Some(surface), Some(path)) = (surface, path) else {
            self.clear();
            return;
        };

        if let Some(binding) = &self.binding {
            if binding.surface.same_surface(surface) && binding.path.as_slice() == path {
                return;
            }
        }

        self.clear();

        let polyline = Polyline::from_path(path);
        let extent = polyline.bounds();
        let style = &self.style;
        let overlay = surface.with(|s| {
            let overlay = s.add_polyline(polyline.points(), style);
            if let Some(extent) = extent {
                s.fit_bounds(extent);
            }
            overlay
        });

        if let Some(overlay) = overlay {
            info!(
                overlay = overlay.0,
                points = path.len(),
                length_km = polyline.length_km(),
                "route overlay rendered"
            );
            self.binding = Some(OverlayBinding {
                surface: surface.clone(),
                overlay,
                path: path.to_vec(),
            });
        }
    }

    /// Removes the current overlay, if any.
    pub fn clear(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.surface.with(|s| s.remove_polyline(binding.overlay));
            debug!(overlay = binding.overlay.0, "route overlay removed");
        }
    }
}

impl<S: MapSurface> Drop for RouteOverlayController<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
