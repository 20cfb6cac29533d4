//! Draggable endpoint markers.
//!
//! One [`MarkerController`] per role. The marker is created the first time
//! its coordinate is known, moved in place afterwards, and only recreated
//! when the surface itself has been replaced.

use tracing::debug;

use crate::config::MarkerStyle;
use crate::coordinate::{Coordinate, Role};
use crate::surface::SurfaceRef;
use crate::traits::{CoordinateSink, EventKind, ListenerId, MapSurface, MarkerId, MarkerOptions};

struct MarkerBinding<S> {
    surface: SurfaceRef<S>,
    marker: MarkerId,
    drag_listener: ListenerId,
    position: Coordinate,
}

pub struct MarkerController<S: MapSurface> {
    role: Role,
    style: MarkerStyle,
    binding: Option<MarkerBinding<S>>,
}

impl<S: MapSurface> MarkerController<S> {
    pub fn new(role: Role, style: MarkerStyle) -> Self {
        Self {
            role,
            style,
            binding: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Marker id on the current surface, if one has been created.
    pub fn marker(&self) -> Option<MarkerId> {
        self.binding.as_ref().map(|binding| binding.marker)
    }

    /// Rendered position of the marker.
    pub fn position(&self) -> Option<Coordinate> {
        self.binding.as_ref().map(|binding| binding.position)
    }

    /// Reconciles the marker with `coordinate` on `surface`.
    ///
    /// Absent surface or coordinate is a no-op.
    pub fn attach(&mut self, surface: Option<&SurfaceRef<S>>, coordinate: Option<Coordinate>) {
        self.forget_dead_binding();
        let (Some(surface), Some(coordinate)) = (surface, coordinate) else {
            return;
        };

        if let Some(binding) = self.binding.as_mut() {
            if binding.surface.same_surface(surface) {
                if binding.position != coordinate {
                    let marker = binding.marker;
                    if surface
                        .with(|s| s.set_marker_position(marker, coordinate))
                        .is_some()
                    {
                        binding.position = coordinate;
                    }
                }
                return;
            }
        }

        self.detach();
        self.create(surface, coordinate);
    }

    fn create(&mut self, surface: &SurfaceRef<S>, coordinate: Coordinate) {
        let options = MarkerOptions {
            position: coordinate,
            title: &self.style.label,
            opacity: self.style.opacity,
            draggable: true,
            popup: format!("{} Point", self.style.label),
        };
        let created = surface.with(|s| {
            let marker = s.add_marker(&options);
            let drag_listener = s.listen(EventKind::DragEnd(marker));
            (marker, drag_listener)
        });

        if let Some((marker, drag_listener)) = created {
            debug!(role = ?self.role, marker = marker.0, epoch = surface.epoch(), "marker created");
            self.binding = Some(MarkerBinding {
                surface: surface.clone(),
                marker,
                drag_listener,
                position: coordinate,
            });
        }
    }

    /// Handles a drag end; returns false if `listener` is not this marker's.
    ///
    /// Moves the rendered marker to `at` and reports it through `sink`
    /// exactly once.
    pub fn handle_drag_end(
        &mut self,
        listener: ListenerId,
        at: Coordinate,
        sink: &mut dyn CoordinateSink,
    ) -> bool {
        self.forget_dead_binding();
        let Some(binding) = self.binding.as_mut() else {
            return false;
        };
        if binding.drag_listener != listener {
            return false;
        }

        // A busy surface keeps the old position so the next attach moves it.
        let marker = binding.marker;
        if binding.surface.with(|s| s.set_marker_position(marker, at)).is_some() {
            binding.position = at;
        }
        sink.user_moved(self.role, at);
        true
    }

    /// Removes the marker and its drag listener from the surface.
    pub fn detach(&mut self) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        binding.surface.with(|s| {
            s.unlisten(binding.drag_listener);
            s.remove_marker(binding.marker);
        });
        debug!(role = ?self.role, marker = binding.marker.0, "marker removed");
    }

    // Handles on a destroyed surface died with it.
    fn forget_dead_binding(&mut self) {
        if self.binding.as_ref().is_some_and(|b| !b.surface.is_live()) {
            self.binding = None;
        }
    }
}

impl<S: MapSurface> Drop for MarkerController<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
