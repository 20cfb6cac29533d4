//! Click-to-place: a map click sets `end` while it is unset.

use tracing::debug;

use crate::coordinate::{Coordinate, Role};
use crate::surface::SurfaceRef;
use crate::traits::{CoordinateSink, EventKind, ListenerId, MapSurface};

struct ClickBinding<S> {
    surface: SurfaceRef<S>,
    listener: ListenerId,
    /// Whether `end` was set when the listener was registered.
    end_was_set: bool,
}

/// Owns exactly one click listener on the surface.
///
/// The listener is re-registered whenever `end` flips between set and unset,
/// so the gate always reflects the state it was registered against.
pub struct ClickToPlaceController<S: MapSurface> {
    binding: Option<ClickBinding<S>>,
}

impl<S: MapSurface> Default for ClickToPlaceController<S> {
    fn default() -> Self {
        Self { binding: None }
    }
}

impl<S: MapSurface> ClickToPlaceController<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.binding.as_ref().map(|binding| binding.listener)
    }

    pub fn attach(&mut self, surface: Option<&SurfaceRef<S>>, end: Option<Coordinate>) {
        if self.binding.as_ref().is_some_and(|b| !b.surface.is_live()) {
            self.binding = None;
        }
        let Some(surface) = surface else {
            return;
        };

        let end_set = end.is_some();
        if let Some(binding) = &self.binding {
            if binding.surface.same_surface(surface) && binding.end_was_set == end_set {
                return;
            }
        }

        self.detach();
        if let Some(listener) = surface.with(|s| s.listen(EventKind::Click)) {
            debug!(listener = listener.0, end_set, "click listener registered");
            self.binding = Some(ClickBinding {
                surface: surface.clone(),
                listener,
                end_was_set: end_set,
            });
        }
    }

    /// Handles a click; returns false if `listener` is not ours.
    pub fn handle_click(
        &mut self,
        listener: ListenerId,
        at: Coordinate,
        sink: &mut dyn CoordinateSink,
    ) -> bool {
        let Some(binding) = &self.binding else {
            return false;
        };
        if binding.listener != listener || !binding.surface.is_live() {
            return false;
        }
        if !binding.end_was_set {
            sink.user_moved(Role::End, at);
        }
        true
    }

    pub fn detach(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.surface.with(|s| s.unlisten(binding.listener));
        }
    }
}

impl<S: MapSurface> Drop for ClickToPlaceController<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
