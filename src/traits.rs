//! Core seams between the map core and its collaborators.
//!
//! The rendering library, the route engine and the geolocation source are all
//! injected through these traits. Hosts implement them for their concrete
//! widget (a Leaflet bridge, a native map view, a test double).

use crate::bounds::BoundingRect;
use crate::config::{PolylineStyle, TileLayerConfig};
use crate::coordinate::{Coordinate, PathPoint, Role};
use crate::error::{LocationError, RouteError};

/// Identifier of a marker on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Identifier of a polyline overlay on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Identifier of a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifier of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    DragEnd(MarkerId),
}

/// Creation parameters for a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub center: Coordinate,
    pub zoom: u8,
    pub min_zoom: u8,
    /// Panning is restricted to this rectangle.
    pub max_bounds: BoundingRect,
    pub max_bounds_viscosity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions<'a> {
    pub position: Coordinate,
    pub title: &'a str,
    pub opacity: f64,
    pub draggable: bool,
    /// Popup text bound to the marker.
    pub popup: String,
}

/// The rendering library: the only thing allowed to create surfaces.
pub trait MapBackend {
    type Surface: MapSurface;

    fn create_surface(&mut self, options: &SurfaceOptions) -> Self::Surface;
}

/// A live, mutable map rendering surface.
///
/// Ids handed out by one surface are meaningless on any other surface.
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    fn add_tile_layer(&mut self, layer: &TileLayerConfig) -> LayerId;

    fn add_marker(&mut self, options: &MarkerOptions<'_>) -> MarkerId;

    fn set_marker_position(&mut self, marker: MarkerId, position: Coordinate);

    fn remove_marker(&mut self, marker: MarkerId);

    fn add_polyline(&mut self, points: &[Coordinate], style: &PolylineStyle) -> OverlayId;

    fn remove_polyline(&mut self, overlay: OverlayId);

    /// Adjusts the viewport so the extent is fully visible.
    fn fit_bounds(&mut self, extent: BoundingRect);

    fn listen(&mut self, event: EventKind) -> ListenerId;

    fn unlisten(&mut self, listener: ListenerId);

    /// Destroys the surface along with its tile layers.
    fn destroy(&mut self);
}

/// The single channel through which controllers change endpoint state.
pub trait CoordinateSink {
    fn user_moved(&mut self, role: Role, to: Coordinate);
}

/// Computes a route between two coordinates.
pub trait RouteEngine {
    /// False until the engine has been initialised.
    fn is_ready(&self) -> bool;

    /// Ordered route points; an empty vector means "no path".
    fn shortest_path(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Vec<PathPoint>, RouteError>;
}

/// Best-effort source for the user's current position.
pub trait LocationProvider {
    fn current_location(&self) -> Result<Coordinate, LocationError>;
}
