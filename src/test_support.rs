//! In-crate surface double for controller unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::bounds::{BoundingRect, DEFAULT_FALLBACK};
use crate::config::{MapConfig, PolylineStyle, TileLayerConfig};
use crate::coordinate::{Coordinate, Role};
use crate::surface::{MapInstanceManager, SurfaceRef};
use crate::traits::{
    CoordinateSink, EventKind, LayerId, ListenerId, MapBackend, MapSurface, MarkerId,
    MarkerOptions, OverlayId, SurfaceOptions,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetView(Coordinate),
    AddTileLayer,
    AddMarker(MarkerId, String),
    MoveMarker(MarkerId, Coordinate),
    RemoveMarker(MarkerId),
    AddPolyline(OverlayId, usize),
    RemovePolyline(OverlayId),
    FitBounds(BoundingRect),
    Listen(ListenerId, EventKind),
    Unlisten(ListenerId),
    Destroy,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

#[derive(Default)]
pub struct LogBackend {
    pub created: Rc<RefCell<Vec<SurfaceOptions>>>,
    pub calls: CallLog,
    next_id: Rc<Cell<u64>>,
}

pub struct LogSurface {
    calls: CallLog,
    next_id: Rc<Cell<u64>>,
}

impl LogSurface {
    fn next_id(&self) -> u64 {
        self.next_id.set(self.next_id.get() + 1);
        self.next_id.get()
    }

    fn log(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl MapBackend for LogBackend {
    type Surface = LogSurface;

    fn create_surface(&mut self, options: &SurfaceOptions) -> LogSurface {
        self.created.borrow_mut().push(options.clone());
        LogSurface {
            calls: self.calls.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl MapSurface for LogSurface {
    fn set_view(&mut self, center: Coordinate, _zoom: u8) {
        self.log(Call::SetView(center));
    }

    fn add_tile_layer(&mut self, _layer: &TileLayerConfig) -> LayerId {
        self.log(Call::AddTileLayer);
        LayerId(self.next_id())
    }

    fn add_marker(&mut self, options: &MarkerOptions<'_>) -> MarkerId {
        let id = MarkerId(self.next_id());
        self.log(Call::AddMarker(id, options.popup.clone()));
        id
    }

    fn set_marker_position(&mut self, marker: MarkerId, position: Coordinate) {
        self.log(Call::MoveMarker(marker, position));
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.log(Call::RemoveMarker(marker));
    }

    fn add_polyline(&mut self, points: &[Coordinate], _style: &PolylineStyle) -> OverlayId {
        let id = OverlayId(self.next_id());
        self.log(Call::AddPolyline(id, points.len()));
        id
    }

    fn remove_polyline(&mut self, overlay: OverlayId) {
        self.log(Call::RemovePolyline(overlay));
    }

    fn fit_bounds(&mut self, extent: BoundingRect) {
        self.log(Call::FitBounds(extent));
    }

    fn listen(&mut self, event: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.log(Call::Listen(id, event));
        id
    }

    fn unlisten(&mut self, listener: ListenerId) {
        self.log(Call::Unlisten(listener));
    }

    fn destroy(&mut self) {
        self.log(Call::Destroy);
    }
}

/// A manager with a live surface at the default fallback; the log starts
/// empty after creation.
pub fn live_surface() -> (MapInstanceManager<LogBackend>, SurfaceRef<LogSurface>, CallLog) {
    let backend = LogBackend::default();
    let calls = backend.calls.clone();
    let mut manager = MapInstanceManager::new(backend, MapConfig::default());
    let surface = manager.sync(Some(DEFAULT_FALLBACK)).expect("seeded manager creates a surface");
    calls.borrow_mut().clear();
    (manager, surface, calls)
}

/// Every reported move, in order.
#[derive(Debug, Default)]
pub struct Moves(pub Vec<(Role, Coordinate)>);

impl CoordinateSink for Moves {
    fn user_moved(&mut self, role: Role, to: Coordinate) {
        self.0.push((role, to));
    }
}
