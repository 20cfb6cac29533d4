//! Test fixtures for pathmap.
//!
//! Provides:
//! - Real Chichester locations inside and outside the service area
//! - A recording map backend that counts every attach/detach
//! - A scripted route engine

#![allow(dead_code)]

pub mod chichester_locations;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pathmap::bounds::BoundingRect;
use pathmap::config::{MapConfig, PolylineStyle, TileLayerConfig};
use pathmap::coordinate::{Coordinate, PathPoint};
use pathmap::error::RouteError;
use pathmap::traits::{
    EventKind, LayerId, ListenerId, MapBackend, MapSurface, MarkerId, MarkerOptions, OverlayId,
    RouteEngine, SurfaceOptions,
};
use pathmap::view::MapView;

pub use chichester_locations::*;

// ============================================================================
// Recording backend
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub surface: u64,
    pub position: Coordinate,
    pub title: String,
    pub opacity: f64,
    pub draggable: bool,
    pub popup: String,
}

/// Everything every surface of one backend has done.
#[derive(Debug, Default)]
pub struct Journal {
    pub created: Vec<SurfaceOptions>,
    pub destroyed: usize,
    pub tile_layers: usize,
    pub views: Vec<Coordinate>,

    pub markers: HashMap<MarkerId, MarkerRecord>,
    pub markers_added: usize,
    pub markers_removed: usize,
    pub marker_moves: Vec<(MarkerId, Coordinate)>,

    pub overlays: HashMap<OverlayId, (u64, Vec<Coordinate>)>,
    pub overlays_added: usize,
    pub overlays_removed: usize,
    pub fitted: Vec<BoundingRect>,

    pub listeners: HashMap<ListenerId, (u64, EventKind)>,
    pub listeners_added: usize,
    pub listeners_removed: usize,

    /// Markers, overlays and listeners still attached when their surface was destroyed.
    pub leaked_at_destroy: usize,
    /// Calls made against an already destroyed surface.
    pub use_after_destroy: usize,

    next_id: u64,
}

impl Journal {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn click_listeners(&self) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, (_, kind))| *kind == EventKind::Click)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn click_listener(&self) -> ListenerId {
        let listeners = self.click_listeners();
        assert_eq!(listeners.len(), 1, "expected exactly one click listener");
        listeners[0]
    }

    pub fn drag_listener(&self, marker: MarkerId) -> ListenerId {
        self.listeners
            .iter()
            .find(|(_, (_, kind))| *kind == EventKind::DragEnd(marker))
            .map(|(id, _)| *id)
            .expect("drag listener registered for marker")
    }

    pub fn marker_titled(&self, title: &str) -> Vec<(MarkerId, MarkerRecord)> {
        self.markers
            .iter()
            .filter(|(_, record)| record.title == title)
            .map(|(id, record)| (*id, record.clone()))
            .collect()
    }

    /// Points of the single live overlay.
    pub fn overlay_points(&self) -> Vec<Coordinate> {
        assert_eq!(self.overlays.len(), 1, "expected exactly one overlay");
        self.overlays.values().next().map(|(_, points)| points.clone()).unwrap_or_default()
    }

    pub fn live_handles(&self) -> usize {
        self.markers.len() + self.overlays.len() + self.listeners.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub journal: Rc<RefCell<Journal>>,
}

impl RecordingBackend {
    pub fn new() -> (Self, Rc<RefCell<Journal>>) {
        let backend = Self::default();
        let journal = backend.journal.clone();
        (backend, journal)
    }
}

pub struct RecordingSurface {
    id: u64,
    destroyed: bool,
    journal: Rc<RefCell<Journal>>,
}

impl RecordingSurface {
    fn journal(&self) -> std::cell::RefMut<'_, Journal> {
        let mut journal = self.journal.borrow_mut();
        if self.destroyed {
            journal.use_after_destroy += 1;
        }
        journal
    }
}

impl MapBackend for RecordingBackend {
    type Surface = RecordingSurface;

    fn create_surface(&mut self, options: &SurfaceOptions) -> RecordingSurface {
        let mut journal = self.journal.borrow_mut();
        journal.created.push(options.clone());
        let id = journal.next_id();
        RecordingSurface {
            id,
            destroyed: false,
            journal: self.journal.clone(),
        }
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: Coordinate, _zoom: u8) {
        self.journal().views.push(center);
    }

    fn add_tile_layer(&mut self, _layer: &TileLayerConfig) -> LayerId {
        let mut journal = self.journal();
        journal.tile_layers += 1;
        LayerId(journal.next_id())
    }

    fn add_marker(&mut self, options: &MarkerOptions<'_>) -> MarkerId {
        let surface = self.id;
        let mut journal = self.journal();
        let id = MarkerId(journal.next_id());
        journal.markers_added += 1;
        journal.markers.insert(
            id,
            MarkerRecord {
                surface,
                position: options.position,
                title: options.title.to_string(),
                opacity: options.opacity,
                draggable: options.draggable,
                popup: options.popup.clone(),
            },
        );
        id
    }

    fn set_marker_position(&mut self, marker: MarkerId, position: Coordinate) {
        let mut journal = self.journal();
        journal.marker_moves.push((marker, position));
        if let Some(record) = journal.markers.get_mut(&marker) {
            record.position = position;
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        let mut journal = self.journal();
        if journal.markers.remove(&marker).is_some() {
            journal.markers_removed += 1;
        }
    }

    fn add_polyline(&mut self, points: &[Coordinate], _style: &PolylineStyle) -> OverlayId {
        let surface = self.id;
        let mut journal = self.journal();
        let id = OverlayId(journal.next_id());
        journal.overlays_added += 1;
        journal.overlays.insert(id, (surface, points.to_vec()));
        id
    }

    fn remove_polyline(&mut self, overlay: OverlayId) {
        let mut journal = self.journal();
        if journal.overlays.remove(&overlay).is_some() {
            journal.overlays_removed += 1;
        }
    }

    fn fit_bounds(&mut self, extent: BoundingRect) {
        self.journal().fitted.push(extent);
    }

    fn listen(&mut self, event: EventKind) -> ListenerId {
        let surface = self.id;
        let mut journal = self.journal();
        let id = ListenerId(journal.next_id());
        journal.listeners_added += 1;
        journal.listeners.insert(id, (surface, event));
        id
    }

    fn unlisten(&mut self, listener: ListenerId) {
        let mut journal = self.journal();
        if journal.listeners.remove(&listener).is_some() {
            journal.listeners_removed += 1;
        }
    }

    fn destroy(&mut self) {
        let surface = self.id;
        let mut journal = self.journal();
        journal.destroyed += 1;

        let leaked = journal.markers.values().filter(|m| m.surface == surface).count()
            + journal.overlays.values().filter(|(s, _)| *s == surface).count()
            + journal.listeners.values().filter(|(s, _)| *s == surface).count();
        journal.leaked_at_destroy += leaked;
        journal.markers.retain(|_, m| m.surface != surface);
        journal.overlays.retain(|_, (s, _)| *s != surface);
        journal.listeners.retain(|_, (s, _)| *s != surface);
        drop(journal);
        self.destroyed = true;
    }
}

/// A view over a fresh recording backend with the default config.
pub fn recording_view() -> (MapView<RecordingBackend>, Rc<RefCell<Journal>>) {
    let (backend, journal) = RecordingBackend::new();
    (MapView::new(backend, MapConfig::default()), journal)
}

// ============================================================================
// Scripted route engine
// ============================================================================

pub enum Scripted {
    Path(Vec<PathPoint>),
    NoRoute,
    NotReady,
    Fail,
}

pub struct FakeEngine {
    pub script: Scripted,
    pub calls: Cell<usize>,
}

impl FakeEngine {
    pub fn new(script: Scripted) -> Self {
        Self {
            script,
            calls: Cell::new(0),
        }
    }
}

impl RouteEngine for FakeEngine {
    fn is_ready(&self) -> bool {
        !matches!(self.script, Scripted::NotReady)
    }

    fn shortest_path(
        &self,
        _from: Coordinate,
        _to: Coordinate,
    ) -> Result<Vec<PathPoint>, RouteError> {
        self.calls.set(self.calls.get() + 1);
        match &self.script {
            Scripted::Path(path) => Ok(path.clone()),
            Scripted::NoRoute => Ok(Vec::new()),
            Scripted::NotReady => Err(RouteError::NotReady),
            Scripted::Fail => Err(RouteError::UnexpectedResponse(
                "TooBig: too many points".to_string(),
            )),
        }
    }
}

/// A short route from the station to the cathedral.
pub fn station_to_cathedral() -> Vec<PathPoint> {
    vec![
        PathPoint::new(101, RAILWAY_STATION.lat, RAILWAY_STATION.lng),
        PathPoint::new(102, 50.8340, -0.7815),
        PathPoint::new(103, CATHEDRAL.lat, CATHEDRAL.lng),
    ]
}

/// A route from the canal basin to Priory Park.
pub fn basin_to_priory_park() -> Vec<PathPoint> {
    vec![
        PathPoint::new(201, CANAL_BASIN.lat, CANAL_BASIN.lng),
        PathPoint::new(202, MARKET_CROSS.lat, MARKET_CROSS.lng),
        PathPoint::new(203, PRIORY_PARK.lat, PRIORY_PARK.lng),
    ]
}
