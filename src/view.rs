//! The top-level map view.
//!
//! [`MapView`] owns the route state and the controllers. Every state change
//! goes through [`RouteState`] (the only [`CoordinateSink`]) and is followed
//! by a reconcile pass that brings the surface back in line.

use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::coordinate::{Coordinate, PathPoint, Role};
use crate::click::ClickToPlaceController;
use crate::error::RouteError;
use crate::location::resolve_start_location;
use crate::marker::MarkerController;
use crate::overlay::RouteOverlayController;
use crate::surface::{MapInstanceManager, SurfaceRef};
use crate::traits::{CoordinateSink, ListenerId, LocationProvider, MapBackend, RouteEngine};

/// Gesture events reported by the host's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click { listener: ListenerId, at: Coordinate },
    DragEnd { listener: ListenerId, at: Coordinate },
}

/// Declarative state: the two endpoints and the last computed path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
    pub path: Option<Vec<PathPoint>>,
}

impl CoordinateSink for RouteState {
    fn user_moved(&mut self, role: Role, to: Coordinate) {
        match role {
            Role::Start => self.start = Some(to),
            Role::End => self.end = Some(to),
        }
    }
}

/// A pending route computation for a specific endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub ticket: u64,
    pub start: Coordinate,
    pub end: Coordinate,
}

pub struct MapView<B: MapBackend> {
    // Controllers are declared before the manager so their handles are
    // released before the surface is destroyed on drop.
    start_marker: MarkerController<B::Surface>,
    end_marker: MarkerController<B::Surface>,
    click: ClickToPlaceController<B::Surface>,
    overlay: RouteOverlayController<B::Surface>,
    manager: MapInstanceManager<B>,
    state: RouteState,
    next_ticket: u64,
    latest_ticket: Option<u64>,
}

impl<B: MapBackend> MapView<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        Self {
            start_marker: MarkerController::new(Role::Start, config.start_marker.clone()),
            end_marker: MarkerController::new(Role::End, config.end_marker.clone()),
            click: ClickToPlaceController::new(),
            overlay: RouteOverlayController::new(config.route_style.clone()),
            manager: MapInstanceManager::new(backend, config),
            state: RouteState::default(),
            next_ticket: 0,
            latest_ticket: None,
        }
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.state.start
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.state.end
    }

    pub fn path(&self) -> Option<&[PathPoint]> {
        self.state.path.as_deref()
    }

    pub fn surface(&self) -> Option<SurfaceRef<B::Surface>> {
        self.manager.handle()
    }

    pub fn manager(&self) -> &MapInstanceManager<B> {
        &self.manager
    }

    pub fn start_marker(&self) -> &MarkerController<B::Surface> {
        &self.start_marker
    }

    pub fn end_marker(&self) -> &MarkerController<B::Surface> {
        &self.end_marker
    }

    pub fn click_controller(&self) -> &ClickToPlaceController<B::Surface> {
        &self.click
    }

    pub fn overlay(&self) -> &RouteOverlayController<B::Surface> {
        &self.overlay
    }

    pub fn set_start(&mut self, to: Coordinate) {
        self.state.user_moved(Role::Start, to);
        self.reconcile();
    }

    pub fn set_end(&mut self, to: Coordinate) {
        self.state.user_moved(Role::End, to);
        self.reconcile();
    }

    /// Seeds `start` from the geolocation provider (with fallback).
    ///
    /// A late-arriving position is handled the same as an initial one.
    pub fn apply_location<P: LocationProvider>(&mut self, provider: &P) {
        let start = resolve_start_location(provider, self.manager.policy());
        self.set_start(start);
    }

    /// Routes a surface event to the controller owning its listener.
    pub fn dispatch(&mut self, event: MapEvent) -> bool {
        let handled = match event {
            MapEvent::DragEnd { listener, at } => {
                self.start_marker.handle_drag_end(listener, at, &mut self.state)
                    || self.end_marker.handle_drag_end(listener, at, &mut self.state)
            }
            MapEvent::Click { listener, at } => {
                self.click.handle_click(listener, at, &mut self.state)
            }
        };
        if handled {
            self.reconcile();
        } else {
            debug!(?event, "event for unknown listener ignored");
        }
        handled
    }

    /// Brings the surface and every controller in line with the state.
    pub fn reconcile(&mut self) {
        let surface = self.manager.sync(self.state.start);
        let surface = surface.as_ref();
        self.start_marker.attach(surface, self.state.start);
        self.end_marker.attach(surface, self.state.end);
        self.click.attach(surface, self.state.end);
        self.overlay.render(surface, self.state.path.as_deref());
    }

    /// Issues a ticket for the current endpoint pair; `None` if either is unset.
    pub fn request_route(&mut self) -> Option<RouteRequest> {
        let (start, end) = (self.state.start?, self.state.end?);
        self.next_ticket += 1;
        self.latest_ticket = Some(self.next_ticket);
        Some(RouteRequest {
            ticket: self.next_ticket,
            start,
            end,
        })
    }

    /// Applies an engine result. Results for superseded tickets or for an
    /// endpoint pair that has since changed are discarded.
    pub fn apply_route_result(
        &mut self,
        request: &RouteRequest,
        result: Result<Vec<PathPoint>, RouteError>,
    ) -> bool {
        let current = self.latest_ticket == Some(request.ticket)
            && self.state.start == Some(request.start)
            && self.state.end == Some(request.end);
        if !current {
            debug!(ticket = request.ticket, "stale route result discarded");
            return false;
        }
        self.latest_ticket = None;

        self.state.path = match result {
            Ok(path) if path.is_empty() => {
                info!(ticket = request.ticket, "no route found");
                None
            }
            Ok(path) => Some(path),
            Err(err) => {
                warn!(ticket = request.ticket, error = %err, "route computation failed");
                None
            }
        };
        self.reconcile();
        true
    }

    /// Requests, computes and applies a route in one step.
    ///
    /// No-op when either endpoint is unset or the engine is not ready.
    pub fn compute_route<E: RouteEngine>(&mut self, engine: &E) {
        if !engine.is_ready() {
            debug!("route engine not ready");
            return;
        }
        let Some(request) = self.request_route() else {
            return;
        };
        let result = engine.shortest_path(request.start, request.end);
        self.apply_route_result(&request, result);
    }

    /// Releases every listener and handle, then destroys the surface.
    pub fn unmount(&mut self) {
        self.overlay.clear();
        self.click.detach();
        self.end_marker.detach();
        self.start_marker.detach();
        self.manager.teardown();
    }
}

impl<B: MapBackend> Drop for MapView<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
