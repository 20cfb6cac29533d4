//! Ownership of the single map surface.
//!
//! [`MapInstanceManager`] is the only owner of the surface. Everything else
//! holds a [`SurfaceRef`]: a weak reference tagged with the epoch of the
//! surface it points at. A handle created on one epoch is never valid on
//! another.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::bounds::BoundsPolicy;
use crate::config::MapConfig;
use crate::coordinate::Coordinate;
use crate::traits::{LayerId, MapBackend, MapSurface, SurfaceOptions};

/// Non-owning reference to a live surface.
pub struct SurfaceRef<S> {
    surface: Weak<RefCell<S>>,
    epoch: u64,
}

impl<S> Clone for SurfaceRef<S> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface.clone(),
            epoch: self.epoch,
        }
    }
}

impl<S> fmt::Debug for SurfaceRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceRef")
            .field("epoch", &self.epoch)
            .field("live", &self.is_live())
            .finish()
    }
}

impl<S> SurfaceRef<S> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// False once the owning manager has torn the surface down.
    pub fn is_live(&self) -> bool {
        self.surface.strong_count() > 0
    }

    /// True if both refer to the same surface instance.
    pub fn same_surface(&self, other: &SurfaceRef<S>) -> bool {
        self.epoch == other.epoch && Weak::ptr_eq(&self.surface, &other.surface)
    }

    /// Runs `f` against the surface; `None` when it is gone or busy.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        let surface = self.surface.upgrade()?;
        let mut guard = surface.try_borrow_mut().ok()?;
        Some(f(&mut guard))
    }
}

struct LiveSurface<S> {
    surface: Rc<RefCell<S>>,
    epoch: u64,
    tile_layer: LayerId,
    center: Coordinate,
}

/// Creates the surface lazily on the first non-null seed and destroys it on
/// teardown. Later seed changes never recreate it.
pub struct MapInstanceManager<B: MapBackend> {
    backend: B,
    config: MapConfig,
    policy: BoundsPolicy,
    live: Option<LiveSurface<B::Surface>>,
    epoch: u64,
}

impl<B: MapBackend> MapInstanceManager<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        let policy = config.bounds_policy();
        Self {
            backend,
            config,
            policy,
            live: None,
            epoch: 0,
        }
    }

    pub fn policy(&self) -> &BoundsPolicy {
        &self.policy
    }

    /// Reconciles the surface with `seed` and returns the live handle.
    pub fn sync(&mut self, seed: Option<Coordinate>) -> Option<SurfaceRef<B::Surface>> {
        if self.live.is_none() {
            if let Some(seed) = seed {
                self.create(seed);
            }
        }
        self.handle()
    }

    pub fn handle(&self) -> Option<SurfaceRef<B::Surface>> {
        self.live.as_ref().map(|live| SurfaceRef {
            surface: Rc::downgrade(&live.surface),
            epoch: live.epoch,
        })
    }

    /// Center the surface was created on, or last re-centered to.
    pub fn center(&self) -> Option<Coordinate> {
        self.live.as_ref().map(|live| live.center)
    }

    /// Moves the viewport to `target` (redirected into bounds). No-op before creation.
    pub fn recenter(&mut self, target: Coordinate) {
        let center = self.checked_center(target);
        let zoom = self.config.initial_zoom;
        if let Some(live) = self.live.as_mut() {
            if let Ok(mut surface) = live.surface.try_borrow_mut() {
                surface.set_view(center, zoom);
                live.center = center;
            }
        }
    }

    fn checked_center(&self, seed: Coordinate) -> Coordinate {
        let center = self.policy.clamp_or_redirect(seed);
        if self.policy.contains(center) {
            center
        } else {
            let midpoint = self.policy.rect().midpoint();
            warn!(
                lat = center.lat,
                lng = center.lng,
                "computed center out of bounds, using midpoint"
            );
            midpoint
        }
    }

    fn create(&mut self, seed: Coordinate) {
        let center = self.checked_center(seed);
        let options = SurfaceOptions {
            center,
            zoom: self.config.initial_zoom,
            min_zoom: self.config.min_zoom,
            max_bounds: self.config.bounds,
            max_bounds_viscosity: self.config.max_bounds_viscosity,
        };

        let mut surface = self.backend.create_surface(&options);
        surface.set_view(center, self.config.initial_zoom);
        let tile_layer = surface.add_tile_layer(&self.config.tile_layer);

        self.epoch += 1;
        info!(epoch = self.epoch, lat = center.lat, lng = center.lng, "map surface created");
        self.live = Some(LiveSurface {
            surface: Rc::new(RefCell::new(surface)),
            epoch: self.epoch,
            tile_layer,
            center,
        });
    }

    /// Destroys the surface. Dependent controllers must have released their
    /// handles first; any [`SurfaceRef`] still held goes dead here.
    pub fn teardown(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        match live.surface.try_borrow_mut() {
            Ok(mut surface) => surface.destroy(),
            Err(_) => warn!(epoch = live.epoch, "surface busy during teardown"),
        }
        debug!(epoch = live.epoch, tile_layer = live.tile_layer.0, "map surface destroyed");
    }
}

impl<B: MapBackend> Drop for MapInstanceManager<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
