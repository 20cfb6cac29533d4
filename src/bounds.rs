//! Bounding rectangle and the clamp/redirect policy applied to coordinates.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::coordinate::Coordinate;

/// Default service area the road network covers.
pub const DEFAULT_BOUNDS: BoundingRect = BoundingRect {
    min_lat: 50.8254,
    max_lat: 50.84156,
    min_lon: -0.79419,
    max_lon: -0.75059,
};

/// Default fallback position inside [`DEFAULT_BOUNDS`].
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(50.8376, -0.7749);

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingRect {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self::new(first.lat, first.lat, first.lng, first.lng);
        for point in iter {
            rect.min_lat = rect.min_lat.min(point.lat);
            rect.max_lat = rect.max_lat.max(point.lat);
            rect.min_lon = rect.min_lon.min(point.lng);
            rect.max_lon = rect.max_lon.max(point.lng);
        }
        Some(rect)
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lon
            && point.lng <= self.max_lon
    }

    /// Geometric midpoint of the rectangle.
    pub fn midpoint(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

impl Default for BoundingRect {
    fn default() -> Self {
        DEFAULT_BOUNDS
    }
}

/// Redirects coordinates outside the rectangle to a fixed fallback.
///
/// Total: never rejects, never errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsPolicy {
    rect: BoundingRect,
    fallback: Coordinate,
}

impl BoundsPolicy {
    /// A fallback outside `rect` is replaced by the rectangle's midpoint.
    pub fn new(rect: BoundingRect, fallback: Coordinate) -> Self {
        let fallback = if rect.contains(fallback) {
            fallback
        } else {
            warn!(
                lat = fallback.lat,
                lng = fallback.lng,
                "fallback outside bounding rectangle, using midpoint"
            );
            rect.midpoint()
        };
        Self { rect, fallback }
    }

    pub fn rect(&self) -> &BoundingRect {
        &self.rect
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        self.rect.contains(point)
    }

    pub fn clamp_or_redirect(&self, candidate: Coordinate) -> Coordinate {
        if self.rect.contains(candidate) {
            candidate
        } else {
            self.fallback
        }
    }
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDS, DEFAULT_FALLBACK)
    }
}
