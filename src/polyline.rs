//! Polyline representation for route overlays.
//!
//! A route arrives as ordered [`PathPoint`]s; the overlay only needs the
//! coordinates in traversal order plus their bounding extent for fitting the
//! viewport.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingRect;
use crate::coordinate::{Coordinate, PathPoint};
use crate::haversine::haversine_km;

/// A polyline as decoded coordinates in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Builds the polyline through a route's points in sequence order.
    pub fn from_path(path: &[PathPoint]) -> Self {
        Self {
            points: path.iter().map(PathPoint::coordinate).collect(),
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding extent of all points; `None` when empty.
    pub fn bounds(&self) -> Option<BoundingRect> {
        BoundingRect::enclosing(self.points.iter().copied())
    }

    /// Sum of segment lengths in kilometers.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum()
    }
}
