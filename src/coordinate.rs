//! Coordinate value types shared by every controller.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// One vertex of a computed route, tagged with the graph node it came from.
///
/// Produced only by a route engine; a route is replaced wholesale on every
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
}

impl PathPoint {
    pub const fn new(id: u64, lat: f64, lng: f64) -> Self {
        Self { id, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Which endpoint a marker or an upward update refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Start,
    End,
}

impl Role {
    /// Default marker label for the role.
    pub fn label(self) -> &'static str {
        match self {
            Role::Start => "Start",
            Role::End => "End",
        }
    }
}
