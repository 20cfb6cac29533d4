//! Real Chichester locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. All of `IN_BOUNDS` lie inside the
//! default service rectangle; `OUT_OF_BOUNDS` do not.

use pathmap::coordinate::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const CATHEDRAL: Location = Location::new("Chichester Cathedral", 50.8365, -0.7810);
pub const MARKET_CROSS: Location = Location::new("Chichester Cross", 50.8367, -0.7790);
pub const RAILWAY_STATION: Location = Location::new("Chichester Station", 50.8318, -0.7818);
pub const PRIORY_PARK: Location = Location::new("Priory Park", 50.8395, -0.7770);
pub const CANAL_BASIN: Location = Location::new("Canal Basin", 50.8310, -0.7800);
pub const EASTGATE: Location = Location::new("Eastgate Square", 50.8362, -0.7740);

pub const IN_BOUNDS: &[Location] = &[
    CATHEDRAL,
    MARKET_CROSS,
    RAILWAY_STATION,
    PRIORY_PARK,
    CANAL_BASIN,
    EASTGATE,
];

pub const OUT_OF_BOUNDS: &[Location] = &[
    Location::new("London Charing Cross", 51.5073, -0.1276),
    Location::new("Bognor Regis Pier", 50.7814, -0.6762),
    Location::new("Goodwood Racecourse", 50.8946, -0.7547),
];
