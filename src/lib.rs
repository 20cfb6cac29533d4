//! pathmap core
//!
//! Keeps an imperative, retained map surface (tiles, draggable markers, a
//! route overlay, click handling) in step with the declarative route state
//! (`start`, `end`, `path`) that drives it.

pub mod traits;
pub mod error;
pub mod config;
pub mod coordinate;
pub mod bounds;
pub mod haversine;
pub mod polyline;
pub mod surface;
pub mod marker;
pub mod click;
pub mod overlay;
pub mod view;
pub mod location;
pub mod graph;
pub mod osrm;

#[cfg(test)]
mod test_support;
