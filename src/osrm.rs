//! OSRM HTTP adapter for route geometries.

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::{Coordinate, PathPoint};
use crate::error::RouteError;
use crate::traits::RouteEngine;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmRouteEngine {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmRouteEngine {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson&annotations=nodes",
            self.config.base_url, self.config.profile, from.lng, from.lat, to.lng, to.lat
        )
    }
}

impl RouteEngine for OsrmRouteEngine {
    /// The service is remote; readiness is only known per request.
    fn is_ready(&self) -> bool {
        true
    }

    fn shortest_path(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Vec<PathPoint>, RouteError> {
        let body = self
            .client
            .get(self.route_url(from, to))
            .send()?
            .json::<OsrmRouteResponse>()?;
        route_points(body)
    }
}

/// Converts a route response into path points.
///
/// `NoRoute`/`NoSegment` and empty route lists mean "no path". Node ids come
/// from the node annotation when it lines up with the geometry, otherwise
/// from the point's sequence index.
pub fn route_points(response: OsrmRouteResponse) -> Result<Vec<PathPoint>, RouteError> {
    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Ok(Vec::new()),
        other => {
            let message = response.message.unwrap_or_default();
            return Err(RouteError::UnexpectedResponse(format!("{}: {}", other, message)));
        }
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Ok(Vec::new());
    };

    let coordinates = route.geometry.coordinates;
    let nodes: Vec<u64> = route
        .legs
        .into_iter()
        .filter_map(|leg| leg.annotation)
        .flat_map(|annotation| annotation.nodes)
        .collect();
    let ids_align = nodes.len() == coordinates.len();
    debug!(points = coordinates.len(), ids_align, "osrm route received");

    Ok(coordinates
        .into_iter()
        .enumerate()
        .map(|(index, [lng, lat])| {
            let id = if ids_align { nodes[index] } else { index as u64 };
            PathPoint::new(id, lat, lng)
        })
        .collect())
}

#[derive(Debug, Deserialize)]
pub struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: [lng, lat].
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    annotation: Option<OsrmAnnotation>,
}

#[derive(Debug, Deserialize)]
struct OsrmAnnotation {
    #[serde(default)]
    nodes: Vec<u64>,
}
