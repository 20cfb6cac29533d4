//! In-process road graph route engine.
//!
//! Loads the serialized road network (OSM nodes and ways as JSON), snaps
//! coordinates to the nearest routable node and searches the weighted graph
//! with the selected algorithm.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coordinate::{Coordinate, PathPoint};
use crate::error::RouteError;
use crate::haversine::haversine_km;
use crate::traits::RouteEngine;

type NodeEntry = GeomWithData<[f64; 2], u64>;

/// Shortest-path search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Dijkstra,
    AStar,
    BellmanFord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown path finding algorithm: {}", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "a_star" => Ok(Algorithm::AStar),
            "bellman_ford" => Ok(Algorithm::BellmanFord),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsmNode {
    id: u64,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OsmWay {
    nodes: Vec<u64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OsmWay {
    fn is_oneway(&self) -> bool {
        self.tags.get("oneway").is_some_and(|value| value == "yes")
    }
}

#[derive(Debug, Deserialize)]
struct OsmData {
    nodes: Vec<OsmNode>,
    ways: Vec<OsmWay>,
}

/// Directed, distance-weighted road graph (weights in kilometers).
pub struct RoadGraph {
    adjacency: HashMap<u64, Vec<(u64, f64)>>,
    coordinates: HashMap<u64, Coordinate>,
    index: RTree<NodeEntry>,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self {
            adjacency: HashMap::new(),
            coordinates: HashMap::new(),
            index: RTree::new(),
        }
    }
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from the OSM JSON payload.
    ///
    /// Segments referencing unknown nodes are skipped. Ways tagged
    /// `oneway=yes` only get forward edges.
    pub fn from_json(json: &str) -> Result<Self, RouteError> {
        let data: OsmData = serde_json::from_str(json)?;
        Ok(Self::from_osm(data))
    }

    fn from_osm(data: OsmData) -> Self {
        let all_nodes: HashMap<u64, Coordinate> = data
            .nodes
            .iter()
            .map(|node| (node.id, Coordinate::new(node.lat, node.lon)))
            .collect();

        let edges: Vec<(u64, u64, f64)> = data
            .ways
            .par_iter()
            .flat_map_iter(|way| {
                let oneway = way.is_oneway();
                let mut segment_edges = Vec::new();
                for pair in way.nodes.windows(2) {
                    let (Some(&from), Some(&to)) =
                        (all_nodes.get(&pair[0]), all_nodes.get(&pair[1]))
                    else {
                        continue;
                    };
                    let km = haversine_km(from, to);
                    segment_edges.push((pair[0], pair[1], km));
                    if !oneway {
                        segment_edges.push((pair[1], pair[0], km));
                    }
                }
                segment_edges
            })
            .collect();

        let mut graph = RoadGraph::new();
        for (from, to, km) in edges {
            graph.adjacency.entry(from).or_default().push((to, km));
            graph.adjacency.entry(to).or_default();
            for id in [from, to] {
                if let Some(&coordinate) = all_nodes.get(&id) {
                    graph.coordinates.insert(id, coordinate);
                }
            }
        }

        let entries: Vec<NodeEntry> = graph
            .coordinates
            .iter()
            .map(|(&id, c)| NodeEntry::new([c.lat, c.lng], id))
            .collect();
        graph.index = RTree::bulk_load(entries);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "road graph loaded"
        );
        graph
    }

    /// Adds a road segment between two points; two-way unless `oneway`.
    pub fn add_road(&mut self, from: PathPoint, to: PathPoint, oneway: bool) {
        self.insert_node(from);
        self.insert_node(to);
        let km = haversine_km(from.coordinate(), to.coordinate());
        self.adjacency.entry(from.id).or_default().push((to.id, km));
        if !oneway {
            self.adjacency.entry(to.id).or_default().push((from.id, km));
        }
    }

    fn insert_node(&mut self, point: PathPoint) {
        self.adjacency.entry(point.id).or_default();
        if self.coordinates.insert(point.id, point.coordinate()).is_none() {
            self.index.insert(NodeEntry::new([point.lat, point.lng], point.id));
        }
    }

    pub fn node_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn contains_node(&self, id: u64) -> bool {
        self.coordinates.contains_key(&id)
    }

    pub fn coordinate(&self, id: u64) -> Option<Coordinate> {
        self.coordinates.get(&id).copied()
    }

    /// Closest routable node to `point`.
    pub fn nearest_node(&self, point: Coordinate) -> Option<u64> {
        self.index
            .nearest_neighbor(&[point.lat, point.lng])
            .map(|entry| entry.data)
    }

    /// Node ids from `start` to `end` inclusive; empty when unreachable.
    pub fn shortest_path(&self, start: u64, end: u64, algorithm: Algorithm) -> Vec<u64> {
        if !self.contains_node(start) || !self.contains_node(end) {
            return Vec::new();
        }
        if start == end {
            return vec![start];
        }

        match algorithm {
            Algorithm::Dijkstra => self.best_first(start, end, |_| 0.0),
            Algorithm::AStar => {
                let target = self.coordinates[&end];
                self.best_first(start, end, |id| {
                    self.coordinate(id)
                        .map_or(0.0, |c| haversine_km(c, target))
                })
            }
            Algorithm::BellmanFord => self.bellman_ford(start, end),
        }
    }

    /// Resolves node ids to route points, skipping unknown ids.
    pub fn path_points(&self, ids: &[u64]) -> Vec<PathPoint> {
        ids.iter()
            .filter_map(|&id| {
                self.coordinate(id)
                    .map(|c| PathPoint::new(id, c.lat, c.lng))
            })
            .collect()
    }

    fn neighbours(&self, id: u64) -> &[(u64, f64)] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // Dijkstra with a zero heuristic, A* otherwise. The haversine heuristic is
    // consistent with haversine edge weights, so each node settles once.
    fn best_first(&self, start: u64, end: u64, heuristic: impl Fn(u64) -> f64) -> Vec<u64> {
        let mut distances: HashMap<u64, f64> = HashMap::from([(start, 0.0)]);
        let mut predecessors: HashMap<u64, u64> = HashMap::new();
        let mut settled: HashSet<u64> = HashSet::new();
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((OrderedFloat(heuristic(start)), start)));

        while let Some(Reverse((_, node))) = heap.pop() {
            if node == end {
                break;
            }
            if !settled.insert(node) {
                continue;
            }
            let node_distance = distances.get(&node).copied().unwrap_or(f64::INFINITY);

            for &(neighbour, weight) in self.neighbours(node) {
                let candidate = node_distance + weight;
                if distances.get(&neighbour).is_none_or(|&known| candidate < known) {
                    distances.insert(neighbour, candidate);
                    predecessors.insert(neighbour, node);
                    heap.push(Reverse((OrderedFloat(candidate + heuristic(neighbour)), neighbour)));
                }
            }
        }

        walk_back(&predecessors, start, end)
    }

    fn bellman_ford(&self, start: u64, end: u64) -> Vec<u64> {
        let mut distances: HashMap<u64, f64> = HashMap::from([(start, 0.0)]);
        let mut predecessors: HashMap<u64, u64> = HashMap::new();

        for _ in 1..self.adjacency.len().max(2) {
            let mut relaxed = false;
            for (&from, edges) in &self.adjacency {
                let Some(&from_distance) = distances.get(&from) else {
                    continue;
                };
                for &(to, weight) in edges {
                    let candidate = from_distance + weight;
                    if distances.get(&to).is_none_or(|&known| candidate < known) {
                        distances.insert(to, candidate);
                        predecessors.insert(to, from);
                        relaxed = true;
                    }
                }
            }
            if !relaxed {
                break;
            }
        }

        walk_back(&predecessors, start, end)
    }
}

fn walk_back(predecessors: &HashMap<u64, u64>, start: u64, end: u64) -> Vec<u64> {
    if !predecessors.contains_key(&end) {
        return Vec::new();
    }
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match predecessors.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// [`RouteEngine`] over an in-memory [`RoadGraph`].
#[derive(Default)]
pub struct GraphEngine {
    graph: Option<RoadGraph>,
    algorithm: Algorithm,
}

impl GraphEngine {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            graph: None,
            algorithm,
        }
    }

    pub fn with_graph(graph: RoadGraph, algorithm: Algorithm) -> Self {
        Self {
            graph: Some(graph),
            algorithm,
        }
    }

    /// Parses and installs the serialized road network.
    ///
    /// On error the previously loaded graph, if any, stays in place.
    pub fn load(&mut self, json: &str) -> Result<(), RouteError> {
        let graph = RoadGraph::from_json(json)?;
        self.graph = Some(graph);
        Ok(())
    }

    pub fn graph(&self) -> Option<&RoadGraph> {
        self.graph.as_ref()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }
}

impl RouteEngine for GraphEngine {
    fn is_ready(&self) -> bool {
        self.graph.is_some()
    }

    fn shortest_path(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Vec<PathPoint>, RouteError> {
        let graph = self.graph.as_ref().ok_or(RouteError::NotReady)?;
        let (Some(start), Some(end)) = (graph.nearest_node(from), graph.nearest_node(to)) else {
            return Ok(Vec::new());
        };
        let ids = graph.shortest_path(start, end, self.algorithm);
        debug!(start, end, algorithm = ?self.algorithm, hops = ids.len(), "graph route computed");
        Ok(graph.path_points(&ids))
    }
}
