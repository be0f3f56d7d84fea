//! The board graph: which locations a unit of each type can reach in one step.
//!
//! Edges are directed `(from, to, unit_type)` triples. Army edges never carry
//! coasts; fleet edges name the coast on split-coast provinces. The graph is
//! validated once at construction and then shared read-only.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::map_data::{COASTLINES, LAND_BORDERS, SEA_LANES};
use super::order::Location;
use super::province::{Coast, Province, PROVINCE_COUNT};
use super::unit::UnitType;

/// A directed border crossing for one unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub from: Location,
    pub to: Location,
    pub unit_type: UnitType,
}

impl Edge {
    pub fn new(from: Location, to: Location, unit_type: UnitType) -> Self {
        Edge { from, to, unit_type }
    }

    pub fn reversed(self) -> Self {
        Edge { from: self.to, to: self.from, unit_type: self.unit_type }
    }
}

/// Structural defects found while building a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown location `{0}`")]
    UnknownLocation(String),
    #[error("{location} is not a valid {unit_type:?} endpoint")]
    InvalidCoast { location: Location, unit_type: UnitType },
    #[error("border at {0} loops back into its own province")]
    SelfLoop(Location),
    #[error("{unit_type:?} border {from} -> {to} crosses impassable terrain")]
    TerrainMismatch { from: Location, to: Location, unit_type: UnitType },
    #[error("{unit_type:?} border {from} -> {to} has no return edge")]
    Asymmetric { from: Location, to: Location, unit_type: UnitType },
}

/// Adjacency of the map, indexed by origin province.
#[derive(Debug, Clone)]
pub struct BoardGraph {
    edges: Vec<Vec<Edge>>,
}

impl BoardGraph {
    /// Builds the standard map.
    pub fn standard() -> Result<Self, GraphError> {
        let mut edges = Vec::with_capacity(2 * (2 * COASTLINES.len() + LAND_BORDERS.len() + SEA_LANES.len()));
        let mut add = |a: &str, b: &str, unit_type| -> Result<(), GraphError> {
            let edge = Edge::new(parse_location(a)?, parse_location(b)?, unit_type);
            edges.push(edge);
            edges.push(edge.reversed());
            Ok(())
        };
        for &(a, b) in COASTLINES {
            add(a, b, UnitType::Army)?;
            add(a, b, UnitType::Fleet)?;
        }
        for &(a, b) in LAND_BORDERS {
            add(a, b, UnitType::Army)?;
        }
        for &(a, b) in SEA_LANES {
            add(a, b, UnitType::Fleet)?;
        }
        Self::from_edges(edges)
    }

    /// Builds a graph from explicit edges. Duplicate edges are merged; both
    /// directions of every border must be present.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Result<Self, GraphError> {
        let mut set = BTreeSet::new();
        for edge in edges {
            validate_edge(&edge)?;
            set.insert(edge);
        }
        if let Some(edge) = set.iter().find(|e| !set.contains(&e.reversed())) {
            return Err(GraphError::Asymmetric {
                from: edge.from,
                to: edge.to,
                unit_type: edge.unit_type,
            });
        }

        let mut by_province = vec![Vec::new(); PROVINCE_COUNT];
        for edge in set {
            by_province[edge.from.province as usize].push(edge);
        }
        Ok(BoardGraph { edges: by_province })
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    fn edges_from(&self, from: Location, unit_type: UnitType) -> impl Iterator<Item = &Edge> {
        self.edges[from.province as usize]
            .iter()
            .filter(move |e| e.unit_type == unit_type && (from.coast == Coast::None || e.from.coast == from.coast))
    }

    /// Locations a unit of `unit_type` standing at `from` can move to in one step.
    pub fn reachable(&self, from: Location, unit_type: UnitType) -> impl Iterator<Item = Location> + '_ {
        self.edges_from(from, unit_type).map(|e| e.to)
    }

    /// True if `to` is one step from `from`. A destination without a coast
    /// matches any coast of its province.
    pub fn is_adjacent(&self, from: Location, to: Location, unit_type: UnitType) -> bool {
        self.reachable(from, unit_type)
            .any(|loc| loc.province == to.province && (to.coast == Coast::None || loc.coast == to.coast))
    }

    /// True if any coast of `to` is one step from `from`.
    pub fn can_reach(&self, from: Location, unit_type: UnitType, to: Province) -> bool {
        self.reachable(from, unit_type).any(|loc| loc.province == to)
    }

    /// The coasts of `to` a unit at `from` can arrive on, in graph order.
    pub fn coasts_reachable(&self, from: Location, unit_type: UnitType, to: Province) -> Vec<Coast> {
        self.reachable(from, unit_type)
            .filter(|loc| loc.province == to)
            .map(|loc| loc.coast)
            .collect()
    }

    /// Provinces bordering `province` for any unit type and any coast.
    pub fn neighbours(&self, province: Province) -> impl Iterator<Item = Province> + '_ {
        self.edges[province as usize].iter().map(|e| e.to.province)
    }

    /// Breadth-first distance in border crossings from `from` to the nearest
    /// province satisfying `is_target`, ignoring unit types.
    pub fn distance(&self, from: Province, is_target: impl Fn(Province) -> bool) -> Option<usize> {
        let mut seen = [false; PROVINCE_COUNT];
        let mut queue = VecDeque::from([(from, 0)]);
        seen[from as usize] = true;
        while let Some((province, dist)) = queue.pop_front() {
            if is_target(province) {
                return Some(dist);
            }
            for next in self.neighbours(province) {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    queue.push_back((next, dist + 1));
                }
            }
        }
        None
    }
}

fn parse_location(s: &str) -> Result<Location, GraphError> {
    Location::parse(s).ok_or_else(|| GraphError::UnknownLocation(s.to_string()))
}

fn validate_edge(edge: &Edge) -> Result<(), GraphError> {
    let Edge { from, to, unit_type } = *edge;
    if from.province == to.province {
        return Err(GraphError::SelfLoop(from));
    }
    if !unit_type.can_occupy(from.province) || !unit_type.can_occupy(to.province) {
        return Err(GraphError::TerrainMismatch { from, to, unit_type });
    }
    for location in [from, to] {
        let coasts = location.province.coasts();
        let valid = match unit_type {
            UnitType::Army => location.coast == Coast::None,
            UnitType::Fleet if coasts.is_empty() => location.coast == Coast::None,
            UnitType::Fleet => coasts.contains(&location.coast),
        };
        if !valid {
            return Err(GraphError::InvalidCoast { location, unit_type });
        }
    }
    Ok(())
}
