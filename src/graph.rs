//! Weighted directed graph handed to the shortest-path engine.
//!
//! Vertices are stops, numbered exactly like [`StopId`]. Each edge means
//! "board one bus here and ride it, without changing, to there", and carries
//! the ride's metadata next to its weight. Search itself is delegated to
//! `petgraph`.

use itertools::Itertools;
use petgraph::{
    algo::astar,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use crate::data::{BusId, StopId};

#[derive(Debug, Clone, PartialEq)]
pub struct RideEdge {
    pub bus: BusId,
    /// Number of stops passed, boarding stop excluded.
    pub span_count: usize,
    /// Minutes spent riding.
    pub travel_time: f64,
    /// Minutes including the wait at the boarding stop.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub weight: f64,
    pub edges: Vec<EdgeIndex>,
}

#[derive(Debug, Default)]
pub struct RoutingGraph {
    graph: DiGraph<StopId, RideEdge>,
}

impl RoutingGraph {
    /// A graph with one vertex per stop and no edges yet.
    pub fn with_vertices(vertex_count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(vertex_count, 0);
        for stop in 0..vertex_count {
            graph.add_node(StopId(stop));
        }

        Self { graph }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn add_edge(&mut self, from: StopId, to: StopId, ride: RideEdge) -> EdgeIndex {
        debug_assert!(ride.weight.is_finite() && ride.weight >= 0.0);
        self.graph
            .add_edge(NodeIndex::new(from.0), NodeIndex::new(to.0), ride)
    }

    /// Boarding stop, alighting stop and ride of an edge.
    pub fn edge(&self, id: EdgeIndex) -> Option<(StopId, StopId, &RideEdge)> {
        let (from, to) = self.graph.edge_endpoints(id)?;
        Some((self.graph[from], self.graph[to], &self.graph[id]))
    }

    pub fn edges(&self) -> impl Iterator<Item = (StopId, StopId, &RideEdge)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()],
                self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    /// Minimum-weight path between two stops, or `None` if `to` is
    /// unreachable.
    pub fn build_route(&self, from: StopId, to: StopId) -> Option<RouteInfo> {
        let start = NodeIndex::new(from.0);
        let goal = NodeIndex::new(to.0);
        if start.index() >= self.vertex_count() || goal.index() >= self.vertex_count() {
            return None;
        }

        let (weight, path) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| edge.weight().weight,
            |_| 0.0,
        )?;

        // The path lists vertices; between two of them the search relaxed
        // along the cheapest of the parallel edges.
        let edges = path
            .into_iter()
            .tuple_windows()
            .map(|(a, b)| {
                self.graph
                    .edges_connecting(a, b)
                    .min_by(|x, y| x.weight().weight.total_cmp(&y.weight().weight))
                    .map(|edge| edge.id())
            })
            .collect::<Option<Vec<_>>>()?;

        Some(RouteInfo { weight, edges })
    }
}
