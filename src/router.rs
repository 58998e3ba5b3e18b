use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalogue::TransportCatalogue;
use crate::data::BusId;
use crate::error::RoutingError;
use crate::graph::{RideEdge, RoutingGraph};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RoutingSettings {
    /// Minutes spent waiting at every boarding.
    pub bus_wait_time: u32,
    /// km/h
    pub bus_velocity: f64,
}

impl RoutingSettings {
    pub fn new(bus_wait_time: u32, bus_velocity: f64) -> Self {
        Self {
            bus_wait_time,
            bus_velocity,
        }
    }

    pub fn validate(&self) -> Result<(), RoutingError> {
        // The longest single road must still ride in a finite time.
        if self.bus_velocity.is_finite()
            && self.bus_velocity > 0.0
            && self.travel_time(u64::from(u32::MAX)).is_finite()
        {
            Ok(())
        } else {
            Err(RoutingError::InvalidVelocity(self.bus_velocity))
        }
    }

    /// Minutes needed to ride `meters` at the configured velocity.
    pub fn travel_time(&self, meters: u64) -> f64 {
        (meters as f64 / 1000.0) / self.bus_velocity * 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RouteItem {
    Wait {
        stop_name: String,
        time: u32,
    },
    Bus {
        bus: String,
        span_count: usize,
        time: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub request_id: i64,
    pub total_time: f64,
    pub items: Vec<RouteItem>,
}

/// Answers itinerary queries over a catalogue that is no longer changing.
#[derive(Debug)]
pub struct TransportRouter<'a> {
    catalogue: &'a TransportCatalogue,
    settings: RoutingSettings,
    graph: RoutingGraph,
}

impl<'a> TransportRouter<'a> {
    pub fn new(
        catalogue: &'a TransportCatalogue,
        settings: RoutingSettings,
    ) -> Result<Self, RoutingError> {
        settings.validate()?;

        let graph = build_graph(catalogue, &settings)?;
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Built routing graph"
        );

        Ok(Self {
            catalogue,
            settings,
            graph,
        })
    }

    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// Fastest itinerary between two stops. Unknown stops and unreachable
    /// destinations both give `None`.
    pub fn find_route(&self, from: &str, to: &str, request_id: i64) -> Option<RouteResult> {
        let from = self.catalogue.stop_id(from)?;
        let to = self.catalogue.stop_id(to)?;

        if from == to {
            return Some(RouteResult {
                request_id,
                total_time: 0.0,
                items: Vec::new(),
            });
        }

        let route = self.graph.build_route(from, to)?;
        debug!(request_id, edges = route.edges.len(), weight = route.weight, "Found route");

        let items = route
            .edges
            .iter()
            .map(|&id| self.graph.edge(id))
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .flat_map(|(boarding, _, ride)| {
                [
                    RouteItem::Wait {
                        stop_name: self.catalogue.stop(boarding).name.clone(),
                        time: self.settings.bus_wait_time,
                    },
                    RouteItem::Bus {
                        bus: self.catalogue.bus(ride.bus).name.clone(),
                        span_count: ride.span_count,
                        time: ride.travel_time,
                    },
                ]
            })
            .collect();

        Some(RouteResult {
            request_id,
            total_time: route.weight,
            items,
        })
    }
}

/// One edge for every ordered pair of positions along every direction a bus
/// is ridden, so that staying on a bus never pays the wait twice.
fn build_graph(
    catalogue: &TransportCatalogue,
    settings: &RoutingSettings,
) -> Result<RoutingGraph, RoutingError> {
    let mut graph = RoutingGraph::with_vertices(catalogue.stops().len());
    let wait_time = f64::from(settings.bus_wait_time);

    for (index, bus) in catalogue.buses().iter().enumerate() {
        let bus_id = BusId(index);

        for sequence in bus.directions() {
            let segments: Vec<u64> = sequence
                .iter()
                .tuple_windows()
                .map(|(&from, &to)| u64::from(catalogue.get_length(from, to)))
                .collect();

            for (i, &boarding) in sequence.iter().enumerate() {
                let mut meters = 0;

                for (j, &alighting) in sequence.iter().enumerate().skip(i + 1) {
                    meters += segments[j - 1];
                    let travel_time = settings.travel_time(meters);
                    if !travel_time.is_finite() {
                        return Err(RoutingError::UnboundedTravelTime {
                            bus: bus.name.clone(),
                            meters,
                        });
                    }

                    graph.add_edge(
                        boarding,
                        alighting,
                        RideEdge {
                            bus: bus_id,
                            span_count: j - i,
                            travel_time,
                            weight: wait_time + travel_time,
                        },
                    );
                }
            }
        }
    }

    Ok(graph)
}
