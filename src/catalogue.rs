use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::data::*;
use crate::error::CatalogueError;
use crate::geo::{compute_distance, Coordinates};

/// Owns every stop, bus and road distance of the network.
///
/// Stops and buses live in append-only storage and are referred to by
/// [`StopId`] / [`BusId`], so nothing handed out by a lookup is ever
/// invalidated by a later insertion.
#[derive(Debug, Default)]
pub struct TransportCatalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,

    stop_ids: HashMap<String, StopId>,
    bus_ids: HashMap<String, BusId>,

    distances: HashMap<(StopId, StopId), u32>,
    passing_buses: Vec<BTreeSet<BusId>>,
}

impl TransportCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(
        &mut self,
        name: impl Into<String>,
        coordinates: Coordinates,
    ) -> Result<StopId, CatalogueError> {
        let name = name.into();
        if self.stop_ids.contains_key(&name) {
            return Err(CatalogueError::DuplicateStop(name));
        }

        let id = StopId(self.stops.len());
        self.stop_ids.insert(name.clone(), id);
        self.stops.push(Stop { name, coordinates });
        self.passing_buses.push(BTreeSet::new());

        Ok(id)
    }

    /// Adds a bus whose route is given by stop names, all of which must
    /// already be in the catalogue.
    pub fn add_bus<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        stop_names: &[S],
        is_round_trip: bool,
    ) -> Result<BusId, CatalogueError> {
        let name = name.into();
        if self.bus_ids.contains_key(&name) {
            return Err(CatalogueError::DuplicateBus(name));
        }

        let stops = stop_names
            .iter()
            .map(|stop_name| self.resolve(stop_name.as_ref(), || format!("Bus {name}")))
            .collect::<Result<Vec<_>, _>>()?;

        let id = BusId(self.buses.len());
        for stop in &stops {
            self.passing_buses[stop.0].insert(id);
        }

        debug!(bus = %name, stops = stops.len(), is_round_trip, "Adding bus");
        self.bus_ids.insert(name.clone(), id);
        self.buses.push(Bus {
            name,
            stops,
            is_round_trip,
        });

        Ok(id)
    }

    pub fn add_distance(
        &mut self,
        from: &str,
        to: &str,
        meters: u32,
    ) -> Result<(), CatalogueError> {
        let context = || format!("road distance {from:?} -> {to:?}");
        let from = self.resolve(from, context)?;
        let to = self.resolve(to, context)?;

        self.distances.insert((from, to), meters);
        Ok(())
    }

    pub fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_ids.get(name).copied()
    }

    pub fn bus_id(&self, name: &str) -> Option<BusId> {
        self.bus_ids.get(name).copied()
    }

    pub fn find_stop(&self, name: &str) -> Option<&Stop> {
        self.stop_id(name).map(|id| self.stop(id))
    }

    pub fn find_bus(&self, name: &str) -> Option<&Bus> {
        self.bus_id(name).map(|id| self.bus(id))
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.0]
    }

    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Road distance as recorded, falling back to the opposite direction.
    pub fn find_length(&self, from: StopId, to: StopId) -> Option<u32> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
    }

    /// Like [`find_length`](Self::find_length), but an unrecorded pair
    /// counts as zero meters.
    pub fn get_length(&self, from: StopId, to: StopId) -> u32 {
        self.find_length(from, to).unwrap_or_else(|| {
            warn!(
                from = %self.stop(from).name,
                to = %self.stop(to).name,
                "No road distance recorded, assuming 0 m"
            );
            0
        })
    }

    pub fn passing_buses(&self, stop_name: &str) -> Option<&BTreeSet<BusId>> {
        self.stop_id(stop_name).map(|id| &self.passing_buses[id.0])
    }

    pub fn bus_stat(&self, name: &str) -> Option<BusStat> {
        let bus = self.find_bus(name)?;
        let ridden = bus.ridden_stops().collect_vec();

        let (route_length, straight_length) = ridden.iter().tuple_windows().fold(
            (0u64, 0.0),
            |(road, straight), (&from, &to)| {
                (
                    road + u64::from(self.get_length(from, to)),
                    straight
                        + compute_distance(self.stop(from).coordinates, self.stop(to).coordinates),
                )
            },
        );

        let curvature = if straight_length > 0.0 {
            route_length as f64 / straight_length
        } else {
            0.0
        };

        Some(BusStat {
            name: bus.name.clone(),
            stop_count: ridden.len(),
            unique_stop_count: ridden.iter().unique().count(),
            route_length,
            curvature,
        })
    }

    pub fn stop_stat(&self, name: &str) -> Option<StopStat> {
        let stop = self.find_stop(name)?;
        let buses = self
            .passing_buses(name)?
            .iter()
            .map(|&id| self.bus(id).name.clone())
            .sorted()
            .collect();

        Some(StopStat {
            name: stop.name.clone(),
            buses,
        })
    }

    fn resolve(
        &self,
        name: &str,
        context: impl FnOnce() -> String,
    ) -> Result<StopId, CatalogueError> {
        self.stop_id(name).ok_or_else(|| CatalogueError::UnknownStop {
            stop: name.to_owned(),
            context: context(),
        })
    }
}
