use std::iter;

use crate::geo::Coordinates;

/// Position of a stop in the catalogue's append-only stop storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub usize);

/// Position of a bus in the catalogue's append-only bus storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    pub name: String,
    /// Recorded sequence. One-way for buses that are not round trips.
    pub stops: Vec<StopId>,
    pub is_round_trip: bool,
}

impl Bus {
    /// The forward sequence followed, for a there-and-back bus, by the
    /// return leg without repeating the turnaround stop.
    pub fn ridden_stops(&self) -> impl Iterator<Item = StopId> + '_ {
        let return_leg: &[StopId] = if self.is_round_trip {
            &[]
        } else {
            &self.stops[..self.stops.len().saturating_sub(1)]
        };

        self.stops
            .iter()
            .chain(return_leg.iter().rev())
            .copied()
    }

    /// The directional sequences the bus is actually ridden along.
    pub fn directions(&self) -> impl Iterator<Item = Vec<StopId>> + '_ {
        let backward = (!self.is_round_trip)
            .then(|| self.stops.iter().rev().copied().collect::<Vec<_>>());

        iter::once(self.stops.clone()).chain(backward)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusStat {
    pub name: String,
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: u64,
    pub curvature: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopStat {
    pub name: String,
    pub buses: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(stops: &[usize], is_round_trip: bool) -> Bus {
        Bus {
            name: "1".to_owned(),
            stops: stops.iter().copied().map(StopId).collect(),
            is_round_trip,
        }
    }

    #[test]
    fn round_trip_is_ridden_as_recorded() {
        let ridden: Vec<_> = bus(&[0, 1, 2, 0], true).ridden_stops().collect();
        assert_eq!(ridden, vec![StopId(0), StopId(1), StopId(2), StopId(0)]);
    }

    #[test]
    fn there_and_back_adds_return_leg() {
        let ridden: Vec<_> = bus(&[0, 1, 2], false).ridden_stops().collect();
        assert_eq!(
            ridden,
            vec![StopId(0), StopId(1), StopId(2), StopId(1), StopId(0)]
        );
    }

    #[test]
    fn empty_route_rides_nothing() {
        assert_eq!(bus(&[], false).ridden_stops().count(), 0);
    }

    #[test]
    fn directions() {
        let round: Vec<_> = bus(&[0, 1, 0], true).directions().collect();
        assert_eq!(round, vec![vec![StopId(0), StopId(1), StopId(0)]]);

        let linear: Vec<_> = bus(&[0, 1, 2], false).directions().collect();
        assert_eq!(
            linear,
            vec![
                vec![StopId(0), StopId(1), StopId(2)],
                vec![StopId(2), StopId(1), StopId(0)],
            ]
        );
    }
}
