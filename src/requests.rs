//! JSON request document and response shapes.
//!
//! A document carries `base_requests` that populate the catalogue,
//! optional `routing_settings`, and `stat_requests` answered in order.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalogue::TransportCatalogue;
use crate::error::{CatalogueError, RequestError, RoutingError};
use crate::geo::Coordinates;
use crate::router::{RouteResult, RoutingSettings, TransportRouter};

const NOT_FOUND: &str = "not found";

#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,
    #[serde(default)]
    pub routing_settings: Option<RoutingSettings>,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: BTreeMap<String, u32>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatRequest {
    pub id: i64,
    #[serde(flatten)]
    pub kind: StatRequestKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequestKind {
    Bus { name: String },
    Stop { name: String },
    Route { from: String, to: String },
    /// `Map` and any unknown type. Map rendering is out of scope, so a
    /// `Map` request is deliberately answered "not found".
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Bus {
        request_id: i64,
        stop_count: usize,
        unique_stop_count: usize,
        route_length: u64,
        curvature: f64,
    },
    Stop {
        request_id: i64,
        buses: Vec<String>,
    },
    Route(RouteResult),
    NotFound {
        request_id: i64,
        error_message: String,
    },
}

impl Response {
    fn not_found(request_id: i64) -> Self {
        Self::NotFound {
            request_id,
            error_message: NOT_FOUND.to_owned(),
        }
    }
}

/// Stops first, then road distances, then buses, whatever order the
/// requests come in.
pub fn fill_catalogue(requests: &[BaseRequest]) -> Result<TransportCatalogue, CatalogueError> {
    let mut catalogue = TransportCatalogue::new();

    for request in requests {
        if let BaseRequest::Stop {
            name,
            latitude,
            longitude,
            ..
        } = request
        {
            catalogue.add_stop(name.as_str(), Coordinates::new(*latitude, *longitude))?;
        }
    }

    for request in requests {
        if let BaseRequest::Stop {
            name,
            road_distances,
            ..
        } = request
        {
            for (to, &meters) in road_distances {
                catalogue.add_distance(name, to, meters)?;
            }
        }
    }

    for request in requests {
        if let BaseRequest::Bus {
            name,
            stops,
            is_roundtrip,
        } = request
        {
            catalogue.add_bus(name.as_str(), stops, *is_roundtrip)?;
        }
    }

    info!(
        stops = catalogue.stops().len(),
        buses = catalogue.buses().len(),
        "Filled transport catalogue"
    );
    Ok(catalogue)
}

pub fn answer(
    catalogue: &TransportCatalogue,
    router: Option<&TransportRouter>,
    request: &StatRequest,
) -> Response {
    let request_id = request.id;
    debug!(request_id, kind = ?request.kind, "Answering stat request");

    let response = match &request.kind {
        StatRequestKind::Bus { name } => catalogue.bus_stat(name).map(|stat| {
            debug!(request_id, bus = %stat.name, stops = stat.stop_count, "Bus found");
            Response::Bus {
                request_id,
                stop_count: stat.stop_count,
                unique_stop_count: stat.unique_stop_count,
                route_length: stat.route_length,
                curvature: stat.curvature,
            }
        }),
        StatRequestKind::Stop { name } => catalogue.stop_stat(name).map(|stat| {
            debug!(request_id, stop = %stat.name, buses = stat.buses.len(), "Stop found");
            Response::Stop {
                request_id,
                buses: stat.buses,
            }
        }),
        StatRequestKind::Route { from, to } => router
            .and_then(|router| router.find_route(from, to, request_id))
            .map(Response::Route),
        StatRequestKind::Unsupported => None,
    };

    response.unwrap_or_else(|| Response::not_found(request_id))
}

pub fn process_document(document: &Document) -> Result<Vec<Response>, RequestError> {
    let catalogue = fill_catalogue(&document.base_requests)?;

    let router = match document.routing_settings {
        Some(settings) => Some(TransportRouter::new(&catalogue, settings)?),
        None if document
            .stat_requests
            .iter()
            .any(|request| matches!(request.kind, StatRequestKind::Route { .. })) =>
        {
            return Err(RoutingError::MissingSettings.into());
        }
        None => None,
    };

    Ok(document
        .stat_requests
        .iter()
        .map(|request| answer(&catalogue, router.as_ref(), request))
        .collect())
}

/// Reads a whole document from `input` and writes the response array to
/// `output`.
pub fn process<R: Read, W: Write>(input: R, mut output: W, pretty: bool) -> Result<(), RequestError> {
    let document: Document = serde_json::from_reader(input)?;
    let responses = process_document(&document)?;

    if pretty {
        serde_json::to_writer_pretty(&mut output, &responses)?;
    } else {
        serde_json::to_writer(&mut output, &responses)?;
    }
    writeln!(output)?;
    output.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_base_requests() {
        let doc = document(json!({
            "base_requests": [
                {"type": "Bus", "name": "14", "stops": ["A", "B"], "is_roundtrip": false},
                {"type": "Stop", "name": "A", "latitude": 55.5, "longitude": 37.5,
                 "road_distances": {"B": 1200}},
                {"type": "Stop", "name": "B", "latitude": 55.6, "longitude": 37.6}
            ]
        }));

        assert_eq!(doc.base_requests.len(), 3);
        assert!(doc.routing_settings.is_none());
        assert!(doc.stat_requests.is_empty());
        assert_eq!(
            doc.base_requests[2],
            BaseRequest::Stop {
                name: "B".into(),
                latitude: 55.6,
                longitude: 37.6,
                road_distances: BTreeMap::new(),
            }
        );

        let catalogue = fill_catalogue(&doc.base_requests).unwrap();
        let bus = catalogue.find_bus("14").unwrap();
        assert_eq!(bus.stops.len(), 2);
        assert!(!bus.is_round_trip);
        assert_eq!(
            catalogue.find_length(bus.stops[1], bus.stops[0]),
            Some(1200)
        );
    }

    #[test]
    fn parses_stat_requests() {
        let doc = document(json!({
            "stat_requests": [
                {"id": 1, "type": "Bus", "name": "14"},
                {"id": 2, "type": "Stop", "name": "A"},
                {"id": 3, "type": "Route", "from": "A", "to": "B"},
                {"id": 4, "type": "Map"}
            ]
        }));

        let kinds: Vec<_> = doc.stat_requests.iter().map(|r| (r.id, r.kind.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (1, StatRequestKind::Bus { name: "14".into() }),
                (2, StatRequestKind::Stop { name: "A".into() }),
                (
                    3,
                    StatRequestKind::Route {
                        from: "A".into(),
                        to: "B".into()
                    }
                ),
                (4, StatRequestKind::Unsupported),
            ]
        );
    }

    #[test]
    fn unknown_stop_in_bus_aborts() {
        let doc = document(json!({
            "base_requests": [
                {"type": "Bus", "name": "14", "stops": ["A"], "is_roundtrip": true}
            ]
        }));

        assert!(matches!(
            process_document(&doc),
            Err(RequestError::Catalogue(CatalogueError::UnknownStop { .. }))
        ));
    }

    #[test]
    fn route_request_needs_settings() {
        let doc = document(json!({
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0}
            ],
            "stat_requests": [{"id": 1, "type": "Route", "from": "A", "to": "A"}]
        }));

        assert!(matches!(
            process_document(&doc),
            Err(RequestError::Routing(RoutingError::MissingSettings))
        ));
    }

    #[test]
    fn zero_velocity_aborts() {
        let doc = document(json!({
            "routing_settings": {"bus_wait_time": 2, "bus_velocity": 0}
        }));

        assert!(matches!(
            process_document(&doc),
            Err(RequestError::Routing(RoutingError::InvalidVelocity(_)))
        ));
    }

    #[test]
    fn not_found_shape() {
        let json = serde_json::to_value(Response::not_found(9)).unwrap();
        assert_eq!(json, json!({"request_id": 9, "error_message": "not found"}));
    }

    #[test]
    fn stat_responses() {
        let doc = document(json!({
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0,
                 "road_distances": {"B": 1000}},
                {"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.0},
                {"type": "Stop", "name": "C", "latitude": 0.0, "longitude": 0.0},
                {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
            ],
            "stat_requests": [
                {"id": 1, "type": "Bus", "name": "1"},
                {"id": 2, "type": "Stop", "name": "C"},
                {"id": 3, "type": "Stop", "name": "Z"},
                {"id": 4, "type": "Map"}
            ]
        }));

        let responses = serde_json::to_value(process_document(&doc).unwrap()).unwrap();
        assert_eq!(
            responses,
            json!([
                {"request_id": 1, "stop_count": 3, "unique_stop_count": 2,
                 "route_length": 2000, "curvature": 0.0},
                {"request_id": 2, "buses": []},
                {"request_id": 3, "error_message": "not found"},
                {"request_id": 4, "error_message": "not found"}
            ])
        );
    }

    #[test]
    fn malformed_input_is_an_error() {
        let mut output = Vec::new();
        let err = process("{\"base_requests\": 5}".as_bytes(), &mut output, false).unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
        assert!(output.is_empty());
    }
}
