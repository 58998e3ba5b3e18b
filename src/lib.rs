//! Transport catalogue: stops, bus lines and road distances, with line
//! statistics and fastest-itinerary queries.

pub mod catalogue;
pub mod data;
pub mod error;
pub mod geo;
pub mod graph;
pub mod logging;
pub mod requests;
pub mod router;

pub use catalogue::TransportCatalogue;
pub use error::{CatalogueError, RequestError, RoutingError};
pub use router::{RouteItem, RouteResult, RoutingSettings, TransportRouter};
