use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogueError {
    #[error("Stop {0:?} is already in the catalogue")]
    DuplicateStop(String),

    #[error("Bus {0:?} is already in the catalogue")]
    DuplicateBus(String),

    #[error("No such Stop {stop:?} referenced by {context}")]
    UnknownStop { stop: String, context: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Bus velocity must be a positive number of km/h, got {0}")]
    InvalidVelocity(f64),

    #[error("Riding {meters} m on bus {bus:?} takes unboundedly long at this velocity")]
    UnboundedTravelTime { bus: String, meters: u64 },

    #[error("Route requests need routing_settings")]
    MissingSettings,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to read or write the request document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed request document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}
