const EARTH_RADIUS_IN_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance in meters, spherical law of cosines.
pub fn compute_distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }

    let from_lat = from.lat.to_radians();
    let to_lat = to.lat.to_radians();
    let delta_lng = (from.lng - to.lng).abs().to_radians();

    let cos_angle = from_lat.sin() * to_lat.sin() + from_lat.cos() * to_lat.cos() * delta_lng.cos();

    // Rounding can push nearly identical points just past 1.0.
    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_IN_METERS
}
