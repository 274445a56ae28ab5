//! Great-circle distance and coordinate sanity checks.
//!
//! All distances are haversine over a spherical Earth (R = 6 371 000 m).
//! Coordinates are normalized to 7 decimal places (~1.1 cm) before any
//! comparison; client GPS payloads routinely carry noise beyond that.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum number of decimal places accepted on either axis.
pub const MAX_COORDINATE_DECIMALS: u32 = 7;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("coordinate '{value}' is not a valid number")]
    Malformed { value: String },
    #[error(
        "coordinates carry too many decimal places (lat: {lat_decimals}, lon: {lon_decimals}, max: {MAX_COORDINATE_DECIMALS})"
    )]
    Precision { lat_decimals: u32, lon_decimals: u32 },
    #[error("latitude must be in [-90, 90] and longitude in [-180, 180] (got {lat}, {lon})")]
    OutOfRange { lat: f64, lon: f64 },
}

/// Rounds a coordinate to 7 decimal places.
#[inline]
pub fn round_coordinate(value: f64) -> f64 {
    (value * 1e7).round() / 1e7
}

/// Number of decimal places in the textual form of a coordinate.
///
/// Counted on the raw submitted text, not the parsed float: `16.12345678`
/// must be rejected even though it parses to the same `f64` as its
/// 7-decimal rounding.
pub fn decimal_places(raw: &str) -> u32 {
    match raw.trim().split_once('.') {
        Some((_, frac)) => frac.chars().filter(|c| c.is_ascii_digit()).count() as u32,
        None => 0,
    }
}

/// Parses and validates a coordinate pair supplied as text.
///
/// Checks, in order: numeric parse, decimal precision, range. Returns the
/// parsed (not yet rounded) pair.
pub fn parse_and_validate(lat_raw: &str, lon_raw: &str) -> Result<(f64, f64), CoordinateError> {
    let lat: f64 = lat_raw
        .trim()
        .parse()
        .map_err(|_| CoordinateError::Malformed {
            value: lat_raw.to_owned(),
        })?;
    let lon: f64 = lon_raw
        .trim()
        .parse()
        .map_err(|_| CoordinateError::Malformed {
            value: lon_raw.to_owned(),
        })?;

    let lat_decimals = decimal_places(lat_raw);
    let lon_decimals = decimal_places(lon_raw);
    if lat_decimals > MAX_COORDINATE_DECIMALS || lon_decimals > MAX_COORDINATE_DECIMALS {
        return Err(CoordinateError::Precision {
            lat_decimals,
            lon_decimals,
        });
    }

    validate_range(lat, lon)?;
    Ok((lat, lon))
}

/// Range check only; both bounds inclusive.
pub fn validate_range(lat: f64, lon: f64) -> Result<(), CoordinateError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(CoordinateError::OutOfRange { lat, lon });
    }
    Ok(())
}

/// Haversine distance in meters between two coordinate pairs.
///
/// Inputs are rounded to 7 decimal places first; if both points then agree
/// within 1e-7 degrees on each axis the distance is exactly 0.0, so
/// floating-point noise can never produce a spurious non-zero "same point"
/// distance.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = (round_coordinate(lat1), round_coordinate(lon1));
    let (lat2, lon2) = (round_coordinate(lat2), round_coordinate(lon2));

    if (lat1 - lat2).abs() < 1e-7 && (lon1 - lon2).abs() < 1e-7 {
        return 0.0;
    }

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_M
}

/// Whether `point` lies inside the circular geofence, together with the
/// computed distance. A point exactly on the boundary is inside.
///
/// Returns `(false, -1.0)` when the distance cannot be determined (non-finite
/// intermediate), which callers must treat as "unknown" rather than "out of
/// range".
pub fn is_within_geofence(
    center_lat: f64,
    center_lon: f64,
    radius_m: f64,
    point_lat: f64,
    point_lon: f64,
) -> (bool, f64) {
    let distance = distance_m(center_lat, center_lon, point_lat, point_lon);
    if !distance.is_finite() {
        return (false, -1.0);
    }
    (distance <= radius_m, distance)
}
