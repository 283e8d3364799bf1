//! Great-circle geometry on a spherical Earth.
//!
//! Coordinates follow the WGS84 axis convention used throughout the crate:
//! `x = longitude`, `y = latitude`, both in degrees.

use geo::{Coord, Rect};

/// Mean Earth radius, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle (haversine) distance between two coordinates, in metres.
///
/// Deterministic, with no failure modes; the result is `0.0` when both
/// coordinates are identical.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use relic_core::distance_meters;
///
/// let origin = Coord { x: 126.9770, y: 37.5796 };
/// assert_eq!(distance_meters(origin, origin), 0.0);
///
/// // One degree of latitude spans roughly 111.2 km.
/// let north = Coord { x: 126.9770, y: 38.5796 };
/// assert!((distance_meters(origin, north) - 111_195.0).abs() < 10.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine is trigonometric by definition"
)]
pub fn distance_meters(origin: Coord<f64>, target: Coord<f64>) -> f64 {
    let origin_lat = origin.y.to_radians();
    let target_lat = target.y.to_radians();
    let delta_lat = (target.y - origin.y).to_radians();
    let delta_lng = (target.x - origin.x).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + origin_lat.cos() * target_lat.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Latitude/longitude band that encloses a radius circle around `center`.
///
/// The band is a coarse prefilter: every point within `radius_meters` of the
/// centre lies inside it, while points inside it still need the exact
/// distance predicate. Latitudes clamp to the poles; near the poles the
/// longitude delta degrades to the full ±180° band. Regions crossing the
/// antimeridian are not modelled, matching the rectangle queries.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "band bounds are derived from the angular radius"
)]
pub(crate) fn proximity_rect(center: Coord<f64>, radius_meters: f64) -> Rect<f64> {
    let delta_lat = (radius_meters / EARTH_RADIUS_METERS).to_degrees();
    let cos_lat = center.y.to_radians().cos();
    let delta_lng = if cos_lat <= f64::EPSILON {
        180.0
    } else {
        (delta_lat / cos_lat).min(180.0)
    };

    Rect::new(
        Coord {
            x: center.x - delta_lng,
            y: (center.y - delta_lat).max(-90.0),
        },
        Coord {
            x: center.x + delta_lng,
            y: (center.y + delta_lat).min(90.0),
        },
    )
}
