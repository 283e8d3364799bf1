//! Nearest-heritage matching for newly created posts.
//!
//! A full scan over the heritage catalogue is deliberate: the catalogue is
//! small and bounded (not user-scalable), so the scan's cost is fixed and a
//! spatial index would buy nothing until the catalogue itself changes
//! character.

use geo::Coord;

use crate::geodesy::distance_meters;
use crate::sanitize::strip_markup;
use crate::store::HeritageSite;

/// Default association threshold between a post and a heritage site, in
/// metres.
pub const NEAREST_DEFAULT_MAX_DISTANCE_METERS: f64 = 200.0;

/// The closest qualifying heritage site for a post coordinate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearestHeritage {
    /// Identifier in the heritage table.
    pub id: u64,
    /// Display name, sanitized.
    pub name: String,
    /// Great-circle distance from the post coordinate, in metres.
    #[cfg_attr(feature = "serde", serde(rename = "distanceMeters"))]
    pub distance_meters: f64,
}

/// Find the closest candidate within `max_distance_meters` of `origin`.
///
/// Equidistant candidates resolve to the lowest id, so the result never
/// depends on the store's iteration order.
pub(crate) fn closest_site(
    candidates: &[HeritageSite],
    origin: Coord<f64>,
    max_distance_meters: f64,
) -> Option<NearestHeritage> {
    candidates
        .iter()
        .map(|site| (site, distance_meters(origin, site.location)))
        .filter(|(_, distance)| *distance <= max_distance_meters)
        .min_by(|(left, left_distance), (right, right_distance)| {
            left_distance
                .total_cmp(right_distance)
                .then_with(|| left.id.cmp(&right.id))
        })
        .map(|(site, distance)| NearestHeritage {
            id: site.id,
            name: strip_markup(&site.name),
            distance_meters: distance,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn site(id: u64, lat: f64, lng: f64, name: &str) -> HeritageSite {
        HeritageSite {
            id,
            name: String::from(name),
            location: Coord { x: lng, y: lat },
        }
    }

    #[fixture]
    fn palace_sites() -> Vec<HeritageSite> {
        vec![
            site(10, 37.5796, 126.9770, "Gyeongbokgung"),
            site(11, 37.5826, 126.9831, "Changdeokgung"),
            site(12, 35.1796, 129.0756, "Beomeosa"),
        ]
    }

    #[rstest]
    fn matches_the_closest_site_within_threshold(palace_sites: Vec<HeritageSite>) {
        let origin = Coord { x: 126.9772, y: 37.5797 };
        let nearest = closest_site(&palace_sites, origin, NEAREST_DEFAULT_MAX_DISTANCE_METERS)
            .expect("a palace lies within 200 m");
        assert_eq!(nearest.id, 10);
        assert!(nearest.distance_meters < NEAREST_DEFAULT_MAX_DISTANCE_METERS);
    }

    #[rstest]
    fn returns_none_when_nothing_is_within_threshold(palace_sites: Vec<HeritageSite>) {
        // Mid-ocean, hundreds of kilometres from any fixture site.
        let origin = Coord { x: 130.0, y: 30.0 };
        assert_eq!(
            closest_site(&palace_sites, origin, NEAREST_DEFAULT_MAX_DISTANCE_METERS),
            None
        );
    }

    #[rstest]
    fn exact_coordinate_matches_at_distance_zero(palace_sites: Vec<HeritageSite>) {
        let origin = Coord { x: 126.9770, y: 37.5796 };
        let nearest = closest_site(&palace_sites, origin, NEAREST_DEFAULT_MAX_DISTANCE_METERS)
            .expect("standing on the site");
        assert_eq!(nearest.id, 10);
        assert_eq!(nearest.distance_meters, 0.0);
    }

    #[rstest]
    fn equidistant_candidates_resolve_to_the_lowest_id() {
        let twins = vec![
            site(21, 37.5000, 127.0000, "East Stele"),
            site(20, 37.5000, 127.0000, "West Stele"),
        ];
        let origin = Coord { x: 127.0001, y: 37.5 };
        let nearest =
            closest_site(&twins, origin, NEAREST_DEFAULT_MAX_DISTANCE_METERS).expect("both match");
        assert_eq!(nearest.id, 20);
    }

    #[rstest]
    fn empty_candidate_set_yields_none() {
        let origin = Coord { x: 126.98, y: 37.56 };
        assert_eq!(closest_site(&[], origin, 200.0), None);
    }

    #[rstest]
    fn matched_names_are_sanitized() {
        let sites = vec![site(30, 37.0, 127.0, "<b>Seokguram</b>")];
        let nearest = closest_site(&sites, Coord { x: 127.0, y: 37.0 }, 200.0)
            .expect("exact match");
        assert_eq!(nearest.name, "Seokguram");
    }
}
