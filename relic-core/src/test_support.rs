//! Test-only, in-memory [`MarkerStore`] used by unit and behaviour tests.
//!
//! The catalogue performs linear scans over pre-projected markers and is
//! intended only for small fixtures; the SQLite store is the implementation
//! under test for predicate semantics.

use geo::{Coord, Intersects};

use crate::geodesy::distance_meters;
use crate::marker::{Marker, MarkerKind};
use crate::store::{
    HeritageSite, MarkerStore, RadiusSelection, RectSelection, StoreError, Target, TextSelection,
};

/// In-memory marker store over pre-projected fixture rows.
#[derive(Debug, Default)]
pub struct MemoryCatalogue {
    markers: Vec<Marker>,
    heritage_sites: Vec<HeritageSite>,
}

impl MemoryCatalogue {
    /// Replace the marker rows while consuming `self`.
    #[must_use]
    pub fn with_markers<I>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = Marker>,
    {
        self.markers = markers.into_iter().collect();
        self
    }

    /// Replace the nearest-match candidates while consuming `self`.
    #[must_use]
    pub fn with_heritage_sites<I>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = HeritageSite>,
    {
        self.heritage_sites = sites.into_iter().collect();
        self
    }
}

fn covers(target: Target, kind: MarkerKind) -> bool {
    match kind {
        MarkerKind::Museum => target.covers_museums(),
        MarkerKind::Heritage => target.covers_heritages(),
    }
}

fn cap(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

impl MarkerStore for MemoryCatalogue {
    fn find_in_rect(&self, selection: &RectSelection) -> Result<Vec<Marker>, StoreError> {
        let matches_filter = |marker: &Marker| match marker.kind {
            MarkerKind::Museum => {
                selection.museum_categories.is_empty()
                    || selection.museum_categories.contains(&marker.category)
            }
            MarkerKind::Heritage => {
                selection.designations.is_empty()
                    || selection.designations.contains(&marker.category)
            }
        };
        Ok(self
            .markers
            .iter()
            .filter(|marker| covers(selection.target, marker.kind))
            // `Intersects` treats boundary points as inside the rectangle.
            .filter(|marker| {
                selection.rect.intersects(&Coord {
                    x: marker.lng,
                    y: marker.lat,
                })
            })
            .filter(|marker| matches_filter(marker))
            .take(cap(selection.limit))
            .cloned()
            .collect())
    }

    fn find_in_radius(&self, selection: &RadiusSelection) -> Result<Vec<Marker>, StoreError> {
        let mut within: Vec<Marker> = self
            .markers
            .iter()
            .filter(|marker| covers(selection.target, marker.kind))
            .map(|marker| {
                let distance = distance_meters(
                    selection.center,
                    Coord {
                        x: marker.lng,
                        y: marker.lat,
                    },
                );
                marker.clone().with_distance_meters(distance)
            })
            .filter(|marker| marker.distance_meters <= selection.radius_meters)
            .collect();
        within.sort_by(|left, right| {
            left.distance_meters
                .total_cmp(&right.distance_meters)
                .then_with(|| left.id.cmp(&right.id))
        });
        within.truncate(cap(selection.limit));
        Ok(within)
    }

    fn find_matching(&self, selection: &TextSelection) -> Result<Vec<Marker>, StoreError> {
        let needle = selection.pattern.trim_matches('%').to_lowercase();
        let mut matching: Vec<Marker> = self
            .markers
            .iter()
            .filter(|marker| covers(selection.target, marker.kind))
            .filter(|marker| {
                [&marker.name, &marker.address, &marker.category]
                    .into_iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(cap(selection.limit))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            left.name
                .cmp(&right.name)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(matching)
    }

    fn heritage_sites(&self) -> Result<Vec<HeritageSite>, StoreError> {
        Ok(self.heritage_sites.clone())
    }
}
