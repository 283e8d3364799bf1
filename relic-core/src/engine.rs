//! Query orchestration over a [`MarkerStore`].
//!
//! The engine owns the sequence every query follows: normalize and clamp the
//! request, execute the store's predicates, then sanitize the outbound
//! markers. All operations are read-only `&self` calls with no shared
//! mutable state, so one engine can serve concurrent callers without
//! coordination.

use log::debug;

use crate::marker::Marker;
use crate::nearest::{self, NearestHeritage};
use crate::query::{NearbyRequest, NearestRequest, QueryError, SearchRequest, ViewportRequest};
use crate::store::MarkerStore;

/// Read-only query engine over a marker store.
#[derive(Debug)]
pub struct MarkerEngine<S> {
    store: S,
}

impl<S: MarkerStore> MarkerEngine<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Markers intersecting a viewport rectangle.
    ///
    /// No ordering is guaranteed; only radius queries sort their results.
    ///
    /// # Errors
    /// Returns [`QueryError::InvalidBoundingBox`] for a malformed rectangle
    /// and surfaces store failures unchanged.
    pub fn viewport(&self, request: &ViewportRequest) -> Result<Vec<Marker>, QueryError> {
        let selection = request.normalize()?;
        let markers = self.store.find_in_rect(&selection)?;
        Ok(sanitized(markers))
    }

    /// Markers within a radius of a centre coordinate, closest first.
    ///
    /// # Errors
    /// Returns [`QueryError::NonFiniteCoordinate`] for a NaN or infinite
    /// centre and surfaces store failures unchanged.
    pub fn nearby(&self, request: &NearbyRequest) -> Result<Vec<Marker>, QueryError> {
        let selection = request.normalize()?;
        let markers = self.store.find_in_radius(&selection)?;
        Ok(sanitized(markers))
    }

    /// Markers whose text fields match a keyword.
    ///
    /// Rows carrying the (0, 0) coordinate sentinel are discarded after
    /// retrieval; the store cannot tell a true origin point from missing
    /// coordinate data, and no real catalogue entry sits on the origin.
    ///
    /// # Errors
    /// Returns [`QueryError::BlankKeyword`] for a blank keyword and
    /// surfaces store failures unchanged.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<Marker>, QueryError> {
        let selection = request.normalize()?;
        let markers = self.store.find_matching(&selection)?;
        let retrieved = markers.len();
        let located: Vec<Marker> = markers
            .into_iter()
            .filter(|marker| !(marker.lat == 0.0 && marker.lng == 0.0))
            .collect();
        let discarded = retrieved - located.len();
        if discarded > 0 {
            debug!("search discarded {discarded} markers without coordinate data");
        }
        Ok(sanitized(located))
    }

    /// The closest heritage site to a post coordinate, if any lies within
    /// the request threshold.
    ///
    /// A request without coordinates resolves to `Ok(None)` without
    /// touching the store. Exhibited sites remain candidates here: the
    /// exclusion rule hides them from map results, not from post-to-site
    /// association.
    ///
    /// # Errors
    /// Returns [`QueryError::NonFiniteCoordinate`] for NaN or infinite
    /// coordinates and surfaces store failures unchanged.
    pub fn nearest_heritage(
        &self,
        request: &NearestRequest,
    ) -> Result<Option<NearestHeritage>, QueryError> {
        let Some(origin) = request.origin()? else {
            return Ok(None);
        };
        let candidates = self.store.heritage_sites()?;
        Ok(nearest::closest_site(
            &candidates,
            origin,
            request.max_distance_meters,
        ))
    }
}

fn sanitized(markers: Vec<Marker>) -> Vec<Marker> {
    markers.into_iter().map(Marker::sanitized).collect()
}
