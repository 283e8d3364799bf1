//! Data access for the two point collections and their exclusion relation.
//!
//! The [`MarkerStore`] trait defines read-only access to museums and
//! heritage sites as uniform [`Marker`] rows. Implementations own the
//! predicate execution: rectangle containment, radius containment,
//! case-insensitive text matching, category/designation membership, and the
//! exhibited-at exclusion rule.
//!
//! Coordinates use WGS84 with axis order (longitude, latitude) in degrees.
//! Rectangle queries are axis-aligned in lon/lat space and do not model
//! regions crossing the antimeridian; callers needing such queries must
//! split the area and issue two requests.

use geo::{Coord, Rect};
use thiserror::Error;

use crate::Marker;

#[cfg(feature = "store-sqlite")]
mod sql;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteMarkerStore, SqliteMarkerStoreError};

/// Entity classes a store query targets.
///
/// `Both` executes the union of the museum and heritage layers under one
/// shared limit, museums first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Query the museum layer only.
    Museums,
    /// Query the heritage layer only.
    Heritages,
    /// Query both layers under a shared limit.
    Both,
}

impl Target {
    /// Whether the museum layer participates in this target.
    #[must_use]
    pub const fn covers_museums(self) -> bool {
        matches!(self, Self::Museums | Self::Both)
    }

    /// Whether the heritage layer participates in this target.
    #[must_use]
    pub const fn covers_heritages(self) -> bool {
        matches!(self, Self::Heritages | Self::Both)
    }
}

/// Normalized rectangle query: markers intersecting an envelope.
///
/// Bounds are inclusive. Filter lists hold trimmed, non-empty values; an
/// empty list means "no restriction", never "match nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct RectSelection {
    /// Envelope in lon/lat space.
    pub rect: Rect<f64>,
    /// Maximum number of markers to return across all layers.
    pub limit: u32,
    /// Entity classes to cover.
    pub target: Target,
    /// Museum category filter; empty means unrestricted.
    pub museum_categories: Vec<String>,
    /// Heritage designation filter; empty means unrestricted.
    pub designations: Vec<String>,
}

/// Normalized radius query: markers within a great-circle distance.
///
/// Results carry a populated `distance_meters` field and are ordered by
/// ascending distance, with the marker id as a stable tie-break — also
/// across the union when the target is [`Target::Both`].
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusSelection {
    /// Centre of the search circle in lon/lat space.
    pub center: Coord<f64>,
    /// Radius in metres.
    pub radius_meters: f64,
    /// Maximum number of markers to return across all layers.
    pub limit: u32,
    /// Entity classes to cover.
    pub target: Target,
}

/// Normalized text query: markers whose text fields match a pattern.
///
/// The pattern is a SQL `LIKE` wildcard pattern (already wrapped in `%`),
/// matched case-insensitively against name and address, plus category for
/// museums and designation/era for heritage sites.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSelection {
    /// Wildcard pattern to match.
    pub pattern: String,
    /// Maximum number of markers to return across all layers.
    pub limit: u32,
    /// Entity classes to cover.
    pub target: Target,
}

/// A heritage site candidate for nearest-point matching.
#[derive(Debug, Clone, PartialEq)]
pub struct HeritageSite {
    /// Identifier in the heritage table.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Site coordinate in lon/lat space.
    pub location: Coord<f64>,
}

/// Error raised when the backing store fails to execute a query.
///
/// Store failures surface unchanged; an empty result always means "no
/// matches", never a swallowed failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Preparing or executing a store query failed.
    #[error("failed to query {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Underlying store error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a backend failure for the named operation.
    pub fn query(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Query {
            operation,
            source: source.into(),
        }
    }
}

/// Read-only access to the museum and heritage point collections.
///
/// Every heritage-layer result must honour the exhibited-at exclusion: a
/// heritage site referenced by the exclusion relation is discoverable only
/// through the museum housing it, never as a standalone marker. The only
/// exception is [`MarkerStore::heritage_sites`], which feeds nearest-point
/// matching and deliberately keeps exhibited sites as candidates.
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, Intersects};
/// use relic_core::{
///     HeritageSite, Marker, MarkerStore, RadiusSelection, RectSelection, StoreError,
///     TextSelection,
/// };
///
/// /// Toy store holding pre-projected markers for a single layer.
/// struct FixedStore {
///     markers: Vec<Marker>,
/// }
///
/// impl MarkerStore for FixedStore {
///     fn find_in_rect(&self, selection: &RectSelection) -> Result<Vec<Marker>, StoreError> {
///         Ok(self
///             .markers
///             .iter()
///             .filter(|m| selection.rect.intersects(&Coord { x: m.lng, y: m.lat }))
///             .take(selection.limit as usize)
///             .cloned()
///             .collect())
///     }
///
///     fn find_in_radius(&self, _: &RadiusSelection) -> Result<Vec<Marker>, StoreError> {
///         Ok(Vec::new())
///     }
///
///     fn find_matching(&self, _: &TextSelection) -> Result<Vec<Marker>, StoreError> {
///         Ok(Vec::new())
///     }
///
///     fn heritage_sites(&self) -> Result<Vec<HeritageSite>, StoreError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait MarkerStore {
    /// Return up to `limit` markers intersecting the selection rectangle.
    ///
    /// Bounds are inclusive. No ordering is guaranteed beyond the store's
    /// natural row order.
    fn find_in_rect(&self, selection: &RectSelection) -> Result<Vec<Marker>, StoreError>;

    /// Return up to `limit` markers within the selection radius, ascending
    /// by `distance_meters` with id as the tie-break.
    fn find_in_radius(&self, selection: &RadiusSelection) -> Result<Vec<Marker>, StoreError>;

    /// Return up to `limit` markers matching the selection pattern,
    /// ordered by name.
    ///
    /// Rows whose stored coordinate is the (0, 0) sentinel are still
    /// returned; discarding them is the engine's post-filter.
    fn find_matching(&self, selection: &TextSelection) -> Result<Vec<Marker>, StoreError>;

    /// Return every heritage site that has a coordinate, for nearest-point
    /// matching.
    fn heritage_sites(&self) -> Result<Vec<HeritageSite>, StoreError>;
}
