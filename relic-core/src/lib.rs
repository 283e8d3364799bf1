//! Core domain logic for the relic point-of-interest query engine.
//!
//! The crate exposes three read-only query shapes over a catalogue of
//! museums and cultural-heritage sites — viewport (bounding rectangle),
//! nearby (radius, distance-ordered), and free-text search — plus the
//! nearest-site matcher used when a new post is associated with the closest
//! heritage site. All three query paths fuse the two entity classes into one
//! uniform [`Marker`] shape, hide heritage sites that are currently
//! exhibited inside a museum, sanitize outbound text, and clamp
//! client-supplied bounds to safe ranges before any store access.
//!
//! Storage is abstracted behind the [`MarkerStore`] trait; the
//! `store-sqlite` feature provides [`SqliteMarkerStore`], a read-only
//! SQLite-backed implementation.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod geodesy;
mod marker;
mod nearest;
mod query;
pub mod sanitize;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use engine::MarkerEngine;
pub use geodesy::{EARTH_RADIUS_METERS, distance_meters};
pub use marker::{KindSelector, Marker, MarkerKind};
pub use nearest::{NEAREST_DEFAULT_MAX_DISTANCE_METERS, NearestHeritage};
pub use query::{
    NEARBY_DEFAULT_LIMIT, NEARBY_DEFAULT_RADIUS_METERS, NEARBY_MAX_LIMIT,
    NEARBY_MAX_RADIUS_METERS, NEARBY_MIN_RADIUS_METERS, NearbyRequest, NearestRequest,
    QueryError, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT, SearchRequest, VIEWPORT_DEFAULT_LIMIT,
    VIEWPORT_MAX_LIMIT, ViewportRequest,
};
pub use store::{
    HeritageSite, MarkerStore, RadiusSelection, RectSelection, StoreError, Target, TextSelection,
};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteMarkerStore, SqliteMarkerStoreError};
