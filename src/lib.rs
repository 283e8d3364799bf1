//! Facade crate for the relic point-of-interest query engine.
//!
//! This crate re-exports the core domain types and exposes the optional
//! SQLite-backed catalogue store behind a feature flag.

#![forbid(unsafe_code)]

pub use relic_core::{
    EARTH_RADIUS_METERS, HeritageSite, KindSelector, Marker, MarkerEngine, MarkerKind,
    MarkerStore, NEAREST_DEFAULT_MAX_DISTANCE_METERS, NearbyRequest, NearestHeritage,
    NearestRequest, QueryError, RadiusSelection, RectSelection, SearchRequest, StoreError, Target,
    TextSelection, ViewportRequest, distance_meters,
};

#[cfg(feature = "store-sqlite")]
pub use relic_core::{SqliteMarkerStore, SqliteMarkerStoreError};
