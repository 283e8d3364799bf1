//! SQLite-backed read-only catalogue store.
//!
//! The catalogue database carries three externally managed tables:
//! `museums`, `heritages`, and the `exhibited_at` exclusion relation. The
//! store never mutates them; it opens the database read-only and registers
//! the `haversine_m` scalar function so great-circle distance stays a
//! store-side predicate.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use geo::Coord;
use rusqlite::{
    Connection, OpenFlags, Row, functions::FunctionFlags, params_from_iter, types::Type,
};
use thiserror::Error;

use super::{
    HeritageSite, MarkerStore, RadiusSelection, RectSelection, StoreError, TextSelection, sql,
    sql::Select,
};
use crate::{Marker, MarkerKind, distance_meters};

const HERITAGE_SITES_SQL: &str = "SELECT id, name, lat, lng FROM heritages \
     WHERE lat IS NOT NULL AND lng IS NOT NULL ORDER BY id ASC";

/// Error raised when opening the catalogue database.
#[derive(Debug, Error)]
pub enum SqliteMarkerStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open read-only SQLite catalogue at {path}")]
    OpenDatabase {
        /// Requested database path.
        path: PathBuf,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Registering the `haversine_m` scalar function failed.
    #[error("failed to register the haversine scalar function")]
    RegisterFunction {
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Read-only marker store backed by a SQLite catalogue database.
pub struct SqliteMarkerStore {
    connection: Connection,
}

impl fmt::Debug for SqliteMarkerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteMarkerStore").finish_non_exhaustive()
    }
}

impl SqliteMarkerStore {
    /// Open a catalogue database read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteMarkerStoreError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteMarkerStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        register_haversine(&connection)?;
        Ok(Self { connection })
    }

    fn collect(&self, operation: &'static str, select: Select) -> Result<Vec<Marker>, StoreError> {
        let mut statement = self
            .connection
            .prepare(&select.sql)
            .map_err(|source| StoreError::query(operation, source))?;
        let rows = statement
            .query_map(params_from_iter(select.params), marker_from_row)
            .map_err(|source| StoreError::query(operation, source))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::query(operation, source))
    }
}

impl MarkerStore for SqliteMarkerStore {
    fn find_in_rect(&self, selection: &RectSelection) -> Result<Vec<Marker>, StoreError> {
        self.collect("viewport markers", sql::rect_query(selection))
    }

    fn find_in_radius(&self, selection: &RadiusSelection) -> Result<Vec<Marker>, StoreError> {
        self.collect("nearby markers", sql::radius_query(selection))
    }

    fn find_matching(&self, selection: &TextSelection) -> Result<Vec<Marker>, StoreError> {
        self.collect("marker search", sql::text_query(selection))
    }

    fn heritage_sites(&self) -> Result<Vec<HeritageSite>, StoreError> {
        let operation = "heritage sites";
        let mut statement = self
            .connection
            .prepare(HERITAGE_SITES_SQL)
            .map_err(|source| StoreError::query(operation, source))?;
        let rows = statement
            .query_map([], |row| {
                let lat: f64 = row.get(2)?;
                let lng: f64 = row.get(3)?;
                Ok(HeritageSite {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    location: Coord { x: lng, y: lat },
                })
            })
            .map_err(|source| StoreError::query(operation, source))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|source| StoreError::query(operation, source))
    }
}

/// Expose great-circle distance to SQL as `haversine_m(lat1, lng1, lat2, lng2)`.
fn register_haversine(connection: &Connection) -> Result<(), SqliteMarkerStoreError> {
    connection
        .create_scalar_function(
            "haversine_m",
            4,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |context| {
                let lat1: f64 = context.get(0)?;
                let lng1: f64 = context.get(1)?;
                let lat2: f64 = context.get(2)?;
                let lng2: f64 = context.get(3)?;
                Ok(distance_meters(
                    Coord { x: lng1, y: lat1 },
                    Coord { x: lng2, y: lat2 },
                ))
            },
        )
        .map_err(|source| SqliteMarkerStoreError::RegisterFunction { source })
}

/// Map the uniform row shape onto a [`Marker`].
fn marker_from_row(row: &Row<'_>) -> rusqlite::Result<Marker> {
    let kind_tag: String = row.get(1)?;
    let kind = match kind_tag.as_str() {
        "museum" => MarkerKind::Museum,
        "heritage" => MarkerKind::Heritage,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Text,
                format!("unknown marker kind {other:?}").into(),
            ));
        }
    };
    Ok(Marker {
        id: row.get(0)?,
        kind,
        name: row.get(2)?,
        lat: row.get(3)?,
        lng: row.get(4)?,
        address: row.get(5)?,
        category: row.get(6)?,
        distance_meters: row.get(7)?,
    })
}
