//! Subcommand argument structs and their execution paths.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use relic_core::{
    KindSelector, MarkerEngine, NearbyRequest, NearestRequest, SearchRequest, SqliteMarkerStore,
    ViewportRequest,
};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_DB: &str = "db";
pub(crate) const ARG_BBOX: &str = "bbox";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LNG: &str = "lng";
pub(crate) const ARG_QUERY: &str = "query";

pub(crate) const ENV_POINTS_DB: &str = "RELIC_CMDS_POINTS_DB";
pub(crate) const ENV_POINTS_BBOX: &str = "RELIC_CMDS_POINTS_BBOX";
pub(crate) const ENV_NEARBY_DB: &str = "RELIC_CMDS_NEARBY_DB";
pub(crate) const ENV_NEARBY_LAT: &str = "RELIC_CMDS_NEARBY_LAT";
pub(crate) const ENV_NEARBY_LNG: &str = "RELIC_CMDS_NEARBY_LNG";
pub(crate) const ENV_SEARCH_DB: &str = "RELIC_CMDS_SEARCH_DB";
pub(crate) const ENV_SEARCH_QUERY: &str = "RELIC_CMDS_SEARCH_QUERY";
pub(crate) const ENV_NEAREST_DB: &str = "RELIC_CMDS_NEAREST_DB";

/// CLI arguments for the `points` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List markers inside a viewport rectangle. The rectangle is \
                 given as four comma-separated bounds (south,west,north,east); \
                 optional category and designation filters narrow each layer.",
    about = "List markers inside a map viewport"
)]
#[ortho_config(prefix = "RELIC")]
pub(crate) struct PointsArgs {
    /// Path to the catalogue SQLite database.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
    /// Viewport rectangle "south,west,north,east".
    #[arg(long = ARG_BBOX, value_name = "bounds")]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Maximum number of markers (clamped to 1-2000).
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
    /// Marker type: all, museum, or heritage.
    #[arg(long = "type", value_name = "kind")]
    #[serde(default)]
    pub(crate) kind: Option<String>,
    /// Museum category filter; repeatable.
    #[arg(long = "museum-cat", value_name = "category")]
    #[serde(default)]
    pub(crate) museum_cats: Vec<String>,
    /// Heritage designation filter; repeatable.
    #[arg(long = "designation", value_name = "designation")]
    #[serde(default)]
    pub(crate) designations: Vec<String>,
}

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List markers around a centre coordinate, closest first. \
                 The radius defaults to 2000 m and is bounded to 100-10000 m; \
                 the limit defaults to 100 and is bounded to 500.",
    about = "List markers around a coordinate, closest first"
)]
#[ortho_config(prefix = "RELIC")]
pub(crate) struct NearbyArgs {
    /// Path to the catalogue SQLite database.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
    /// Centre latitude in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Centre longitude in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Search radius in metres.
    #[arg(long, value_name = "meters")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Maximum number of markers (clamped to 1-500).
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
    /// Marker type: all, museum, or heritage.
    #[arg(long = "type", value_name = "kind")]
    #[serde(default)]
    pub(crate) kind: Option<String>,
}

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search markers by keyword across names, addresses, and \
                 category labels. The keyword is required; the limit is \
                 validated to 1-200 at intake.",
    about = "Search markers by keyword"
)]
#[ortho_config(prefix = "RELIC")]
pub(crate) struct SearchArgs {
    /// Search keyword.
    #[arg(value_name = "keyword")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Path to the catalogue SQLite database.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
    /// Maximum number of markers (1-200).
    #[arg(long, value_name = "count", value_parser = clap::value_parser!(u32).range(1..=200))]
    #[serde(default)]
    pub(crate) limit: Option<u32>,
    /// Marker type: all, museum, or heritage.
    #[arg(long = "type", value_name = "kind")]
    #[serde(default)]
    pub(crate) kind: Option<String>,
}

/// CLI arguments for the `nearest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Find the closest heritage site to a coordinate, within an \
                 association threshold (200 m by default). Prints null when \
                 no site qualifies or no coordinate is given.",
    about = "Find the closest heritage site to a coordinate"
)]
#[ortho_config(prefix = "RELIC")]
pub(crate) struct NearestArgs {
    /// Path to the catalogue SQLite database.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
    /// Post latitude in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Post longitude in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Association threshold in metres.
    #[arg(long = "max-distance", value_name = "meters")]
    #[serde(default)]
    pub(crate) max_distance: Option<f64>,
}

pub(crate) fn points(args: PointsArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let db = merged.db.ok_or(CliError::MissingArgument {
        field: ARG_DB,
        env: ENV_POINTS_DB,
    })?;
    let bbox = merged.bbox.ok_or(CliError::MissingArgument {
        field: ARG_BBOX,
        env: ENV_POINTS_BBOX,
    })?;

    let mut request = ViewportRequest::new(bbox)
        .with_museum_categories(merged.museum_cats)
        .with_designations(merged.designations);
    if let Some(limit) = merged.limit {
        request = request.with_limit(limit);
    }
    if let Some(kind) = merged.kind.as_deref() {
        request = request.with_kind(KindSelector::parse(kind));
    }

    let engine = open_engine(&db)?;
    let markers = engine.viewport(&request)?;
    write_json(&markers)
}

pub(crate) fn nearby(args: NearbyArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let db = merged.db.ok_or(CliError::MissingArgument {
        field: ARG_DB,
        env: ENV_NEARBY_DB,
    })?;
    let lat = merged.lat.ok_or(CliError::MissingArgument {
        field: ARG_LAT,
        env: ENV_NEARBY_LAT,
    })?;
    let lng = merged.lng.ok_or(CliError::MissingArgument {
        field: ARG_LNG,
        env: ENV_NEARBY_LNG,
    })?;

    let mut request = NearbyRequest::at(lat, lng);
    if let Some(radius) = merged.radius {
        request = request.with_radius_meters(radius);
    }
    if let Some(limit) = merged.limit {
        request = request.with_limit(limit);
    }
    if let Some(kind) = merged.kind.as_deref() {
        request = request.with_kind(KindSelector::parse(kind));
    }

    let engine = open_engine(&db)?;
    let markers = engine.nearby(&request)?;
    write_json(&markers)
}

pub(crate) fn search(args: SearchArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let db = merged.db.ok_or(CliError::MissingArgument {
        field: ARG_DB,
        env: ENV_SEARCH_DB,
    })?;
    let keyword = merged.query.ok_or(CliError::MissingArgument {
        field: ARG_QUERY,
        env: ENV_SEARCH_QUERY,
    })?;

    let mut request = SearchRequest::for_keyword(keyword);
    if let Some(limit) = merged.limit {
        request = request.with_limit(limit);
    }
    if let Some(kind) = merged.kind.as_deref() {
        request = request.with_kind(KindSelector::parse(kind));
    }

    let engine = open_engine(&db)?;
    let markers = engine.search(&request)?;
    write_json(&markers)
}

pub(crate) fn nearest(args: NearestArgs) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let db = merged.db.ok_or(CliError::MissingArgument {
        field: ARG_DB,
        env: ENV_NEAREST_DB,
    })?;

    let mut request = NearestRequest::new(merged.lat, merged.lng);
    if let Some(max_distance) = merged.max_distance {
        request = request.with_max_distance_meters(max_distance);
    }

    let engine = open_engine(&db)?;
    let nearest_site = engine.nearest_heritage(&request)?;
    write_json(&nearest_site)
}

fn open_engine(path: &Utf8Path) -> Result<MarkerEngine<SqliteMarkerStore>, CliError> {
    let store = SqliteMarkerStore::open(path.as_std_path())?;
    Ok(MarkerEngine::new(store))
}

fn write_json<T: Serialize>(payload: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(CliError::SerializeOutput)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .map_err(CliError::WriteOutput)?;
    stdout.write_all(b"\n").map_err(CliError::WriteOutput)
}
