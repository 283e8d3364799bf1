//! Query requests and their normalization rules.
//!
//! Every request is normalized before any store access: limits and radii
//! clamp to safe ranges, blank entity selectors fold to "all", and filter
//! lists are trimmed (an empty list means unrestricted). Missing required
//! fields — the viewport rectangle, the search keyword, finite centre
//! coordinates — are never defaulted; they fail fast with a caller-fault
//! error naming the invalid input.

use geo::{Coord, Rect};
use thiserror::Error;

use crate::marker::KindSelector;
use crate::nearest::NEAREST_DEFAULT_MAX_DISTANCE_METERS;
use crate::store::{RadiusSelection, RectSelection, StoreError, Target, TextSelection};

/// Default viewport result limit.
pub const VIEWPORT_DEFAULT_LIMIT: u32 = 800;
/// Upper bound for viewport result limits.
pub const VIEWPORT_MAX_LIMIT: u32 = 2_000;

/// Default nearby search radius, in metres.
pub const NEARBY_DEFAULT_RADIUS_METERS: f64 = 2_000.0;
/// Smallest effective nearby radius, in metres.
pub const NEARBY_MIN_RADIUS_METERS: f64 = 100.0;
/// Largest effective nearby radius, in metres.
pub const NEARBY_MAX_RADIUS_METERS: f64 = 10_000.0;
/// Default nearby result limit.
pub const NEARBY_DEFAULT_LIMIT: u32 = 100;
/// Upper bound for nearby result limits.
pub const NEARBY_MAX_LIMIT: u32 = 500;

/// Default text search result limit.
pub const SEARCH_DEFAULT_LIMIT: u32 = 20;
/// Upper bound for text search result limits.
pub const SEARCH_MAX_LIMIT: u32 = 500;

/// Errors raised before or while executing a query.
///
/// The first three variants are caller faults rejected before any store
/// access; [`QueryError::Store`] surfaces backing-store failures unchanged.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The viewport rectangle string was malformed.
    #[error("invalid bounding box {input:?}: {reason}")]
    InvalidBoundingBox {
        /// Rectangle string as supplied by the caller.
        input: String,
        /// What made the rectangle unusable.
        reason: String,
    },
    /// The search keyword was missing or blank.
    #[error("search keyword must not be blank")]
    BlankKeyword,
    /// A centre coordinate was NaN or infinite.
    #[error("{axis} must be a finite number")]
    NonFiniteCoordinate {
        /// Which coordinate axis was invalid.
        axis: &'static str,
    },
    /// The backing store failed; never silently degraded to an empty result.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Viewport (bounding rectangle) query.
///
/// # Examples
/// ```
/// use relic_core::{KindSelector, ViewportRequest};
///
/// let request = ViewportRequest::new("37.55,126.96,37.60,127.02")
///     .with_limit(200)
///     .with_kind(KindSelector::Heritage)
///     .with_designations(["national-treasure"]);
/// assert_eq!(request.limit, 200);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportRequest {
    /// Rectangle string `"south,west,north,east"`.
    pub bbox: String,
    /// Requested result limit; clamped to `[1, 2000]`.
    pub limit: u32,
    /// Entity classes to cover.
    pub kind: KindSelector,
    /// Museum category filter; blank entries are dropped.
    pub museum_categories: Vec<String>,
    /// Heritage designation filter; blank entries are dropped.
    pub designations: Vec<String>,
}

impl ViewportRequest {
    /// Build a request for the given rectangle with default limit and kind.
    #[must_use]
    pub fn new(bbox: impl Into<String>) -> Self {
        Self {
            bbox: bbox.into(),
            limit: VIEWPORT_DEFAULT_LIMIT,
            kind: KindSelector::All,
            museum_categories: Vec::new(),
            designations: Vec::new(),
        }
    }

    /// Replace the result limit while consuming `self`.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the entity selector while consuming `self`.
    #[must_use]
    pub const fn with_kind(mut self, kind: KindSelector) -> Self {
        self.kind = kind;
        self
    }

    /// Replace the museum category filter while consuming `self`.
    #[must_use]
    pub fn with_museum_categories<I, T>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.museum_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the heritage designation filter while consuming `self`.
    #[must_use]
    pub fn with_designations<I, T>(mut self, designations: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.designations = designations.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and clamp the request into a store selection.
    ///
    /// # Errors
    /// Returns [`QueryError::InvalidBoundingBox`] unless the rectangle is
    /// exactly four comma-separated finite numbers.
    pub fn normalize(&self) -> Result<RectSelection, QueryError> {
        let rect = parse_bbox(&self.bbox)?;
        let museum_categories = trimmed(&self.museum_categories);
        let designations = trimmed(&self.designations);
        let target = match self.kind {
            KindSelector::Museum => Target::Museums,
            KindSelector::Heritage => Target::Heritages,
            // With both layers in play, a filter on a single layer narrows
            // the query to that layer; otherwise the union runs.
            KindSelector::All => match (museum_categories.is_empty(), designations.is_empty()) {
                (false, true) => Target::Museums,
                (true, false) => Target::Heritages,
                _ => Target::Both,
            },
        };
        Ok(RectSelection {
            rect,
            limit: self.limit.clamp(1, VIEWPORT_MAX_LIMIT),
            target,
            museum_categories,
            designations,
        })
    }
}

/// Radius ("nearby") query around a centre coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    /// Centre latitude in degrees.
    pub lat: f64,
    /// Centre longitude in degrees.
    pub lng: f64,
    /// Search radius in metres; non-positive values fall back to the
    /// default, then clamp to `[100, 10000]`.
    pub radius_meters: f64,
    /// Requested result limit; zero falls back to the default, values above
    /// the maximum clamp to it.
    pub limit: u32,
    /// Entity classes to cover.
    pub kind: KindSelector,
}

impl NearbyRequest {
    /// Build a request centred on the given coordinate with defaults.
    #[must_use]
    pub const fn at(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            radius_meters: NEARBY_DEFAULT_RADIUS_METERS,
            limit: NEARBY_DEFAULT_LIMIT,
            kind: KindSelector::All,
        }
    }

    /// Replace the radius while consuming `self`.
    #[must_use]
    pub const fn with_radius_meters(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    /// Replace the result limit while consuming `self`.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the entity selector while consuming `self`.
    #[must_use]
    pub const fn with_kind(mut self, kind: KindSelector) -> Self {
        self.kind = kind;
        self
    }

    /// Validate and clamp the request into a store selection.
    ///
    /// # Errors
    /// Returns [`QueryError::NonFiniteCoordinate`] when either centre
    /// coordinate is NaN or infinite — an invariant violation, not an empty
    /// result.
    pub fn normalize(&self) -> Result<RadiusSelection, QueryError> {
        let center = finite_center(self.lat, self.lng)?;
        let radius_meters = if self.radius_meters.is_finite() && self.radius_meters > 0.0 {
            self.radius_meters
                .clamp(NEARBY_MIN_RADIUS_METERS, NEARBY_MAX_RADIUS_METERS)
        } else {
            NEARBY_DEFAULT_RADIUS_METERS
        };
        let limit = if self.limit == 0 {
            NEARBY_DEFAULT_LIMIT
        } else {
            self.limit.min(NEARBY_MAX_LIMIT)
        };
        Ok(RadiusSelection {
            center,
            radius_meters,
            limit,
            target: target_for(self.kind),
        })
    }
}

/// Free-text search query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Search keyword; required, rejected when blank after trimming.
    pub keyword: String,
    /// Requested result limit; clamped to `[1, 500]`.
    pub limit: u32,
    /// Entity classes to cover.
    pub kind: KindSelector,
}

impl SearchRequest {
    /// Build a request for the given keyword with defaults.
    #[must_use]
    pub fn for_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            limit: SEARCH_DEFAULT_LIMIT,
            kind: KindSelector::All,
        }
    }

    /// Replace the result limit while consuming `self`.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the entity selector while consuming `self`.
    #[must_use]
    pub const fn with_kind(mut self, kind: KindSelector) -> Self {
        self.kind = kind;
        self
    }

    /// Validate and clamp the request into a store selection.
    ///
    /// # Errors
    /// Returns [`QueryError::BlankKeyword`] when the keyword is empty after
    /// trimming.
    pub fn normalize(&self) -> Result<TextSelection, QueryError> {
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            return Err(QueryError::BlankKeyword);
        }
        Ok(TextSelection {
            pattern: format!("%{keyword}%"),
            limit: self.limit.clamp(1, SEARCH_MAX_LIMIT),
            target: target_for(self.kind),
        })
    }
}

/// Nearest-heritage lookup for the post-creation workflow.
///
/// Posts may arrive without a coordinate; such requests resolve to "no
/// match" without touching the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestRequest {
    /// Latitude of the new post, if it carried one.
    pub lat: Option<f64>,
    /// Longitude of the new post, if it carried one.
    pub lng: Option<f64>,
    /// Maximum association distance, in metres.
    pub max_distance_meters: f64,
}

impl NearestRequest {
    /// Build a request from optional post coordinates with the default
    /// association threshold.
    #[must_use]
    pub const fn new(lat: Option<f64>, lng: Option<f64>) -> Self {
        Self {
            lat,
            lng,
            max_distance_meters: NEAREST_DEFAULT_MAX_DISTANCE_METERS,
        }
    }

    /// Replace the association threshold while consuming `self`.
    #[must_use]
    pub const fn with_max_distance_meters(mut self, max_distance_meters: f64) -> Self {
        self.max_distance_meters = max_distance_meters;
        self
    }

    /// Resolve the origin coordinate, if the post carried one.
    ///
    /// # Errors
    /// Returns [`QueryError::NonFiniteCoordinate`] when a supplied
    /// coordinate is NaN or infinite.
    pub fn origin(&self) -> Result<Option<Coord<f64>>, QueryError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => finite_center(lat, lng).map(Some),
            _ => Ok(None),
        }
    }
}

const fn target_for(kind: KindSelector) -> Target {
    match kind {
        KindSelector::All => Target::Both,
        KindSelector::Museum => Target::Museums,
        KindSelector::Heritage => Target::Heritages,
    }
}

fn finite_center(lat: f64, lng: f64) -> Result<Coord<f64>, QueryError> {
    if !lat.is_finite() {
        return Err(QueryError::NonFiniteCoordinate { axis: "latitude" });
    }
    if !lng.is_finite() {
        return Err(QueryError::NonFiniteCoordinate { axis: "longitude" });
    }
    Ok(Coord { x: lng, y: lat })
}

fn trimmed(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a `"south,west,north,east"` rectangle string.
fn parse_bbox(input: &str) -> Result<Rect<f64>, QueryError> {
    let invalid = |reason: String| QueryError::InvalidBoundingBox {
        input: input.to_owned(),
        reason,
    };

    let pieces: Vec<&str> = input.split(',').map(str::trim).collect();
    if pieces.len() != 4 {
        return Err(invalid(format!(
            "expected four comma-separated bounds, found {}",
            pieces.len()
        )));
    }

    let mut bounds = [0.0_f64; 4];
    for (slot, piece) in bounds.iter_mut().zip(&pieces) {
        let value: f64 = piece
            .parse()
            .map_err(|_| invalid(format!("bound {piece:?} is not a number")))?;
        if !value.is_finite() {
            return Err(invalid(format!("bound {piece:?} is not finite")));
        }
        *slot = value;
    }

    let [south, west, north, east] = bounds;
    // `Rect::new` normalises swapped corners, so inverted bounds degrade to
    // the equivalent envelope instead of failing.
    Ok(Rect::new(
        Coord { x: west, y: south },
        Coord { x: east, y: north },
    ))
}
