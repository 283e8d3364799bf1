//! Uniform marker shape returned by every catalogue query.
//!
//! A marker projects either a museum or a heritage site onto one flat record
//! the mapping client can render without caring which table it came from.
//! The two source entities stay distinct in storage; only this projection is
//! shared.

use crate::sanitize::strip_markup;

/// Entity class a marker was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarkerKind {
    /// A museum or gallery record.
    Museum,
    /// A standalone cultural-heritage site.
    Heritage,
}

impl MarkerKind {
    /// Tag used for this kind in store rows and serialized output.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Museum => "museum",
            Self::Heritage => "heritage",
        }
    }
}

/// Entity classes a query should cover.
///
/// Requests carry free-form type strings; parsing folds blank or unknown
/// input to [`KindSelector::All`] rather than rejecting it, matching the
/// permissive surface the mapping client expects.
///
/// # Examples
/// ```
/// use relic_core::KindSelector;
///
/// assert_eq!(KindSelector::parse("museum"), KindSelector::Museum);
/// assert_eq!(KindSelector::parse("HERITAGE"), KindSelector::Heritage);
/// assert_eq!(KindSelector::parse(""), KindSelector::All);
/// assert_eq!(KindSelector::parse("satellite"), KindSelector::All);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindSelector {
    /// Both museums and heritage sites.
    #[default]
    All,
    /// Museums only.
    Museum,
    /// Heritage sites only.
    Heritage,
}

impl KindSelector {
    /// Parse a client-supplied type string, case-insensitively.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.eq_ignore_ascii_case("museum") {
            Self::Museum
        } else if input.eq_ignore_ascii_case("heritage") {
            Self::Heritage
        } else {
            Self::All
        }
    }
}

/// One point of interest as seen by the mapping client.
///
/// `distance_meters` is populated only by radius queries; every other query
/// path leaves it at `0.0`.
///
/// # Examples
/// ```
/// use relic_core::{Marker, MarkerKind};
///
/// let marker = Marker::new(1, MarkerKind::Museum, "National Museum", 37.523, 126.980);
/// assert_eq!(marker.kind, MarkerKind::Museum);
/// assert_eq!(marker.distance_meters, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Identifier within the marker's source table.
    pub id: u64,
    /// Source entity class.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: MarkerKind,
    /// Display name.
    pub name: String,
    /// Latitude in WGS84 degrees.
    pub lat: f64,
    /// Longitude in WGS84 degrees.
    pub lng: f64,
    /// Street address, falling back to the record's region, else empty.
    pub address: String,
    /// Museum category, or heritage designation falling back to era.
    pub category: String,
    /// Great-circle distance from the query centre, in metres.
    #[cfg_attr(feature = "serde", serde(rename = "distanceMeters"))]
    pub distance_meters: f64,
}

impl Marker {
    /// Construct a marker with empty text fields and no computed distance.
    #[must_use]
    pub fn new(id: u64, kind: MarkerKind, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            lat,
            lng,
            address: String::new(),
            category: String::new(),
            distance_meters: 0.0,
        }
    }

    /// Replace the address while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Replace the category while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replace the computed distance while consuming `self`.
    #[must_use]
    pub const fn with_distance_meters(mut self, distance_meters: f64) -> Self {
        self.distance_meters = distance_meters;
        self
    }

    /// Return the marker with every text field stripped of markup.
    ///
    /// Sanitization is idempotent; markers that are already clean pass
    /// through unchanged.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.name = strip_markup(&self.name);
        self.address = strip_markup(&self.address);
        self.category = strip_markup(&self.category);
        self
    }
}
