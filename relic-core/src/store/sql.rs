//! Parameterized SQL assembly for catalogue queries.
//!
//! Each query is one SELECT per covered layer, composed from independent
//! AND terms; an absent filter contributes no clause. Layers share one
//! projection (the uniform marker row shape), so `Both` targets combine via
//! `UNION ALL` under a single shared limit, museums first. Radius unions
//! carry an outer `ORDER BY distance_m` so the combined set stays
//! distance-ordered rather than naively concatenated.

use geo::{Coord, Rect};
use rusqlite::types::Value;

use super::{RadiusSelection, RectSelection, Target, TextSelection};
use crate::geodesy::proximity_rect;

/// A renderable statement: SQL text plus its positional parameters.
pub(crate) struct Select {
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Museums,
    Heritages,
}

impl Layer {
    const fn alias(self) -> &'static str {
        match self {
            Self::Museums => "m",
            Self::Heritages => "h",
        }
    }

    fn projection(self, distance_expr: &str) -> String {
        match self {
            Self::Museums => format!(
                "SELECT m.id AS id, 'museum' AS kind, m.name AS name, \
                 m.lat AS lat, m.lng AS lng, \
                 COALESCE(m.address, m.region, '') AS address, \
                 COALESCE(m.category, '') AS category, \
                 {distance_expr} AS distance_m \
                 FROM museums m"
            ),
            Self::Heritages => format!(
                "SELECT h.id AS id, 'heritage' AS kind, h.name AS name, \
                 h.lat AS lat, h.lng AS lng, \
                 COALESCE(h.address, h.region, '') AS address, \
                 COALESCE(h.designation, h.era, '') AS category, \
                 {distance_expr} AS distance_m \
                 FROM heritages h"
            ),
        }
    }

    const fn text_columns(self) -> &'static [&'static str] {
        match self {
            Self::Museums => &["m.name", "m.address", "m.category"],
            Self::Heritages => &["h.name", "h.address", "h.designation", "h.era"],
        }
    }
}

/// AND-combinable predicate terms with their bound parameters.
#[derive(Default)]
struct Terms {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Terms {
    fn new() -> Self {
        Self::default()
    }

    /// Rows lacking either coordinate are invisible to every query.
    fn coordinates_present(&mut self, alias: &str) {
        self.clauses
            .push(format!("{alias}.lat IS NOT NULL AND {alias}.lng IS NOT NULL"));
    }

    /// Inclusive envelope containment.
    fn within_rect(&mut self, alias: &str, rect: &Rect<f64>) {
        self.clauses.push(format!(
            "{alias}.lat BETWEEN ? AND ? AND {alias}.lng BETWEEN ? AND ?"
        ));
        self.params.extend([
            Value::from(rect.min().y),
            Value::from(rect.max().y),
            Value::from(rect.min().x),
            Value::from(rect.max().x),
        ]);
    }

    /// Exact great-circle containment via the registered scalar function.
    fn within_distance(&mut self, alias: &str, center: Coord<f64>, radius_meters: f64) {
        self.clauses
            .push(format!("haversine_m(?, ?, {alias}.lat, {alias}.lng) <= ?"));
        self.params.extend([
            Value::from(center.y),
            Value::from(center.x),
            Value::from(radius_meters),
        ]);
    }

    /// Case-insensitive wildcard match over the layer's text columns.
    fn matches_text(&mut self, columns: &[&str], pattern: &str) {
        let likes: Vec<String> = columns
            .iter()
            .map(|column| format!("LOWER({column}) LIKE ?"))
            .collect();
        self.clauses.push(format!("({})", likes.join(" OR ")));
        let lowered = pattern.to_lowercase();
        self.params
            .extend(columns.iter().map(|_| Value::from(lowered.clone())));
    }

    /// Hide heritage sites currently on display inside a museum.
    fn not_exhibited(&mut self) {
        self.clauses.push(String::from(
            "NOT EXISTS (SELECT 1 FROM exhibited_at ea WHERE ea.heritages_id = h.id)",
        ));
    }

    /// Membership filter; an empty list contributes no clause.
    fn one_of(&mut self, column: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.clauses.push(format!("{column} IN ({placeholders})"));
        self.params
            .extend(values.iter().cloned().map(Value::from));
    }

    /// Render the terms onto a projection, producing one layer select.
    fn onto(self, projection: String, mut leading_params: Vec<Value>) -> Select {
        let sql = format!("{projection} WHERE {}", self.clauses.join(" AND "));
        leading_params.extend(self.params);
        Select {
            sql,
            params: leading_params,
        }
    }
}

/// Markers intersecting a rectangle. No ordering guarantee.
pub(crate) fn rect_query(selection: &RectSelection) -> Select {
    finalize(
        covered_layers(selection.target, |layer| rect_layer(layer, selection)),
        None,
        selection.limit,
    )
}

/// Markers within a radius, ascending by distance with id tie-break.
pub(crate) fn radius_query(selection: &RadiusSelection) -> Select {
    finalize(
        covered_layers(selection.target, |layer| radius_layer(layer, selection)),
        Some("distance_m ASC, id ASC"),
        selection.limit,
    )
}

/// Markers matching a text pattern, ordered by name.
pub(crate) fn text_query(selection: &TextSelection) -> Select {
    finalize(
        covered_layers(selection.target, |layer| text_layer(layer, selection)),
        Some("name ASC, id ASC"),
        selection.limit,
    )
}

fn rect_layer(layer: Layer, selection: &RectSelection) -> Select {
    let alias = layer.alias();
    let mut terms = Terms::new();
    terms.coordinates_present(alias);
    terms.within_rect(alias, &selection.rect);
    match layer {
        Layer::Museums => terms.one_of("m.category", &selection.museum_categories),
        Layer::Heritages => {
            terms.not_exhibited();
            terms.one_of("h.designation", &selection.designations);
        }
    }
    terms.onto(layer.projection("0.0"), Vec::new())
}

fn radius_layer(layer: Layer, selection: &RadiusSelection) -> Select {
    let alias = layer.alias();
    let distance_expr = format!("haversine_m(?, ?, {alias}.lat, {alias}.lng)");
    let leading = vec![
        Value::from(selection.center.y),
        Value::from(selection.center.x),
    ];
    let mut terms = Terms::new();
    terms.coordinates_present(alias);
    // Coarse band prefilter, then the exact predicate.
    terms.within_rect(
        alias,
        &proximity_rect(selection.center, selection.radius_meters),
    );
    terms.within_distance(alias, selection.center, selection.radius_meters);
    if layer == Layer::Heritages {
        terms.not_exhibited();
    }
    terms.onto(layer.projection(&distance_expr), leading)
}

fn text_layer(layer: Layer, selection: &TextSelection) -> Select {
    let alias = layer.alias();
    let mut terms = Terms::new();
    terms.coordinates_present(alias);
    terms.matches_text(layer.text_columns(), &selection.pattern);
    if layer == Layer::Heritages {
        terms.not_exhibited();
    }
    terms.onto(layer.projection("0.0"), Vec::new())
}

fn covered_layers(target: Target, build: impl Fn(Layer) -> Select) -> Vec<Select> {
    let mut layers = Vec::new();
    if target.covers_museums() {
        layers.push(build(Layer::Museums));
    }
    if target.covers_heritages() {
        layers.push(build(Layer::Heritages));
    }
    layers
}

fn finalize(layers: Vec<Select>, order: Option<&str>, limit: u32) -> Select {
    let mut params = Vec::new();
    let mut fragments = Vec::with_capacity(layers.len());
    for layer in layers {
        fragments.push(layer.sql);
        params.extend(layer.params);
    }
    let mut sql = fragments.join(" UNION ALL ");
    if let Some(order) = order {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }
    sql.push_str(" LIMIT ?");
    params.push(Value::from(i64::from(limit)));
    Select { sql, params }
}
