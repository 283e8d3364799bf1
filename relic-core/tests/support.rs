//! Shared catalogue fixtures for the integration suites.

use std::path::Path;

use rusqlite::{Connection, params};

/// Create an empty catalogue database with the three reference tables.
pub(crate) fn create_catalogue(path: &Path) -> Connection {
    let connection = Connection::open(path).expect("create catalogue database");
    connection
        .execute_batch(
            "CREATE TABLE museums (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                category    TEXT,
                lat         REAL,
                lng         REAL,
                address     TEXT,
                region      TEXT,
                description TEXT
            );
            CREATE TABLE heritages (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                name_hanja  TEXT,
                thumbnail   TEXT,
                description TEXT,
                designation TEXT,
                region      TEXT,
                address     TEXT,
                era         TEXT,
                lat         REAL,
                lng         REAL
            );
            CREATE TABLE exhibited_at (
                museums_id   INTEGER NOT NULL,
                heritages_id INTEGER NOT NULL,
                PRIMARY KEY (museums_id, heritages_id)
            );",
        )
        .expect("create catalogue schema");
    connection
}

/// Insert a museum row; `coordinate` is `(lat, lng)`.
pub(crate) fn insert_museum(
    connection: &Connection,
    id: u64,
    name: &str,
    category: Option<&str>,
    coordinate: Option<(f64, f64)>,
    address: Option<&str>,
    region: Option<&str>,
) {
    let (lat, lng) = split(coordinate);
    connection
        .execute(
            "INSERT INTO museums (id, name, category, lat, lng, address, region)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, name, category, lat, lng, address, region],
        )
        .expect("insert museum");
}

/// Insert a heritage row; `coordinate` is `(lat, lng)`.
pub(crate) fn insert_heritage(
    connection: &Connection,
    id: u64,
    name: &str,
    designation: Option<&str>,
    era: Option<&str>,
    coordinate: Option<(f64, f64)>,
    address: Option<&str>,
    region: Option<&str>,
) {
    let (lat, lng) = split(coordinate);
    connection
        .execute(
            "INSERT INTO heritages (id, name, designation, era, lat, lng, address, region)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![id, name, designation, era, lat, lng, address, region],
        )
        .expect("insert heritage");
}

/// Record that a heritage item is currently on display inside a museum.
pub(crate) fn insert_exhibited(connection: &Connection, museum_id: u64, heritage_id: u64) {
    connection
        .execute(
            "INSERT INTO exhibited_at (museums_id, heritages_id) VALUES (?1, ?2)",
            params![museum_id, heritage_id],
        )
        .expect("insert exhibited_at");
}

/// Seed the canonical Seoul district fixture.
///
/// Museums: 1 "Seoul History Museum" (history), 2 "Hangang Art Gallery"
/// (art, address falls back to region). Heritages: 10 "Gyeongbokgung"
/// (national-treasure, Joseon), 11 "Bukhansan Fortress" (treasure, Joseon),
/// 12 "Golden Crown" (exhibited at museum 1), 13 "Lost Stele" (no
/// coordinates), 14 "Castle Fortress" (the (0, 0) sentinel).
pub(crate) fn seoul_catalogue(path: &Path) -> Connection {
    let connection = create_catalogue(path);
    insert_museum(
        &connection,
        1,
        "Seoul History Museum",
        Some("history"),
        Some((37.5800, 126.9800)),
        Some("Jongno-gu"),
        Some("Seoul"),
    );
    insert_museum(
        &connection,
        2,
        "Hangang Art Gallery",
        Some("art"),
        Some((37.5860, 127.0000)),
        None,
        Some("Seoul"),
    );
    insert_heritage(
        &connection,
        10,
        "Gyeongbokgung",
        Some("national-treasure"),
        Some("Joseon"),
        Some((37.5796, 126.9770)),
        Some("161 Sajik-ro"),
        Some("Seoul"),
    );
    insert_heritage(
        &connection,
        11,
        "Bukhansan Fortress",
        Some("treasure"),
        Some("Joseon"),
        Some((37.5900, 127.0100)),
        None,
        Some("Seoul"),
    );
    insert_heritage(
        &connection,
        12,
        "Golden Crown",
        Some("national-treasure"),
        Some("Silla"),
        Some((37.5800, 126.9805)),
        None,
        Some("Seoul"),
    );
    insert_heritage(
        &connection,
        13,
        "Lost Stele",
        Some("treasure"),
        None,
        None,
        None,
        Some("Seoul"),
    );
    insert_heritage(
        &connection,
        14,
        "Castle Fortress",
        Some("fortress"),
        None,
        Some((0.0, 0.0)),
        None,
        None,
    );
    insert_exhibited(&connection, 1, 12);
    connection
}

fn split(coordinate: Option<(f64, f64)>) -> (Option<f64>, Option<f64>) {
    coordinate.map_or((None, None), |(lat, lng)| (Some(lat), Some(lng)))
}
