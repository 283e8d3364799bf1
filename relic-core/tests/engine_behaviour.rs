//! End-to-end engine behaviour over the SQLite store.

mod support;

use relic_core::{
    KindSelector, Marker, MarkerEngine, NearbyRequest, NearestRequest, QueryError, SearchRequest,
    SqliteMarkerStore, ViewportRequest,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const DISTRICT_BBOX: &str = "37.55,126.96,37.60,127.02";

fn ids(markers: &[Marker]) -> Vec<u64> {
    let mut collected: Vec<u64> = markers.iter().map(|marker| marker.id).collect();
    collected.sort_unstable();
    collected
}

#[fixture]
fn seoul_engine() -> (TempDir, MarkerEngine<SqliteMarkerStore>) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("catalogue.db");
    drop(support::seoul_catalogue(&db_path));
    let store = SqliteMarkerStore::open(&db_path).expect("open catalogue");
    (dir, MarkerEngine::new(store))
}

#[rstest]
fn viewport_returns_both_entity_classes(
    seoul_engine: (TempDir, MarkerEngine<SqliteMarkerStore>),
) {
    let (_dir, engine) = seoul_engine;
    let markers = engine
        .viewport(&ViewportRequest::new(DISTRICT_BBOX))
        .expect("viewport query");
    assert_eq!(ids(&markers), vec![1, 2, 10, 11]);
}

#[rstest]
fn exhibited_heritage_reappears_once_the_relation_is_removed() {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("catalogue.db");
    let connection = support::create_catalogue(&db_path);
    support::insert_museum(
        &connection,
        1,
        "Seoul History Museum",
        Some("history"),
        Some((37.58, 126.98)),
        None,
        Some("Seoul"),
    );
    support::insert_heritage(
        &connection,
        10,
        "Gyeongbokgung",
        Some("national-treasure"),
        None,
        Some((37.5796, 126.9770)),
        None,
        None,
    );
    drop(connection);

    let store = SqliteMarkerStore::open(&db_path).expect("open catalogue");
    let engine = MarkerEngine::new(store);
    let request = ViewportRequest::new(DISTRICT_BBOX);

    // Without an exhibition fact both markers are discoverable.
    let markers = engine.viewport(&request).expect("viewport query");
    assert_eq!(ids(&markers), vec![1, 10]);

    // Recording the exhibition hides the heritage site from the same call.
    let writer = rusqlite::Connection::open(&db_path).expect("reopen catalogue");
    support::insert_exhibited(&writer, 1, 10);
    drop(writer);

    let reopened = SqliteMarkerStore::open(&db_path).expect("reopen store");
    let exhibited_engine = MarkerEngine::new(reopened);
    let markers = exhibited_engine.viewport(&request).expect("viewport query");
    assert_eq!(ids(&markers), vec![1]);
}

#[rstest]
fn nearby_clamp_equivalences_hold(seoul_engine: (TempDir, MarkerEngine<SqliteMarkerStore>)) {
    let (_dir, engine) = seoul_engine;
    let base = NearbyRequest::at(37.5796, 126.9770);

    let overflowed = engine
        .nearby(&base.clone().with_limit(9_999))
        .expect("nearby query");
    let at_maximum = engine
        .nearby(&base.clone().with_limit(500))
        .expect("nearby query");
    assert_eq!(overflowed, at_maximum);

    let negative_radius = engine
        .nearby(&base.clone().with_radius_meters(-10.0))
        .expect("nearby query");
    let default_radius = engine
        .nearby(&base.with_radius_meters(2_000.0))
        .expect("nearby query");
    assert_eq!(negative_radius, default_radius);
}

#[rstest]
fn nearby_rejects_nan_coordinates(seoul_engine: (TempDir, MarkerEngine<SqliteMarkerStore>)) {
    let (_dir, engine) = seoul_engine;
    let error = engine
        .nearby(&NearbyRequest::at(f64::NAN, 126.9770))
        .expect_err("NaN latitude");
    assert!(matches!(
        error,
        QueryError::NonFiniteCoordinate { axis: "latitude" }
    ));
}

#[rstest]
fn search_clamp_and_blank_keyword_rules_hold(
    seoul_engine: (TempDir, MarkerEngine<SqliteMarkerStore>),
) {
    let (_dir, engine) = seoul_engine;

    let error = engine
        .search(&SearchRequest::for_keyword(" "))
        .expect_err("blank keyword");
    assert!(matches!(error, QueryError::BlankKeyword));

    let overflowed = engine
        .search(&SearchRequest::for_keyword("fortress").with_limit(10_000))
        .expect("search query");
    let at_maximum = engine
        .search(&SearchRequest::for_keyword("fortress").with_limit(500))
        .expect("search query");
    assert_eq!(overflowed, at_maximum);
}

#[rstest]
fn search_filters_origin_sentinel_entries() {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("catalogue.db");
    let connection = support::create_catalogue(&db_path);
    support::insert_heritage(
        &connection,
        20,
        "Castle Fortress",
        Some("fortress"),
        None,
        Some((0.0, 0.0)),
        None,
        None,
    );
    support::insert_heritage(
        &connection,
        21,
        "Castle Fortress",
        Some("fortress"),
        None,
        Some((35.1, 129.0)),
        None,
        None,
    );
    drop(connection);

    let store = SqliteMarkerStore::open(&db_path).expect("open catalogue");
    let engine = MarkerEngine::new(store);
    let markers = engine
        .search(
            &SearchRequest::for_keyword("castle")
                .with_kind(KindSelector::Heritage)
                .with_limit(5),
        )
        .expect("search query");

    assert_eq!(ids(&markers), vec![21]);
}

#[rstest]
fn search_results_flow_through_the_sanitizer() {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("catalogue.db");
    let connection = support::create_catalogue(&db_path);
    support::insert_museum(
        &connection,
        30,
        "<b>War Memorial</b>",
        Some("<i>history</i>"),
        Some((37.5340, 126.9770)),
        Some("<script>Yongsan</script>"),
        None,
    );
    drop(connection);

    let store = SqliteMarkerStore::open(&db_path).expect("open catalogue");
    let engine = MarkerEngine::new(store);
    let markers = engine
        .search(&SearchRequest::for_keyword("memorial"))
        .expect("search query");

    let marker = markers.first().expect("one marker");
    assert_eq!(marker.name, "War Memorial");
    assert_eq!(marker.address, "Yongsan");
    assert_eq!(marker.category, "history");
}

#[rstest]
fn nearest_heritage_matches_within_the_default_threshold(
    seoul_engine: (TempDir, MarkerEngine<SqliteMarkerStore>),
) {
    let (_dir, engine) = seoul_engine;

    // Standing on the palace: exact hit at distance zero.
    let exact = engine
        .nearest_heritage(&NearestRequest::new(Some(37.5796), Some(126.9770)))
        .expect("nearest query")
        .expect("palace matched");
    assert_eq!(exact.id, 10);
    assert_eq!(exact.distance_meters, 0.0);

    // The art gallery corner is hundreds of metres from every site.
    let none = engine
        .nearest_heritage(&NearestRequest::new(Some(37.5860), Some(127.0000)))
        .expect("nearest query");
    assert_eq!(none, None);
}
