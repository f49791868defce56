//! End-to-end: load data and cache files, resolve through a mock Nominatim,
//! rank the result.

use std::fs;

use indicatif::ProgressBar;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dropoff::geocoder::{NominatimConfig, NominatimGeocoder};
use dropoff::ranking::{rank, HaversineCalc, DEFAULT_LIMIT};
use dropoff::resolve::{resolve_all, ResolveOptions, ResolveSummary};
use dropoff::store::{load_points, CacheStore, RecordFormat};
use dropoff::Geolocation;

const DATA: &str = r#"[
    {"city": "תל אביב", "street": "דיזנגוף", "house": 50, "addressdesc": "בקניון", "branchname": "דיזנגוף סנטר"},
    {"city": "רמת גן", "street": "ז'בוטינסקי", "house": "1", "addressdesc": "", "branchname": "בורסה"},
    {"city": "ירושלים", "street": "רח' יפו", "house": 97, "addressdesc": "", "branchname": "מחנה יהודה"},
    {"city": "אילת", "street": "ראשי", "house": 1, "addressdesc": "", "branchname": "אילת"}
]"#;

async fn mock_city(server: &MockServer, city: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("city", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolves_missing_points_and_ranks() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("points.json");
    let cache_path = dir.path().join("points meta.csv");
    fs::write(&data, DATA).unwrap();
    fs::write(
        &cache_path,
        "city,street,house,addressdesc,branchname,geolocation\n\
         תל אביב,דיזנגוף,50,בקניון,דיזנגוף סנטר,\"32.0775, 34.774\"\n",
    )
    .unwrap();

    let server = MockServer::start().await;
    mock_city(&server, "רמת גן", json!([{"lat": "32.0840", "lon": "34.8030"}])).await;
    mock_city(&server, "ירושלים", json!([{"lat": "31.7850", "lon": "35.2120"}])).await;
    mock_city(&server, "אילת", json!([])).await;

    let mut cache = CacheStore::new(&cache_path).unwrap();
    let mut points = load_points(&data, &cache).unwrap();
    assert_eq!(points.len(), 4);

    let geocoder = NominatimGeocoder::new(NominatimConfig::new(server.uri())).unwrap();
    let summary = resolve_all(
        &mut points,
        &geocoder,
        &mut cache,
        &ResolveOptions::default(),
        &ProgressBar::hidden(),
    )
    .await
    .unwrap();

    assert_eq!(
        summary,
        ResolveSummary {
            resolved: 2,
            failed: 1,
            skipped: 1
        }
    );

    // The cache now holds the whole working set, unresolved points included.
    let records = RecordFormat::Csv.load(&cache_path).unwrap();
    assert_eq!(records.len(), 4);
    let eilat = records.iter().find(|r| r.city == "אילת").unwrap();
    assert_eq!(eilat.geolocation, None);
    let jerusalem = records.iter().find(|r| r.city == "ירושלים").unwrap();
    assert_eq!(jerusalem.geolocation.as_deref(), Some("31.785, 35.212"));

    // Reloading picks everything up from the cache without new lookups.
    let reloaded = load_points(&data, &cache).unwrap();
    assert_eq!(reloaded.iter().filter(|p| p.is_resolved()).count(), 3);

    let reference = Geolocation::new(32.08, 34.78);
    let ranked = rank(reference, &reloaded, &HaversineCalc, DEFAULT_LIMIT);
    let branches: Vec<&str> = ranked.iter().map(|r| r.point.branch_name.as_str()).collect();
    assert_eq!(branches, ["דיזנגוף סנטר", "בורסה", "מחנה יהודה"]);
}
