use crate::helpers::{seed_store, spawn_app, MeasurementSeed, SeededStore, TestApp};
use hyper::StatusCode;
use serde_json::json;
use std::{collections::BTreeSet, sync::Arc};
use surfsup::{db::Error, ClimateAccess, ClimateData};
use time::macros::date;

const STATIONS: [&str; 3] = ["USC00519397", "USC00513117", "USC00519281"];

const MEASUREMENTS: [MeasurementSeed<'static>; 8] = [
    ("USC00519397", "2010-01-01", Some(0.08), 65.0),
    ("USC00519397", "2016-08-22", Some(0.5), 74.0),
    ("USC00519397", "2017-08-23", Some(0.0), 81.0),
    ("USC00513117", "2017-08-20", None, 76.0),
    ("USC00519281", "2016-08-17", Some(0.2), 60.0),
    ("USC00519281", "2016-08-18", Some(0.0), 70.0),
    ("USC00519281", "2017-01-01", Some(0.03), 72.0),
    ("USC00519281", "2017-08-18", Some(0.06), 79.0),
];

async fn hawaii_app() -> (SeededStore, TestApp) {
    let store = seed_store(&STATIONS, &MEASUREMENTS).await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();
    let test_app = spawn_app(Arc::new(climate_db)).await;
    (store, test_app)
}

#[tokio::test]
async fn precipitation_covers_year_before_latest_measurement() {
    let (_store, test_app) = hawaii_app().await;

    let (status, body) = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    // latest date is 2017-08-23, so 2016-08-22 and earlier fall outside the window
    assert_eq!(
        body,
        json!({
            "2017-01-01": 0.03,
            "2017-08-18": 0.06,
            "2017-08-20": null,
            "2017-08-23": 0.0
        })
    );
}

#[tokio::test]
async fn stations_lists_every_station_row() {
    let (_store, test_app) = hawaii_app().await;

    let (status, body) = test_app.get("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    let listed: BTreeSet<String> = serde_json::from_value(body).unwrap();
    let expected: BTreeSet<String> = STATIONS.iter().map(|s| s.to_string()).collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn tobs_follow_the_most_active_station() {
    let (_store, test_app) = hawaii_app().await;

    let (status, body) = test_app.get("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    let mut dates: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["date"].as_str().unwrap().to_owned())
        .collect();
    dates.sort();
    // USC00519281's last row is 2017-08-18; 2016-08-17 is older than a year
    assert_eq!(dates, vec!["2016-08-18", "2017-01-01", "2017-08-18"]);
}

#[tokio::test]
async fn stats_from_start_date_aggregate_everything_after() {
    let (_store, test_app) = hawaii_app().await;

    let (status, body) = test_app.get("/api/v1.0/2017-08-18").await;

    assert_eq!(status, StatusCode::OK);
    let row = &body[0];
    assert_eq!(row["min temp"], json!(76.0));
    assert_eq!(row["max temp"], json!(81.0));
    let avg = row["avg temp"].as_f64().unwrap();
    assert!((avg - 236.0 / 3.0).abs() < 1e-9);
    assert!(row["min temp"].as_f64().unwrap() <= avg && avg <= row["max temp"].as_f64().unwrap());
}

#[tokio::test]
async fn stats_after_last_measurement_are_null() {
    let (_store, test_app) = hawaii_app().await;

    let (status, body) = test_app.get("/api/v1.0/2030-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"min temp": null, "avg temp": null, "max temp": null}])
    );
}

#[tokio::test]
async fn range_stats_are_inclusive_of_both_ends() {
    let store = seed_store(
        &["USC00519281"],
        &[
            ("USC00519281", "2017-08-01", Some(0.0), 70.0),
            ("USC00519281", "2017-08-10", Some(0.1), 80.0),
            ("USC00519281", "2017-08-20", None, 75.0),
        ],
    )
    .await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = test_app.get("/api/v1.0/2017-08-05/2017-08-15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"TMIN": 80.0, "TAVG": 80.0, "TMAX": 80.0}]));

    let (_, body) = test_app.get("/api/v1.0/2017-08-10/2017-08-20").await;
    assert_eq!(body, json!([{"TMIN": 75.0, "TAVG": 77.5, "TMAX": 80.0}]));
}

#[tokio::test]
async fn inverted_range_is_an_empty_window() {
    let (_store, test_app) = hawaii_app().await;

    let (status, body) = test_app.get("/api/v1.0/2017-08-23/2016-08-23").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"TMIN": null, "TAVG": null, "TMAX": null}]));
}

#[tokio::test]
async fn empty_store_yields_empty_reports() {
    let store = seed_store(&[], &[]).await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = test_app.get("/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn most_active_ties_go_to_smallest_station_id() {
    let store = seed_store(
        &["USC00519523", "USC00514830"],
        &[
            ("USC00519523", "2017-08-01", None, 77.0),
            ("USC00519523", "2017-08-02", None, 78.0),
            ("USC00514830", "2017-08-01", None, 81.0),
            ("USC00514830", "2017-08-02", None, 82.0),
        ],
    )
    .await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();

    let activity = climate_db.most_active_station().await.unwrap().unwrap();
    assert_eq!(activity.station, "USC00514830");
    assert_eq!(activity.observations, 2);
}

#[tokio::test]
async fn duplicate_station_rows_are_kept() {
    let store = seed_store(&["USC00519281", "USC00519281"], &[]).await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();

    let stations = climate_db.station_ids().await.unwrap();
    assert_eq!(stations, vec!["USC00519281", "USC00519281"]);
}

#[tokio::test]
async fn store_lookups_parse_stored_dates() {
    let store = seed_store(&STATIONS, &MEASUREMENTS).await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();

    assert_eq!(
        climate_db.latest_date().await.unwrap(),
        Some(date!(2017 - 08 - 23))
    );
    assert_eq!(
        climate_db.latest_station_date("USC00513117").await.unwrap(),
        Some(date!(2017 - 08 - 20))
    );
    assert_eq!(climate_db.latest_station_date("USC00000000").await.unwrap(), None);
    climate_db.health_check().await.unwrap();
}

#[tokio::test]
async fn unparseable_stored_dates_are_reported() {
    let store = seed_store(&["USC00519281"], &[("USC00519281", "08/23/2017", None, 70.0)]).await;
    let climate_db = ClimateAccess::new(&store.path).await.unwrap();

    let result = climate_db.latest_date().await;
    assert!(matches!(result, Err(Error::StoredDate { ref value, .. }) if value == "08/23/2017"));

    let test_app = spawn_app(Arc::new(climate_db)).await;
    let (status, _) = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_database_file_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite");

    let result = ClimateAccess::new(&path.to_string_lossy()).await;

    assert!(matches!(result, Err(Error::Unavailable(_))));
    assert!(!path.exists());
}
