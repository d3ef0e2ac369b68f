use hexdash::storage::{self, Dataset, LoadError};
use hexdash::{DashboardConfig, RegionId};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn geojson() -> serde_json::Value {
    let hex = |lon: f64, lat: f64| {
        json!([[
            [lon - 1.0, lat],
            [lon - 0.5, lat + 0.9],
            [lon + 0.5, lat + 0.9],
            [lon + 1.0, lat],
            [lon + 0.5, lat - 0.9],
            [lon - 0.5, lat - 0.9],
            [lon - 1.0, lat]
        ]])
    };
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "iso3166_2": "CA", "google_name": "California (United States)" },
                "geometry": { "type": "Polygon", "coordinates": hex(-120.0, 37.0) }
            },
            {
                "type": "Feature",
                "properties": { "iso3166_2": "HI", "google_name": "Hawaii (United States)" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [hex(-155.0, 19.0), hex(-158.0, 21.0)]
                }
            },
            {
                "type": "Feature",
                "properties": { "iso3166_2": "AZ", "label": "Arizona" },
                "geometry": { "type": "Polygon", "coordinates": hex(-112.0, 34.0) }
            }
        ]
    })
}

const CSV: &str = "\
State,Year,Data.Job Creation.Rate,Data.DHS Denominator
California,2014,11.5,1000
California,2015,12.0,
Hawaii,2015,9.25,300
";

#[test]
fn loads_csv_and_geojson_from_disk() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("bds.csv");
    let geo_path = dir.path().join("hex.geojson");
    fs::write(&csv_path, CSV).unwrap();
    fs::write(&geo_path, geojson().to_string()).unwrap();

    let data = Dataset::open(&csv_path, &geo_path).unwrap();
    assert_eq!(data.records().len(), 3);
    assert_eq!(data.regions().len(), 3);

    let names: Vec<&str> = data.regions().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["California", "Hawaii", "Arizona"]);
    let hi = data.region(&RegionId::from("HI")).unwrap();
    assert_eq!(hi.polygons.len(), 2);

    assert_eq!(data.value("California", 2014, "Data.Job Creation.Rate"), Some(11.5));
    assert_eq!(data.value("California", 2015, "Data.DHS Denominator"), None);
    assert_eq!(data.value("Arizona", 2015, "Data.Job Creation.Rate"), None);
    assert!(data.record("Hawaii", 2014).is_none());
}

#[test]
fn malformed_inputs_are_errors() {
    assert!(matches!(
        storage::read_records_csv("State,Year,A\nOhio,twenty,1\n".as_bytes()),
        Err(LoadError::InvalidYear { row: 1, .. })
    ));
    assert!(matches!(
        storage::read_records_csv("Year,A\n2015,1\n".as_bytes()),
        Err(LoadError::MissingColumn("State"))
    ));
    assert!(matches!(
        storage::read_regions_geojson("{ not json".as_bytes()),
        Err(LoadError::Json(_))
    ));

    let records = storage::read_records_csv(CSV.as_bytes()).unwrap();
    assert!(matches!(
        Dataset::new(records, Vec::new()),
        Err(LoadError::EmptyGeometry)
    ));
}

#[test]
fn config_file_overrides_only_given_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r##"{
            "animation_period_ms": 250,
            "chart": { "width": 800 },
            "colors": { "high": "#102030" },
            "initial_year": 2015
        }"##,
    )
    .unwrap();

    let cfg = DashboardConfig::from_json_file(&path).unwrap();
    let defaults = DashboardConfig::default();
    assert_eq!(cfg.animation_period().as_millis(), 250);
    assert_eq!(cfg.chart.width, 800);
    assert_eq!(cfg.chart.height, defaults.chart.height);
    assert_eq!(cfg.colors.high.to_string(), "#102030");
    assert_eq!(cfg.colors.low, defaults.colors.low);
    assert_eq!(cfg.initial_year, Some(2015));
    assert_eq!(cfg.attributes, defaults.attributes);

    fs::write(&path, r#"{ "colors": { "high": "red" } }"#).unwrap();
    assert!(DashboardConfig::from_json_file(&path).is_err());
}
