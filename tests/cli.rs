use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Command;

fn write_inputs(dir: &Path) {
    let square = |lon: f64, lat: f64| {
        json!([[
            [lon - 1.0, lat - 1.0],
            [lon + 1.0, lat - 1.0],
            [lon + 1.0, lat + 1.0],
            [lon - 1.0, lat + 1.0],
            [lon - 1.0, lat - 1.0]
        ]])
    };
    let geo = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "iso3166_2": "CA", "google_name": "California (United States)" },
                "geometry": { "type": "Polygon", "coordinates": square(-120.0, 37.0) }
            },
            {
                "type": "Feature",
                "properties": { "iso3166_2": "NV", "google_name": "Nevada (United States)" },
                "geometry": { "type": "Polygon", "coordinates": square(-116.0, 39.0) }
            }
        ]
    });
    fs::write(dir.join("hex.geojson"), geo.to_string()).unwrap();
    fs::write(
        dir.join("bds.csv"),
        "State,Year,Data.Job Creation.Rate\n\
         California,2014,10\nCalifornia,2015,11\nCalifornia,2016,12\n\
         Nevada,2014,7\nNevada,2015,8\nNevada,2016,9\n",
    )
    .unwrap();
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("hexdash").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hexdash"));
}

#[test]
fn lists_attributes_with_descriptions() {
    let mut cmd = Command::cargo_bin("hexdash").unwrap();
    cmd.arg("attributes");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Data.Job Creation.Rate"))
        .stdout(predicate::str::contains("Davis-Haltiwanger-Schuh"));
}

#[test]
fn render_writes_map_and_chart() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("hexdash").unwrap();
    cmd.arg("render")
        .arg("--data")
        .arg(dir.path().join("bds.csv"))
        .arg("--geo")
        .arg(dir.path().join("hex.geojson"))
        .args(["--year", "2015", "--select", "CA,NV", "--out-dir"])
        .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("2 series"));

    let chart = fs::read_to_string(out.join("chart.svg")).unwrap();
    assert!(chart.contains("California"));
    assert!(out.join("map.svg").exists());
}

#[test]
fn render_rejects_year_outside_data() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let mut cmd = Command::cargo_bin("hexdash").unwrap();
    cmd.arg("render")
        .arg("--data")
        .arg(dir.path().join("bds.csv"))
        .arg("--geo")
        .arg(dir.path().join("hex.geojson"))
        .args(["--year", "1990", "--out-dir"])
        .arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("1990"));
}

#[test]
fn play_wraps_around() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let mut cmd = Command::cargo_bin("hexdash").unwrap();
    cmd.arg("play")
        .arg("--data")
        .arg(dir.path().join("bds.csv"))
        .arg("--geo")
        .arg(dir.path().join("hex.geojson"))
        .args(["--from", "2015", "--ticks", "2"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2015  domain=[8, 11]"))
        .stdout(predicate::str::contains("2016  domain=[9, 12]"))
        .stdout(predicate::str::contains("2014  domain=[7, 10]"));
}
