use hexdash::viz::svg;
use hexdash::viz::{EstimatedMetrics, SceneRecorder};
use hexdash::{Dashboard, DashboardConfig, Dataset, LonLat, Record, Region, RegionId};
use std::collections::BTreeSet;
use std::fs;

fn dashboard() -> Dashboard<SceneRecorder> {
    let tri = |lon: f64, lat: f64| {
        vec![
            LonLat { lon: lon - 1.0, lat: lat - 1.0 },
            LonLat { lon: lon + 1.0, lat: lat - 1.0 },
            LonLat { lon, lat: lat + 1.0 },
        ]
    };
    let regions = vec![
        Region::with_ring("TX", "Texas", tri(-99.0, 31.0)),
        Region::with_ring("FL", "Florida", tri(-82.0, 28.0)),
    ];
    let records = (2010..=2013)
        .flat_map(|y| {
            let d = f64::from(y - 2010);
            [
                Record::new("Texas", y).with("Data.Job Creation.Rate", 14.0 + d),
                Record::new("Florida", y).with("Data.Job Creation.Rate", 12.0 - d),
            ]
        })
        .collect();
    let mut dash = Dashboard::new(
        Dataset::new(records, regions).unwrap(),
        DashboardConfig::default(),
        SceneRecorder::new(EstimatedMetrics),
    )
    .unwrap();
    dash.dispatch_render();
    dash
}

#[test]
fn map_svg_has_every_region_and_the_legend() {
    let dash = dashboard();
    let svg = svg::map_svg_string(&dash.port().scene, dash.config()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">TX<"));
    assert!(svg.contains(">FL<"));
    assert!(svg.contains("<polygon"));
}

#[test]
fn chart_svg_shows_placeholder_then_lines() {
    let mut dash = dashboard();
    let svg = svg::chart_svg_string(&dash.port().scene, dash.config()).unwrap();
    assert!(svg.contains("No States Selected"));

    let both: BTreeSet<RegionId> = ["TX", "FL"].into_iter().map(RegionId::from).collect();
    dash.set_selection(both).unwrap();
    let svg = svg::chart_svg_string(&dash.port().scene, dash.config()).unwrap();
    assert!(!svg.contains("No States Selected"));
    assert!(svg.contains(">Texas<"));
    assert!(svg.contains(">Florida<"));
    assert!(svg.contains(">Job Creation Rate<"));
}

#[test]
fn writes_both_files() {
    let mut dash = dashboard();
    dash.set_selection(["TX"].into_iter().map(RegionId::from).collect())
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let map = dir.path().join("map.svg");
    let chart = dir.path().join("chart.svg");
    svg::write_map_svg(&dash.port().scene, dash.config(), &map).unwrap();
    svg::write_chart_svg(&dash.port().scene, dash.config(), &chart).unwrap();
    assert!(fs::metadata(&map).unwrap().len() > 0);
    assert!(fs::metadata(&chart).unwrap().len() > 0);
}
