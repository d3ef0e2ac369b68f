//! Loading of the two external inputs: the tabular dataset (CSV) and the
//! hex-grid region geometry (GeoJSON). Both are read once at startup and are
//! immutable afterwards.

use crate::models::{normalize_region_name, LonLat, Record, Region, RegionId};
use ahash::AHashMap;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Why an input could not be loaded. Any of these keeps the dashboard in its
/// pre-load empty state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid year `{value}`")]
    InvalidYear { row: usize, value: String },
    #[error("dataset contains no records")]
    EmptyDataset,
    #[error("geometry contains no regions")]
    EmptyGeometry,
}

/// Records plus region geometry, with a `(State, Year)` lookup index.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    regions: Vec<Region>,
    index: AHashMap<(String, i32), usize>,
}

impl Dataset {
    /// Assemble a dataset. Fails if either input is empty so that nothing is
    /// ever rendered from a partial load.
    pub fn new(records: Vec<Record>, regions: Vec<Region>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::EmptyDataset);
        }
        if regions.is_empty() {
            return Err(LoadError::EmptyGeometry);
        }
        let mut index = AHashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            // First row wins on duplicates.
            index.entry((r.state.clone(), r.year)).or_insert(i);
        }
        log::info!(
            "dataset ready: {} records, {} regions",
            records.len(),
            regions.len()
        );
        Ok(Self {
            records,
            regions,
            index,
        })
    }

    /// Load both inputs from disk.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(csv_path: P, geo_path: Q) -> Result<Self, LoadError> {
        let records = load_records_csv(csv_path)?;
        let regions = load_regions_geojson(geo_path)?;
        Self::new(records, regions)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn record(&self, state: &str, year: i32) -> Option<&Record> {
        self.index
            .get(&(state.to_string(), year))
            .map(|&i| &self.records[i])
    }

    /// Value of `attribute` for `state` in `year`, if a numeric one exists.
    pub fn value(&self, state: &str, year: i32, attribute: &str) -> Option<f64> {
        self.record(state, year).and_then(|r| r.value(attribute))
    }

    pub fn region(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }
}

fn open_file(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load the business-dynamics CSV from a path.
pub fn load_records_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, LoadError> {
    let file = open_file(path.as_ref())?;
    read_records_csv(BufReader::new(file))
}

/// Parse CSV rows with a `State` column, a `Year` column and any number of
/// attribute columns. Empty or non-numeric attribute cells are skipped.
pub fn read_records_csv<R: Read>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let state_col = headers
        .iter()
        .position(|h| h == "State")
        .ok_or(LoadError::MissingColumn("State"))?;
    let year_col = headers
        .iter()
        .position(|h| h == "Year")
        .ok_or(LoadError::MissingColumn("Year"))?;

    let mut out = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let rec = result?;
        let state = rec.get(state_col).unwrap_or_default();
        let year_raw = rec.get(year_col).unwrap_or_default();
        let year = parse_year(year_raw).ok_or_else(|| LoadError::InvalidYear {
            row: row + 1,
            value: year_raw.to_string(),
        })?;
        let mut record = Record::new(state, year);
        for (col, cell) in rec.iter().enumerate() {
            if col == state_col || col == year_col {
                continue;
            }
            if let Ok(v) = cell.parse::<f64>()
                && v.is_finite()
            {
                record.values.insert(headers[col].to_string(), v);
            }
        }
        out.push(record);
    }
    log::debug!("parsed {} CSV rows", out.len());
    Ok(out)
}

fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f.is_finite()).then_some(f as i32)
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProps,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct FeatureProps {
    iso3166_2: String,
    #[serde(default)]
    google_name: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

fn to_rings(poly: Vec<Vec<[f64; 2]>>) -> Vec<Vec<LonLat>> {
    poly.into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|[lon, lat]| LonLat { lon, lat })
                .collect()
        })
        .collect()
}

/// Load the hex-grid GeoJSON from a path.
pub fn load_regions_geojson<P: AsRef<Path>>(path: P) -> Result<Vec<Region>, LoadError> {
    let file = open_file(path.as_ref())?;
    read_regions_geojson(BufReader::new(file))
}

/// Parse a GeoJSON `FeatureCollection` whose features carry `iso3166_2` and
/// `google_name` properties. Names are normalized to match dataset `State`s.
pub fn read_regions_geojson<R: Read>(reader: R) -> Result<Vec<Region>, LoadError> {
    let fc: FeatureCollection = serde_json::from_reader(reader)?;
    let regions: Vec<Region> = fc
        .features
        .into_iter()
        .map(|f| {
            let name = match (f.properties.google_name, f.properties.label) {
                (Some(g), _) => normalize_region_name(&g),
                (None, Some(l)) => l,
                (None, None) => f.properties.iso3166_2.clone(),
            };
            let polygons = match f.geometry {
                Geometry::Polygon(p) => vec![to_rings(p)],
                Geometry::MultiPolygon(ps) => ps.into_iter().map(to_rings).collect(),
            };
            Region {
                id: RegionId::new(f.properties.iso3166_2),
                name,
                polygons,
            }
        })
        .collect();
    log::debug!("parsed {} GeoJSON features", regions.len());
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn csv_skips_blank_and_text_cells() {
        let csv = "State,Year,Data.Job Creation.Rate,Data.DHS Denominator,Note\n\
                   California,2015,12.5,,n/a\n\
                   Ohio,2015.0,9.0,1000,x\n";
        let recs = read_records_csv(csv.as_bytes()).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].value("Data.Job Creation.Rate"), Some(12.5));
        assert_eq!(recs[0].value("Data.DHS Denominator"), None);
        assert!(!recs[0].values.contains_key("Note"));
        assert_eq!(recs[1].year, 2015);
    }

    #[test]
    fn missing_year_column_is_reported() {
        let err = read_records_csv("State,Value\nOhio,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Year")));
    }

    #[test]
    fn open_reports_missing_file_and_empty_inputs() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("data.csv");
        let geop = dir.path().join("geo.json");
        assert!(matches!(
            Dataset::open(&csvp, &geop),
            Err(LoadError::Io { .. })
        ));

        File::create(&csvp)
            .unwrap()
            .write_all(b"State,Year,A\n")
            .unwrap();
        File::create(&geop)
            .unwrap()
            .write_all(br#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap();
        assert!(matches!(
            Dataset::open(&csvp, &geop),
            Err(LoadError::EmptyDataset)
        ));
    }
}
