use crate::models::{Record, RegionId};
use serde::{Deserialize, Serialize};

/// Numeric `[min, max]` range driving the choropleth color scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorDomain {
    pub min: f64,
    pub max: f64,
}

impl ColorDomain {
    /// Position of `v` within the domain, clamped to `[0, 1]`. A flat domain maps to the midpoint.
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Compute the color domain for `attribute`, either across all years or only
/// the rows of `year`. Missing and non-numeric values are ignored; `None` when
/// no valid value remains.
pub fn color_domain(
    records: &[Record],
    attribute: &str,
    year: i32,
    use_all_years: bool,
) -> Option<ColorDomain> {
    let values = records
        .iter()
        .filter(|r| use_all_years || r.year == year)
        .filter_map(|r| r.value(attribute));
    min_max(values).map(|(min, max)| ColorDomain { min, max })
}

/// `(min, max)` of an iterator of finite values.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Inclusive `(first, last)` year found in the records.
pub fn year_extent(records: &[Record]) -> Option<(i32, i32)> {
    let mut years = records.iter().map(|r| r.year);
    let first = years.next()?;
    Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
}

/// One region's values over time, ascending by year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeries {
    pub region: RegionId,
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

impl TimeSeries {
    pub fn last(&self) -> Option<(i32, f64)> {
        self.points.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the time series of `attribute` for the region whose dataset name is `name`.
/// Rows lacking a numeric value are dropped.
pub fn time_series(records: &[Record], region: &RegionId, name: &str, attribute: &str) -> TimeSeries {
    let mut points: Vec<(i32, f64)> = records
        .iter()
        .filter(|r| r.state == name)
        .filter_map(|r| r.value(attribute).map(|v| (r.year, v)))
        .collect();
    points.sort_by_key(|(y, _)| *y);
    TimeSeries {
        region: region.clone(),
        name: name.to_string(),
        points,
    }
}
