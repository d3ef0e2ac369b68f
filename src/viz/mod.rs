//! Visualization models: scales, colors, and the frames each view renders.
//!
//! - d3-style linear scales (`nice`, `ticks`, `invert`)
//! - Sequential two-color choropleth scale with a neutral no-data color
//! - Builders for the map fills, the line chart frame and the label anchors
//! - `scene`: a recording render port; `svg`: plotters export of a recorded scene

pub mod legend;
pub mod scene;
pub mod svg;
pub mod text;
pub mod types;
pub mod util;

pub use legend::build_legend;
pub use scene::{RenderCall, Scene, SceneRecorder};
pub use text::{EstimatedMetrics, FixedMetrics, TextMetrics};
pub use types::{
    ChartFrame, ChartView, LegendFrame, PlacedLabel, RegionFill, SeriesLine, Tick, YearMarker,
};

use crate::config::{ChartConfig, ColorConfig, LabelConfig};
use crate::geo::{Point, ProjectedRegion};
use crate::layout::LabelBox;
use crate::models::{attribute_axis_label, is_known_no_data, RegionId};
use crate::stats::{min_max, ColorDomain, TimeSeries};
use crate::storage::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use util::{format_tick, map_locale, series_color};

/// Opaque 8-bit RGB color; (de)serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation in RGB space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got `{s}`"));
        }
        let chan = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self::new(chan(0)?, chan(2)?, chan(4)?))
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        c.to_string()
    }
}

/// Sequential scale from `low` to `high` over a color domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub domain: ColorDomain,
    pub low: Rgb8,
    pub high: Rgb8,
}

impl ColorScale {
    pub fn color(&self, v: f64) -> Rgb8 {
        self.low.lerp(self.high, self.domain.normalize(v))
    }
}

/// Continuous linear mapping from a numeric domain to a pixel range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if (d1 - d0).abs() < f64::EPSILON {
            0.5
        } else {
            (v - d0) / (d1 - d0)
        };
        r0 + t * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if (r1 - r0).abs() < f64::EPSILON {
            0.5
        } else {
            (px - r0) / (r1 - r0)
        };
        d0 + t * (d1 - d0)
    }

    pub fn domain_sorted(&self) -> (f64, f64) {
        let (a, b) = self.domain;
        (a.min(b), a.max(b))
    }

    /// Extend the domain outward to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prestep = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep || !step.is_finite() || step == 0.0 {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            prestep = step;
        }
        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Roughly `count` round values spanning the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain_sorted();
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let inc = tick_increment(start, stop, count);
        if inc == 0.0 || !inc.is_finite() {
            return Vec::new();
        }
        if inc > 0.0 {
            let (i0, i1) = ((start / inc).ceil() as i64, (stop / inc).floor() as i64);
            (i0..=i1).map(|i| i as f64 * inc).collect()
        } else {
            let inc = -inc;
            let (i0, i1) = ((start * inc).ceil() as i64, (stop * inc).floor() as i64);
            (i0..=i1).map(|i| i as f64 / inc).collect()
        }
    }
}

/// Resolve every region's fill for the current attribute and year.
pub fn build_region_fills(
    dataset: &Dataset,
    regions: &[ProjectedRegion],
    attribute: &str,
    year: i32,
    domain: Option<ColorDomain>,
    selection: &BTreeSet<RegionId>,
    colors: &ColorConfig,
) -> Vec<RegionFill> {
    let scale = domain.map(|domain| ColorScale {
        domain,
        low: colors.low,
        high: colors.high,
    });
    regions
        .iter()
        .map(|r| {
            let value = dataset.value(&r.name, year, attribute);
            let color = match (value, scale) {
                (Some(v), Some(s)) => s.color(v),
                _ => {
                    if is_known_no_data(&r.name) {
                        log::trace!("no data for {} in {}", r.name, year);
                    } else {
                        log::debug!(
                            "could not find {} for state {} and year {}",
                            attribute,
                            r.name,
                            year
                        );
                    }
                    colors.no_data
                }
            };
            RegionFill {
                id: r.id.clone(),
                name: r.name.clone(),
                outlines: r.outlines.clone(),
                centroid: r.centroid,
                value,
                color,
                selected: selection.contains(&r.id),
            }
        })
        .collect()
}

/// Build the line chart for the selected series. `year_domain` is the full
/// year extent of the dataset.
pub fn build_chart(
    series: &[TimeSeries],
    attribute: &str,
    year: i32,
    year_domain: (i32, i32),
    cfg: &ChartConfig,
    locale_tag: &str,
) -> ChartFrame {
    let (w, h) = (cfg.inner_width(), cfg.inner_height());
    let (mut y0, mut y1) = (f64::from(year_domain.0), f64::from(year_domain.1));
    if y0 == y1 {
        y0 -= 1.0;
        y1 += 1.0;
    }
    let x_scale = LinearScale::new((y0, y1), (0.0, w));

    let (mut lo, mut hi) =
        min_max(series.iter().flat_map(|s| s.points.iter().map(|(_, v)| *v))).unwrap_or((0.0, 1.0));
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let y_scale = LinearScale::new((lo, hi), (h, 0.0)).nice(cfg.y_ticks);

    let locale = map_locale(locale_tag);
    let x_ticks = x_scale
        .ticks(cfg.x_ticks)
        .into_iter()
        .filter(|v| v.fract() == 0.0)
        .map(|v| Tick {
            pos: x_scale.apply(v),
            label: format!("{}", v as i64),
        })
        .collect();
    let y_ticks = y_scale
        .ticks(cfg.y_ticks)
        .into_iter()
        .map(|v| Tick {
            pos: y_scale.apply(v),
            label: format_tick(v, locale),
        })
        .collect();

    let lines = series
        .iter()
        .enumerate()
        .map(|(i, s)| SeriesLine {
            region: s.region.clone(),
            name: s.name.clone(),
            color: series_color(i),
            data: s.points.clone(),
            points: s
                .points
                .iter()
                .map(|&(yr, v)| Point::new(x_scale.apply(f64::from(yr)), y_scale.apply(v)))
                .collect(),
        })
        .collect();

    ChartFrame {
        attribute: attribute.to_string(),
        year,
        width: w,
        height: h,
        margin: cfg.margin,
        x_scale,
        y_scale,
        x_ticks,
        y_ticks,
        x_label: "Year".to_string(),
        y_label: attribute_axis_label(attribute),
        series: lines,
    }
}

/// Marker for `year` on a built chart.
pub fn year_marker(frame: &ChartFrame) -> YearMarker {
    YearMarker {
        year: frame.year,
        x: frame.x_scale.apply(f64::from(frame.year)),
        y1: 0.0,
        y2: frame.height - 5.0,
    }
}

/// Label anchors at each series' last point.
pub fn label_anchors(frame: &ChartFrame, cfg: &LabelConfig) -> Vec<LabelBox> {
    frame
        .series
        .iter()
        .filter_map(|s| {
            let last = s.points.last()?;
            Some(LabelBox::anchored(
                s.name.clone(),
                last.x + cfg.x_offset,
                last.y,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_rounds_outward() {
        let s = LinearScale::new((0.13, 9.7), (100.0, 0.0)).nice(10);
        assert_eq!(s.domain, (0.0, 10.0));
        let s = LinearScale::new((12.3, 87.1), (0.0, 1.0)).nice(10);
        assert_eq!(s.domain, (10.0, 90.0));
    }

    #[test]
    fn ticks_and_invert() {
        let s = LinearScale::new((2010.0, 2020.0), (0.0, 500.0));
        assert_eq!(s.ticks(5), vec![2010.0, 2012.0, 2014.0, 2016.0, 2018.0, 2020.0]);
        assert_eq!(s.apply(2015.0), 250.0);
        assert_eq!(s.invert(250.0), 2015.0);
    }

    #[test]
    fn rgb_parses_and_prints() {
        let c: Rgb8 = "#da7756".parse().unwrap();
        assert_eq!(c, Rgb8::new(0xda, 0x77, 0x56));
        assert_eq!(c.to_string(), "#da7756");
        assert!("#12".parse::<Rgb8>().is_err());
        let mid = Rgb8::new(0, 0, 0).lerp(Rgb8::new(200, 100, 50), 0.5);
        assert_eq!(mid, Rgb8::new(100, 50, 25));
    }
}
