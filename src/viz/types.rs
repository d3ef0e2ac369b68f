//! View models handed to render ports. Each is a complete description of
//! what a view should show after one dispatch; renderers never look back at
//! the view state.

use serde::Serialize;

use super::{LinearScale, Rgb8};
use crate::config::Margin;
use crate::geo::Point;
use crate::models::RegionId;
use crate::stats::ColorDomain;

/// One hex on the map with its resolved fill.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegionFill {
    pub id: RegionId,
    pub name: String,
    pub outlines: Vec<Vec<Point>>,
    pub centroid: Point,
    /// `None` renders with the no-data color.
    pub value: Option<f64>,
    pub color: Rgb8,
    pub selected: bool,
}

/// An axis tick: pixel position along the axis and its label.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tick {
    pub pos: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegendFrame {
    /// `None` when no valid value exists for the current controls.
    pub domain: Option<ColorDomain>,
    pub width: f64,
    pub height: f64,
    /// Gradient stops as `(offset in [0, 1], color)`.
    pub stops: Vec<(f64, Rgb8)>,
    pub ticks: Vec<Tick>,
    /// Gradient bar rectangle: x, y, width, height.
    pub bar: [f64; 4],
}

/// A drawn series: data plus its points in chart-inner coordinates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesLine {
    pub region: RegionId,
    pub name: String,
    pub color: Rgb8,
    pub data: Vec<(i32, f64)>,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartFrame {
    pub attribute: String,
    pub year: i32,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesLine>,
}

impl ChartFrame {
    /// Year under a horizontal position in chart-inner coordinates, clamped
    /// to the x domain.
    pub fn year_at(&self, x: f64) -> i32 {
        let y = self.x_scale.invert(x).round();
        let (lo, hi) = self.x_scale.domain_sorted();
        y.clamp(lo.ceil(), hi.floor()) as i32
    }
}

/// What the line chart shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum ChartView {
    /// Nothing selected: a message instead of axes and lines.
    Placeholder { message: String, at: Point },
    Lines(ChartFrame),
}

impl ChartView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    pub fn frame(&self) -> Option<&ChartFrame> {
        match self {
            Self::Lines(f) => Some(f),
            Self::Placeholder { .. } => None,
        }
    }
}

/// Dashed vertical line marking the current year.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct YearMarker {
    pub year: i32,
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

/// A series label after layout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlacedLabel {
    pub region: RegionId,
    pub text: String,
    pub color: Rgb8,
    pub anchor: Point,
    pub at: Point,
}
