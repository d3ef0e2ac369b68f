//! Dashboard configuration. Every field has a default, so a JSON file only
//! needs the values it wants to change.

use crate::geo::Projection;
use crate::layout::LabelLayoutConfig;
use crate::models::{catalog_attributes, DEFAULT_ATTRIBUTE};
use crate::state::YearBounds;
use crate::viz::Rgb8;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub width: u32,
    pub height: u32,
    pub projection: Projection,
    /// Font size of the region abbreviations.
    pub label_font_px: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            projection: Projection::default(),
            label_font_px: 11.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub x_ticks: usize,
    pub y_ticks: usize,
    pub placeholder: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 420,
            margin: Margin {
                top: 20.0,
                right: 20.0,
                bottom: 50.0,
                left: 60.0,
            },
            x_ticks: 10,
            y_ticks: 10,
            placeholder: "No States Selected :(".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn inner_width(&self) -> f64 {
        (f64::from(self.width) - self.margin.left - self.margin.right).max(1.0)
    }

    pub fn inner_height(&self) -> f64 {
        (f64::from(self.height) - self.margin.top - self.margin.bottom).max(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LegendConfig {
    pub width: u32,
    pub height: u32,
    pub stops: usize,
    pub ticks: usize,
    /// Locale tag for tick labels ("en", "de", ...).
    pub locale: String,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            width: 350,
            height: 50,
            stops: 10,
            ticks: 5,
            locale: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub font_px: f64,
    /// Gap between a line's last point and its label anchor.
    pub x_offset: f64,
    pub layout: LabelLayoutConfig,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_px: 8.0,
            x_offset: 5.0,
            layout: LabelLayoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub low: Rgb8,
    pub high: Rgb8,
    pub no_data: Rgb8,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            low: Rgb8::new(0xf8, 0xf0, 0xe7),
            high: Rgb8::new(0xda, 0x77, 0x56),
            no_data: Rgb8::new(128, 128, 128),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub map: MapConfig,
    pub chart: ChartConfig,
    pub legend: LegendConfig,
    pub labels: LabelConfig,
    pub colors: ColorConfig,
    pub animation_period_ms: u64,
    /// Attributes offered by the selector.
    pub attributes: Vec<String>,
    pub initial_attribute: String,
    /// Starting year; defaults to the last year of the bounds.
    pub initial_year: Option<i32>,
    /// Slider range; defaults to the dataset's year extent.
    pub year_bounds: Option<YearBounds>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            chart: ChartConfig::default(),
            legend: LegendConfig::default(),
            labels: LabelConfig::default(),
            colors: ColorConfig::default(),
            animation_period_ms: 500,
            attributes: catalog_attributes(),
            initial_attribute: DEFAULT_ATTRIBUTE.to_string(),
            initial_year: None,
            year_bounds: None,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let cfg = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    pub fn animation_period(&self) -> Duration {
        Duration::from_millis(self.animation_period_ms)
    }
}
