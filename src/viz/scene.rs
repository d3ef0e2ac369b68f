//! A render port that keeps what it was last asked to draw.
//!
//! The GUI paints from the recorded [`Scene`] every frame, the SVG exporter
//! writes it to disk, and tests inspect both the scene and the call log.

use super::text::{EstimatedMetrics, TextMetrics};
use super::types::{ChartView, LegendFrame, PlacedLabel, RegionFill, YearMarker};
use crate::dispatch::RenderPort;
use crate::geo::Point;

/// Which port method ran, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCall {
    Regions,
    Legend,
    Chart,
    YearMarker,
    Labels,
    Lasso,
}

/// Latest output of every view.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub regions: Vec<RegionFill>,
    pub legend: Option<LegendFrame>,
    pub chart: Option<ChartView>,
    pub year_marker: Option<YearMarker>,
    pub labels: Vec<PlacedLabel>,
    pub lasso: Vec<Point>,
}

#[derive(Debug, Default)]
pub struct SceneRecorder<M: TextMetrics = EstimatedMetrics> {
    pub scene: Scene,
    calls: Vec<RenderCall>,
    metrics: M,
}

impl<M: TextMetrics> SceneRecorder<M> {
    pub fn new(metrics: M) -> Self {
        Self {
            scene: Scene::default(),
            calls: Vec::new(),
            metrics,
        }
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Drain the call log, leaving the scene untouched.
    pub fn take_calls(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut M {
        &mut self.metrics
    }
}

impl<M: TextMetrics> RenderPort for SceneRecorder<M> {
    fn render_regions(&mut self, regions: &[RegionFill]) {
        self.calls.push(RenderCall::Regions);
        self.scene.regions = regions.to_vec();
    }

    fn render_legend(&mut self, legend: &LegendFrame) {
        self.calls.push(RenderCall::Legend);
        self.scene.legend = Some(legend.clone());
    }

    fn render_chart(&mut self, chart: &ChartView) {
        self.calls.push(RenderCall::Chart);
        self.scene.chart = Some(chart.clone());
        // A fresh chart starts without marker or labels.
        self.scene.year_marker = None;
        self.scene.labels.clear();
    }

    fn render_year_marker(&mut self, marker: &YearMarker) {
        self.calls.push(RenderCall::YearMarker);
        self.scene.year_marker = Some(*marker);
    }

    fn label_width(&self, text: &str, font_px: f64) -> f64 {
        self.metrics.text_width(text, font_px)
    }

    fn render_labels(&mut self, labels: &[PlacedLabel]) {
        self.calls.push(RenderCall::Labels);
        self.scene.labels = labels.to_vec();
    }

    fn clear_lasso(&mut self) {
        self.calls.push(RenderCall::Lasso);
        self.scene.lasso.clear();
    }

    fn extend_lasso(&mut self, p: Point) {
        self.calls.push(RenderCall::Lasso);
        self.scene.lasso.push(p);
    }
}
