//! The dashboard: owner of the view state, the dataset and the render port,
//! and the single place where state changes turn into renders.
//!
//! Every mutation that actually changes a field calls [`Dashboard::dispatch_render`]
//! exactly once before returning, so a caller that reads the port right
//! after a setter always sees output for the new state. Dispatch renders the
//! views in a fixed order: map fills, legend, line chart, year marker, labels.
//!
//! All methods take `&mut self` and ports hold no handle back to the
//! dashboard, so dispatch can neither overlap nor re-enter. Hosts that share a
//! dashboard across threads must put it behind a `Mutex`.

use crate::animation::{AnimationDriver, Clock};
use crate::config::DashboardConfig;
use crate::geo::{Point, ProjectedRegion};
use crate::lasso::{select_regions, LassoSelector};
use crate::layout::layout;
use crate::models::RegionId;
use crate::state::{ControlError, ViewState, YearBounds};
use crate::stats::{color_domain, time_series, year_extent, ColorDomain, TimeSeries};
use crate::storage::{Dataset, LoadError};
use crate::viz::{
    build_chart, build_legend, build_region_fills, label_anchors, year_marker, ChartFrame,
    ChartView, LegendFrame, PlacedLabel, RegionFill, YearMarker,
};
use std::collections::BTreeSet;
use thiserror::Error;

/// Output side of the dashboard. Implementations draw (or record) what they
/// are given and must not call back into the dashboard.
pub trait RenderPort {
    fn render_regions(&mut self, regions: &[RegionFill]);
    fn render_legend(&mut self, legend: &LegendFrame);
    fn render_chart(&mut self, chart: &ChartView);
    fn render_year_marker(&mut self, marker: &YearMarker);
    /// Rendered width of a chart label, used by the label layout.
    fn label_width(&self, text: &str, font_px: f64) -> f64;
    fn render_labels(&mut self, labels: &[PlacedLabel]);
    /// Drop the lasso outline.
    fn clear_lasso(&mut self);
    /// Append one point to the lasso outline being drawn.
    fn extend_lasso(&mut self, p: Point);
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid initial controls: {0}")]
    Control(#[from] ControlError),
}

/// Summary of one dispatch, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub sequence: u64,
    pub attribute: String,
    pub year: i32,
    pub domain: Option<ColorDomain>,
    pub series: usize,
    pub placeholder: bool,
    pub layout_iterations: usize,
    pub layout_converged: bool,
}

pub struct Dashboard<P: RenderPort> {
    dataset: Dataset,
    regions: Vec<ProjectedRegion>,
    config: DashboardConfig,
    bounds: YearBounds,
    year_domain: (i32, i32),
    state: ViewState,
    lasso: LassoSelector,
    chart: Option<ChartFrame>,
    last: Option<DispatchReport>,
    dispatches: u64,
    port: P,
}

impl<P: RenderPort> std::fmt::Debug for Dashboard<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("dispatches", &self.dispatches)
            .finish_non_exhaustive()
    }
}

impl<P: RenderPort> Dashboard<P> {
    /// Build a dashboard over a loaded dataset. Nothing is rendered until the
    /// first [`Dashboard::dispatch_render`].
    pub fn new(dataset: Dataset, config: DashboardConfig, port: P) -> Result<Self, DashboardError> {
        let year_domain = year_extent(dataset.records()).ok_or(LoadError::EmptyDataset)?;
        let bounds = config
            .year_bounds
            .unwrap_or_else(|| YearBounds::new(year_domain.0, year_domain.1));
        if !config.attributes.contains(&config.initial_attribute) {
            return Err(ControlError::UnknownAttribute(config.initial_attribute.clone()).into());
        }
        let year = bounds.check(config.initial_year.unwrap_or(bounds.max))?;
        let projection = config.map.projection;
        let regions = dataset
            .regions()
            .iter()
            .map(|r| ProjectedRegion::project(r, &projection))
            .collect();
        Ok(Self {
            state: ViewState::new(config.initial_attribute.clone(), year),
            dataset,
            regions,
            config,
            bounds,
            year_domain,
            lasso: LassoSelector::default(),
            chart: None,
            last: None,
            dispatches: 0,
            port,
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn bounds(&self) -> YearBounds {
        self.bounds
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn regions(&self) -> &[ProjectedRegion] {
        &self.regions
    }

    pub fn attributes(&self) -> &[String] {
        &self.config.attributes
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Number of dispatches run so far.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches
    }

    pub fn last_report(&self) -> Option<&DispatchReport> {
        self.last.as_ref()
    }

    pub fn lasso_path(&self) -> &[Point] {
        self.lasso.path()
    }

    pub fn set_attribute(&mut self, name: &str) -> Result<bool, ControlError> {
        if !self.config.attributes.iter().any(|a| a == name) {
            return Err(ControlError::UnknownAttribute(name.to_string()));
        }
        if self.state.attribute == name {
            return Ok(false);
        }
        self.state.attribute = name.to_string();
        self.dispatch_render();
        Ok(true)
    }

    pub fn set_year(&mut self, year: i32) -> Result<bool, ControlError> {
        let year = self.bounds.check(year)?;
        if self.state.year == year {
            return Ok(false);
        }
        self.state.year = year;
        self.dispatch_render();
        Ok(true)
    }

    /// `true` colors by the extent over all years, `false` by the current year only.
    pub fn set_scale_mode(&mut self, use_all_years: bool) -> bool {
        if self.state.use_all_years == use_all_years {
            return false;
        }
        self.state.use_all_years = use_all_years;
        self.dispatch_render();
        true
    }

    pub fn set_selection(&mut self, selection: BTreeSet<RegionId>) -> Result<bool, ControlError> {
        if let Some(unknown) = selection
            .iter()
            .find(|id| !self.regions.iter().any(|r| &r.id == *id))
        {
            return Err(ControlError::UnknownRegion(unknown.clone()));
        }
        Ok(self.replace_selection(selection))
    }

    fn replace_selection(&mut self, selection: BTreeSet<RegionId>) -> bool {
        if self.state.selection == selection {
            return false;
        }
        self.state.selection = selection;
        self.dispatch_render();
        true
    }

    /// One animation step: next year, wrapping to the first after the last.
    pub fn advance_year(&mut self) -> i32 {
        let next = self.bounds.next(self.state.year);
        if next != self.state.year {
            self.state.year = next;
            log::debug!("animation tick -> {}", next);
            self.dispatch_render();
        }
        next
    }

    /// Apply every tick the driver has due. However many ticks piled up, the
    /// year moves once (wrapping as needed) and at most one dispatch runs.
    /// Returns the number of ticks consumed.
    pub fn pump_animation<C: Clock>(&mut self, driver: &mut AnimationDriver<C>) -> u32 {
        let n = driver.poll();
        if n == 0 {
            return 0;
        }
        let next = self.bounds.advance(self.state.year, n);
        if n > 1 {
            log::debug!("{} animation ticks due at once, jumping to {}", n, next);
        }
        if next != self.state.year {
            self.state.year = next;
            self.dispatch_render();
        }
        n
    }

    /// Click on the chart at horizontal position `x` (chart-inner pixels).
    /// Returns the year applied, or `None` while the placeholder is shown.
    pub fn select_year_at(&mut self, x: f64) -> Option<i32> {
        let year = self.bounds.clamp(self.chart.as_ref()?.year_at(x));
        self.set_year(year).ok()?;
        Some(year)
    }

    /// Pointer pressed on the map: start a new lasso. The current selection
    /// is cleared and remembered so [`Dashboard::lasso_cancel`] can restore it.
    pub fn lasso_start(&mut self) {
        self.lasso.start(self.state.selection.clone());
        self.port.clear_lasso();
        self.replace_selection(BTreeSet::new());
    }

    pub fn lasso_move(&mut self, p: Point) {
        if self.lasso.push(p).is_some() {
            self.port.extend_lasso(p);
        }
    }

    /// Pointer released: select the regions whose centroid lies inside the path.
    pub fn lasso_end(&mut self) -> Option<BTreeSet<RegionId>> {
        let path = self.lasso.finish()?;
        let selected = select_regions(&path, &self.regions);
        log::info!(
            "lasso of {} points selected {} region(s)",
            path.len(),
            selected.len()
        );
        self.replace_selection(selected.clone());
        Some(selected)
    }

    /// Drag abandoned (e.g. released outside the map): restore the prior selection.
    pub fn lasso_cancel(&mut self) {
        if let Some(prior) = self.lasso.cancel() {
            self.port.clear_lasso();
            self.replace_selection(prior);
        }
    }

    fn selected_series(&self) -> Vec<TimeSeries> {
        self.state
            .selection
            .iter()
            .filter_map(|id| self.regions.iter().find(|r| &r.id == id))
            .map(|r| time_series(self.dataset.records(), &r.id, &r.name, &self.state.attribute))
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Recompute derived values from the current state and re-render every view.
    pub fn dispatch_render(&mut self) {
        self.dispatches += 1;
        let attribute = self.state.attribute.clone();
        let year = self.state.year;
        log::debug!(
            "dispatch #{}: attribute={} year={} all_years={} selected={}",
            self.dispatches,
            attribute,
            year,
            self.state.use_all_years,
            self.state.selection.len()
        );

        let domain = color_domain(
            self.dataset.records(),
            &attribute,
            year,
            self.state.use_all_years,
        );
        if domain.is_none() {
            log::debug!("no valid values for {} in {}", attribute, year);
        }

        let fills = build_region_fills(
            &self.dataset,
            &self.regions,
            &attribute,
            year,
            domain,
            &self.state.selection,
            &self.config.colors,
        );
        self.port.render_regions(&fills);

        let legend = build_legend(domain, &self.config.legend, &self.config.colors);
        self.port.render_legend(&legend);

        let mut report = DispatchReport {
            sequence: self.dispatches,
            attribute: attribute.clone(),
            year,
            domain,
            series: 0,
            placeholder: true,
            layout_iterations: 0,
            layout_converged: true,
        };

        if self.state.selection.is_empty() {
            let chart = &self.config.chart;
            let view = ChartView::Placeholder {
                message: chart.placeholder.clone(),
                at: Point::new(f64::from(chart.width) / 2.0, f64::from(chart.height) / 2.0),
            };
            self.port.render_chart(&view);
            self.chart = None;
            self.last = Some(report);
            return;
        }

        let series = self.selected_series();
        let frame = build_chart(
            &series,
            &attribute,
            year,
            self.year_domain,
            &self.config.chart,
            &self.config.legend.locale,
        );
        self.port.render_chart(&ChartView::Lines(frame.clone()));
        self.port.render_year_marker(&year_marker(&frame));

        let anchors = label_anchors(&frame, &self.config.labels);
        let font_px = self.config.labels.font_px;
        let port = &self.port;
        let outcome = layout(&anchors, &self.config.labels.layout, |text| {
            port.label_width(text, font_px)
        });
        let placed: Vec<PlacedLabel> = frame
            .series
            .iter()
            .filter(|s| !s.points.is_empty())
            .zip(&outcome.labels)
            .map(|(s, l)| PlacedLabel {
                region: s.region.clone(),
                text: l.text.clone(),
                color: s.color,
                anchor: Point::new(l.final_x, l.final_y),
                at: Point::new(l.x, l.y),
            })
            .collect();
        self.port.render_labels(&placed);

        report.series = frame.series.len();
        report.placeholder = false;
        report.layout_iterations = outcome.iterations;
        report.layout_converged = outcome.converged;
        self.chart = Some(frame);
        self.last = Some(report);
    }
}
