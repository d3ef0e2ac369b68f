/*!
 * Desktop front end for hexdash.
 *
 * A cross-platform window with:
 * - Attribute selector, year slider, scale-mode toggle and Play/Pause
 * - The hex-grid choropleth with lasso selection and its color legend
 * - The linked line chart; clicking it jumps to the year under the pointer
 *
 * Usage: `hexdash-gui [data.csv] [hexgrid.geojson] [config.json]`
 */

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use hexdash::models::attribute_description;
use hexdash::viz::text::estimate_text_width_px;
use hexdash::viz::{ChartView, LegendFrame, Rgb8, Scene, SceneRecorder, TextMetrics};
use hexdash::{
    AnimationDriver, Dashboard, DashboardConfig, Dataset, PlayState, Point, SystemClock,
};

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data_path = args.next().unwrap_or_default();
    let geo_path = args.next().unwrap_or_default();
    let config_path = args.next().unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Business Dynamics - hexdash"),
        ..Default::default()
    };

    eframe::run_native(
        "hexdash",
        options,
        Box::new(move |_cc| Ok(Box::new(HexdashApp::new(data_path, geo_path, config_path)))),
    )
}

/// Measures label widths with egui's own font layout once a context exists.
#[derive(Default)]
struct EguiMetrics {
    ctx: Option<egui::Context>,
}

impl TextMetrics for EguiMetrics {
    fn text_width(&self, text: &str, font_px: f64) -> f64 {
        match &self.ctx {
            Some(ctx) => ctx.fonts(|f| {
                f64::from(
                    f.layout_no_wrap(
                        text.to_owned(),
                        FontId::proportional(font_px as f32),
                        Color32::BLACK,
                    )
                    .size()
                    .x,
                )
            }),
            None => estimate_text_width_px(text, font_px),
        }
    }
}

type GuiDashboard = Dashboard<SceneRecorder<EguiMetrics>>;

struct HexdashApp {
    data_path: String,
    geo_path: String,
    config_path: String,

    dash: Option<GuiDashboard>,
    driver: AnimationDriver<SystemClock>,
    needs_initial_render: bool,

    status_message: String,
    error_message: String,
}

impl HexdashApp {
    fn new(data_path: String, geo_path: String, config_path: String) -> Self {
        let mut app = Self {
            data_path,
            geo_path,
            config_path,
            dash: None,
            driver: AnimationDriver::default(),
            needs_initial_render: false,
            status_message: String::new(),
            error_message: String::new(),
        };
        if !app.data_path.is_empty() && !app.geo_path.is_empty() {
            app.load();
        }
        app
    }

    fn load(&mut self) {
        self.dash = None;
        self.driver.stop();
        match self.try_load() {
            Ok(dash) => {
                self.driver = AnimationDriver::new(
                    SystemClock::default(),
                    dash.config().animation_period(),
                );
                self.status_message = format!(
                    "Loaded {} rows and {} regions",
                    dash.dataset().records().len(),
                    dash.regions().len()
                );
                self.error_message.clear();
                self.dash = Some(dash);
                self.needs_initial_render = true;
            }
            Err(err) => {
                log::error!("load failed: {:#}", err);
                self.error_message = format!("Failed to load data: {:#}", err);
                self.status_message.clear();
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<GuiDashboard> {
        let config = if self.config_path.trim().is_empty() {
            DashboardConfig::default()
        } else {
            DashboardConfig::from_json_file(self.config_path.trim())?
        };
        let data = Dataset::open(self.data_path.trim(), self.geo_path.trim())?;
        Ok(Dashboard::new(
            data,
            config,
            SceneRecorder::new(EguiMetrics::default()),
        )?)
    }

    fn file_row(ui: &mut egui::Ui, label: &str, value: &mut String, ext: &[&str]) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.text_edit_singleline(value);
            if ui.button("Browse").clicked()
                && let Some(path) = rfd::FileDialog::new().add_filter(label, ext).pick_file()
            {
                *value = path.to_string_lossy().to_string();
            }
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let Some(dash) = self.dash.as_mut() else {
            return;
        };
        ui.horizontal(|ui| {
            let current = dash.state().attribute().to_string();
            let attributes = dash.attributes().to_vec();
            ui.label("Attribute:");
            let mut chosen = None;
            egui::ComboBox::from_id_salt("attribute")
                .selected_text(&current)
                .width(260.0)
                .show_ui(ui, |ui| {
                    for attr in &attributes {
                        if ui
                            .selectable_label(*attr == current, attr)
                            .on_hover_text(attribute_description(attr))
                            .clicked()
                        {
                            chosen = Some(attr.clone());
                        }
                    }
                })
                .response
                .on_hover_text(attribute_description(&current));
            if let Some(attr) = chosen
                && let Err(err) = dash.set_attribute(&attr)
            {
                self.error_message = err.to_string();
            }

            ui.separator();
            let bounds = dash.bounds();
            let mut year = dash.state().year();
            if ui
                .add(egui::Slider::new(&mut year, bounds.min..=bounds.max).text("Year"))
                .changed()
                && let Err(err) = dash.set_year(year)
            {
                self.error_message = err.to_string();
            }

            let mut all_years = dash.state().use_all_years();
            if ui
                .checkbox(&mut all_years, "Scale over all years")
                .on_hover_text("Color by the extent over every year instead of the current one")
                .changed()
            {
                dash.set_scale_mode(all_years);
            }

            if ui.button(self.driver.state().button_label()).clicked() {
                self.driver.toggle();
            }
        });
    }
}

/// Uniform scale from map pixels into the allocated rect.
#[derive(Clone, Copy)]
struct MapView {
    origin: Pos2,
    scale: f32,
}

impl MapView {
    fn fit(rect: Rect, width: u32, height: u32) -> Self {
        let scale = (rect.width() / width.max(1) as f32).min(rect.height() / height.max(1) as f32);
        Self {
            origin: rect.min,
            scale,
        }
    }

    fn to_screen(self, p: Point) -> Pos2 {
        self.origin + Vec2::new(p.x as f32, p.y as f32) * self.scale
    }

    fn to_map(self, pos: Pos2) -> Point {
        let v = (pos - self.origin) / self.scale;
        Point::new(f64::from(v.x), f64::from(v.y))
    }
}

fn c32(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

fn paint_map(painter: &egui::Painter, view: MapView, scene: &Scene, font_px: f64, lasso: &[Point]) {
    let font = FontId::proportional(font_px as f32 * view.scale);
    for region in &scene.regions {
        let stroke = Stroke::new(if region.selected { 3.0 } else { 1.0 }, Color32::BLACK);
        for outline in &region.outlines {
            let pts = outline.iter().map(|p| view.to_screen(*p)).collect();
            painter.add(Shape::convex_polygon(pts, c32(region.color), stroke));
        }
        painter.text(
            view.to_screen(region.centroid),
            Align2::CENTER_CENTER,
            region.id.as_str(),
            font.clone(),
            Color32::BLACK,
        );
    }
    if lasso.len() > 1 {
        let pts = lasso.iter().map(|p| view.to_screen(*p)).collect();
        painter.add(Shape::closed_line(pts, Stroke::new(2.0, Color32::DARK_GRAY)));
    }
}

fn paint_legend(painter: &egui::Painter, origin: Pos2, legend: &LegendFrame) {
    let [bx, by, bw, bh] = legend.bar;
    let at = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);
    if legend.stops.len() < 2 {
        painter.text(
            at(bx, by + bh / 2.0),
            Align2::LEFT_CENTER,
            "no data",
            FontId::proportional(10.0),
            Color32::BLACK,
        );
        return;
    }
    for pair in legend.stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        let rect = Rect::from_two_pos(at(bx + t0 * bw, by), at(bx + t1 * bw, by + bh));
        painter.rect_filled(rect, 0.0, c32(c0.lerp(c1, 0.5)));
    }
    let axis = Stroke::new(1.0, Color32::BLACK);
    painter.line_segment([at(bx, by + bh), at(bx + bw, by + bh)], axis);
    for tick in &legend.ticks {
        painter.line_segment([at(tick.pos, by + bh), at(tick.pos, by + bh + 4.0)], axis);
        painter.text(
            at(tick.pos, by + bh + 6.0),
            Align2::CENTER_TOP,
            &tick.label,
            FontId::proportional(10.0),
            Color32::BLACK,
        );
    }
}

fn paint_chart(painter: &egui::Painter, rect: Rect, scene: &Scene, label_px: f64) {
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    let frame = match &scene.chart {
        None => return,
        Some(ChartView::Placeholder { message, at }) => {
            painter.text(
                rect.min + Vec2::new(at.x as f32, at.y as f32),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(18.0),
                Color32::BLACK,
            );
            return;
        }
        Some(ChartView::Lines(frame)) => frame,
    };

    let inner = rect.min + Vec2::new(frame.margin.left as f32, frame.margin.top as f32);
    let at = |x: f64, y: f64| inner + Vec2::new(x as f32, y as f32);
    let axis = Stroke::new(1.0, Color32::BLACK);
    let (w, h) = (frame.width, frame.height);

    painter.line_segment([at(0.0, h), at(w, h)], axis);
    for tick in &frame.x_ticks {
        painter.line_segment([at(tick.pos, h), at(tick.pos, h + 6.0)], axis);
        painter.text(
            at(tick.pos, h + 9.0),
            Align2::CENTER_TOP,
            &tick.label,
            FontId::proportional(10.0),
            Color32::BLACK,
        );
    }
    painter.line_segment([at(0.0, 0.0), at(0.0, h)], axis);
    for tick in &frame.y_ticks {
        painter.line_segment([at(-6.0, tick.pos), at(0.0, tick.pos)], axis);
        painter.text(
            at(-9.0, tick.pos),
            Align2::RIGHT_CENTER,
            &tick.label,
            FontId::proportional(10.0),
            Color32::BLACK,
        );
    }
    painter.text(
        at(w / 2.0, h + 40.0),
        Align2::CENTER_CENTER,
        &frame.x_label,
        FontId::proportional(14.0),
        Color32::BLACK,
    );
    painter.text(
        at(0.0, -10.0),
        Align2::LEFT_CENTER,
        &frame.y_label,
        FontId::proportional(12.0),
        Color32::BLACK,
    );

    for line in &frame.series {
        let pts = line.points.iter().map(|p| at(p.x, p.y)).collect();
        painter.add(Shape::line(pts, Stroke::new(2.0, c32(line.color))));
    }

    if let Some(marker) = &scene.year_marker {
        painter.extend(Shape::dashed_line(
            &[at(marker.x, marker.y1), at(marker.x, marker.y2)],
            Stroke::new(2.0, Color32::BLACK),
            3.0,
            3.0,
        ));
    }

    for label in &scene.labels {
        painter.text(
            at(label.at.x, label.at.y),
            Align2::LEFT_CENTER,
            &label.text,
            FontId::proportional(label_px as f32),
            c32(label.color),
        );
    }
}

impl eframe::App for HexdashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(dash) = self.dash.as_mut() {
            if self.needs_initial_render {
                dash.port_mut().metrics_mut().ctx = Some(ctx.clone());
                dash.dispatch_render();
                self.needs_initial_render = false;
            }
            if self.driver.state() == PlayState::Playing {
                dash.pump_animation(&mut self.driver);
                if let Some(wait) = self.driver.time_until_next_tick() {
                    ctx.request_repaint_after(wait);
                }
            }
            let calls = dash.port_mut().take_calls();
            if !calls.is_empty() {
                log::trace!("render calls this frame: {:?}", calls);
            }
        }

        egui::TopBottomPanel::top("inputs").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                Self::file_row(ui, "Data CSV:", &mut self.data_path, &["csv"]);
                Self::file_row(ui, "Hex GeoJSON:", &mut self.geo_path, &["geojson", "json"]);
                Self::file_row(ui, "Config:", &mut self.config_path, &["json"]);
                if ui.button("Load").clicked() {
                    self.load();
                }
            });
            self.controls(ui);
            if !self.status_message.is_empty() {
                ui.colored_label(Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(Color32::RED, &self.error_message);
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(dash) = self.dash.as_mut() else {
                if self.error_message.is_empty() {
                    ui.label("Choose a data CSV and a hex-grid GeoJSON, then press Load.");
                }
                return;
            };
            let cfg = dash.config().clone();

            ui.horizontal_top(|ui| {
                let avail = ui.available_size();
                let map_size = Vec2::new(
                    (avail.x - cfg.chart.width as f32 - 10.0).max(200.0),
                    avail.y,
                );
                let (response, painter) = ui.allocate_painter(map_size, Sense::click_and_drag());
                let view = MapView::fit(response.rect, cfg.map.width, cfg.map.height);

                if response.drag_started() {
                    dash.lasso_start();
                }
                if response.dragged()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    dash.lasso_move(view.to_map(pos));
                }
                if response.drag_stopped() {
                    let inside = ctx
                        .pointer_latest_pos()
                        .is_some_and(|p| response.rect.contains(p));
                    if inside {
                        dash.lasso_end();
                    } else {
                        dash.lasso_cancel();
                    }
                }

                painter.rect_filled(response.rect, 0.0, Color32::WHITE);
                let scene = &dash.port().scene;
                paint_map(&painter, view, scene, cfg.map.label_font_px, dash.lasso_path());
                if let Some(legend) = &scene.legend {
                    let origin = Pos2::new(
                        response.rect.min.x + 10.0,
                        response.rect.max.y - legend.height as f32 - 10.0,
                    );
                    paint_legend(&painter, origin, legend);
                }

                let chart_size = Vec2::new(cfg.chart.width as f32, cfg.chart.height as f32);
                let (response, painter) = ui.allocate_painter(chart_size, Sense::click());
                if response.clicked()
                    && let Some(pos) = response.interact_pointer_pos()
                {
                    let x = f64::from(pos.x - response.rect.min.x) - cfg.chart.margin.left;
                    if let Some(year) = dash.select_year_at(x) {
                        log::debug!("chart click -> {}", year);
                    }
                }
                paint_chart(&painter, response.rect, &dash.port().scene, cfg.labels.font_px);
            });
        });
    }
}
