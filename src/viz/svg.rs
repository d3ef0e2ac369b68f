//! SVG export of a recorded [`Scene`] with Plotters.
//!
//! - Map: hexes filled by value, abbreviations at centroids, selection outlines,
//!   the lasso path and the color legend along the bottom edge
//! - Chart: axes with ticks and captions, one line per series, the dashed year
//!   marker and the laid-out labels; or the placeholder message

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontTransform};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::path::Path;

use super::scene::Scene;
use super::types::{ChartFrame, ChartView, LegendFrame};
use super::Rgb8;
use crate::config::DashboardConfig;
use crate::geo::Point;

fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn px(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn offset(p: Point, dx: f64, dy: f64) -> (i32, i32) {
    px(Point::new(p.x + dx, p.y + dy))
}

fn text_style<'a>(font_px: f64, color: &'a RGBColor, h: HPos, v: VPos) -> TextStyle<'a> {
    TextStyle::from((FontFamily::SansSerif, font_px))
        .color(color)
        .pos(Pos::new(h, v))
}

/// Render the map view (with legend) to an SVG string.
pub fn map_svg_string(scene: &Scene, cfg: &DashboardConfig) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (cfg.map.width, cfg.map.height))
            .into_drawing_area();
        draw_map(&root, scene, cfg)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Render the line chart view to an SVG string.
pub fn chart_svg_string(scene: &Scene, cfg: &DashboardConfig) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (cfg.chart.width, cfg.chart.height))
            .into_drawing_area();
        draw_chart(&root, scene, cfg)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

pub fn write_map_svg<P: AsRef<Path>>(scene: &Scene, cfg: &DashboardConfig, path: P) -> Result<()> {
    std::fs::write(path, map_svg_string(scene, cfg)?)?;
    Ok(())
}

pub fn write_chart_svg<P: AsRef<Path>>(
    scene: &Scene,
    cfg: &DashboardConfig,
    path: P,
) -> Result<()> {
    std::fs::write(path, chart_svg_string(scene, cfg)?)?;
    Ok(())
}

fn draw_map<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    cfg: &DashboardConfig,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    for region in &scene.regions {
        for outline in &region.outlines {
            let pts: Vec<(i32, i32)> = outline.iter().map(|p| px(*p)).collect();
            root.draw(&Polygon::new(pts.clone(), rgb(region.color).filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
            let mut ring = pts;
            if let Some(first) = ring.first().copied() {
                ring.push(first);
            }
            let width = if region.selected { 3 } else { 1 };
            root.draw(&PathElement::new(ring, BLACK.stroke_width(width)))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        root.draw(&Text::new(
            region.id.to_string(),
            px(region.centroid),
            text_style(cfg.map.label_font_px, &BLACK, HPos::Center, VPos::Center),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    if scene.lasso.len() > 1 {
        let mut path: Vec<(i32, i32)> = scene.lasso.iter().map(|p| px(*p)).collect();
        root.draw(&Polygon::new(path.clone(), BLACK.mix(0.33).filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
        path.push(path[0]);
        root.draw(&PathElement::new(path, BLACK.stroke_width(2)))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if let Some(legend) = &scene.legend {
        let dy = f64::from(cfg.map.height) - legend.height - 10.0;
        draw_legend(root, legend, 10.0, dy)?;
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    legend: &LegendFrame,
    dx: f64,
    dy: f64,
) -> Result<()> {
    let [bx, by, bw, bh] = legend.bar;
    if legend.stops.len() < 2 {
        root.draw(&Text::new(
            "no data".to_string(),
            offset(Point::new(bx, by + bh / 2.0), dx, dy),
            text_style(10.0, &BLACK, HPos::Left, VPos::Center),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        return Ok(());
    }

    // Gradient approximated by one band per stop interval.
    for pair in legend.stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        let x0 = bx + t0 * bw;
        let x1 = bx + t1 * bw;
        let mid = c0.lerp(c1, 0.5);
        root.draw(&Rectangle::new(
            [offset(Point::new(x0, by), dx, dy), offset(Point::new(x1, by + bh), dx, dy)],
            rgb(mid).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    let axis_y = by + bh;
    root.draw(&PathElement::new(
        vec![
            offset(Point::new(bx, axis_y), dx, dy),
            offset(Point::new(bx + bw, axis_y), dx, dy),
        ],
        BLACK.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    for tick in &legend.ticks {
        root.draw(&PathElement::new(
            vec![
                offset(Point::new(tick.pos, axis_y), dx, dy),
                offset(Point::new(tick.pos, axis_y + 4.0), dx, dy),
            ],
            BLACK.stroke_width(1),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            tick.label.clone(),
            offset(Point::new(tick.pos, axis_y + 6.0), dx, dy),
            text_style(10.0, &BLACK, HPos::Center, VPos::Top),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    cfg: &DashboardConfig,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let frame = match &scene.chart {
        None => return Ok(()),
        Some(ChartView::Placeholder { message, at }) => {
            root.draw(&Text::new(
                message.clone(),
                px(*at),
                text_style(18.0, &BLACK, HPos::Center, VPos::Center),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            return Ok(());
        }
        Some(ChartView::Lines(frame)) => frame,
    };

    let (dx, dy) = (frame.margin.left, frame.margin.top);
    draw_axes(root, frame, dx, dy)?;

    for line in &frame.series {
        let pts: Vec<(i32, i32)> = line.points.iter().map(|p| offset(*p, dx, dy)).collect();
        root.draw(&PathElement::new(pts, rgb(line.color).stroke_width(2)))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if let Some(marker) = &scene.year_marker {
        // Dashes of 3px with 3px gaps.
        let mut y = marker.y1;
        while y < marker.y2 {
            let end = (y + 3.0).min(marker.y2);
            root.draw(&PathElement::new(
                vec![
                    offset(Point::new(marker.x, y), dx, dy),
                    offset(Point::new(marker.x, end), dx, dy),
                ],
                BLACK.stroke_width(2),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
            y += 6.0;
        }
    }

    for label in &scene.labels {
        root.draw(&Text::new(
            label.text.clone(),
            offset(label.at, dx, dy),
            text_style(cfg.labels.font_px, &rgb(label.color), HPos::Left, VPos::Center),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &ChartFrame,
    dx: f64,
    dy: f64,
) -> Result<()> {
    let (w, h) = (frame.width, frame.height);
    let axis = BLACK.stroke_width(1);

    root.draw(&PathElement::new(
        vec![offset(Point::new(0.0, h), dx, dy), offset(Point::new(w, h), dx, dy)],
        axis,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    for tick in &frame.x_ticks {
        root.draw(&PathElement::new(
            vec![
                offset(Point::new(tick.pos, h), dx, dy),
                offset(Point::new(tick.pos, h + 6.0), dx, dy),
            ],
            axis,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            tick.label.clone(),
            offset(Point::new(tick.pos, h + 9.0), dx, dy),
            text_style(10.0, &BLACK, HPos::Center, VPos::Top),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.draw(&PathElement::new(
        vec![offset(Point::new(0.0, 0.0), dx, dy), offset(Point::new(0.0, h), dx, dy)],
        axis,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    for tick in &frame.y_ticks {
        root.draw(&PathElement::new(
            vec![
                offset(Point::new(-6.0, tick.pos), dx, dy),
                offset(Point::new(0.0, tick.pos), dx, dy),
            ],
            axis,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            tick.label.clone(),
            offset(Point::new(-9.0, tick.pos), dx, dy),
            text_style(10.0, &BLACK, HPos::Right, VPos::Center),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.draw(&Text::new(
        frame.x_label.clone(),
        offset(Point::new(w / 2.0, h + 40.0), dx, dy),
        text_style(14.0, &BLACK, HPos::Center, VPos::Center),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    root.draw(&Text::new(
        frame.y_label.clone(),
        offset(Point::new(-50.0, h / 2.0), dx, dy),
        text_style(14.0, &BLACK, HPos::Center, VPos::Center).transform(FontTransform::Rotate270),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
