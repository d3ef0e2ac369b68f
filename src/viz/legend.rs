//! Color legend: a gradient bar across the current color domain with a small
//! tick axis underneath.

use super::types::{LegendFrame, Tick};
use super::util::{format_tick, map_locale};
use super::{ColorScale, LinearScale};
use crate::config::{ColorConfig, LegendConfig};
use crate::stats::ColorDomain;

/// Horizontal inset of the bar and its axis inside the legend.
const PAD_X: f64 = 20.0;
const PAD_TOP: f64 = 10.0;
/// Space reserved under the bar for the tick axis.
const AXIS_BAND: f64 = 20.0;

/// Build the legend for `domain`. With no domain the bar is empty and no
/// ticks are produced.
pub fn build_legend(
    domain: Option<ColorDomain>,
    cfg: &LegendConfig,
    colors: &ColorConfig,
) -> LegendFrame {
    let (w, h) = (f64::from(cfg.width), f64::from(cfg.height));
    let bar = [PAD_X, PAD_TOP, (w - 2.0 * PAD_X).max(0.0), (h - PAD_TOP - AXIS_BAND).max(0.0)];

    let Some(d) = domain else {
        return LegendFrame {
            domain: None,
            width: w,
            height: h,
            stops: Vec::new(),
            ticks: Vec::new(),
            bar,
        };
    };

    let scale = ColorScale {
        domain: d,
        low: colors.low,
        high: colors.high,
    };
    let n = cfg.stops.max(2);
    let stops = (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            (t, scale.color(d.min + t * (d.max - d.min)))
        })
        .collect();

    let axis = LinearScale::new((d.min, d.max), (PAD_X, w - PAD_X));
    let locale = map_locale(&cfg.locale);
    let ticks = axis
        .ticks(cfg.ticks)
        .into_iter()
        .map(|v| Tick {
            pos: axis.apply(v),
            label: format_tick(v, locale),
        })
        .collect();

    LegendFrame {
        domain: Some(d),
        width: w,
        height: h,
        stops,
        ticks,
        bar,
    }
}
