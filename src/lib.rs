//! hexdash
//!
//! A small Rust library for exploring per-state indicator data on a hex-grid
//! choropleth linked to a time-series line chart. Pairs with the `hexdash`
//! CLI (SVG export) and the `hexdash-gui` desktop app.
//!
//! ### Features
//! - Load tidy `State, Year, <attribute>...` CSV data and hex polygons from GeoJSON
//! - Color the map by one attribute, scaled to the current year or all years
//! - Lasso-select hexes; the chart shows one line per selected state
//! - Collision-free end-of-line labels and a year marker; click the chart to jump to a year
//! - Play through the years on a fixed period
//!
//! ### Example
//! ```no_run
//! use hexdash::{Dashboard, DashboardConfig, Dataset};
//! use hexdash::viz::{EstimatedMetrics, SceneRecorder};
//!
//! let data = Dataset::open("bds.csv", "hexgrid.geojson")?;
//! let mut dash = Dashboard::new(
//!     data,
//!     DashboardConfig::default(),
//!     SceneRecorder::new(EstimatedMetrics),
//! )?;
//! dash.dispatch_render();
//! dash.set_year(2015)?;
//! hexdash::viz::svg::write_map_svg(&dash.port().scene, dash.config(), "map.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod animation;
pub mod config;
pub mod dispatch;
pub mod geo;
pub mod lasso;
pub mod layout;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod viz;

pub use animation::{AnimationDriver, Clock, ManualClock, PlayState, SystemClock};
pub use config::DashboardConfig;
pub use dispatch::{Dashboard, DashboardError, DispatchReport, RenderPort};
pub use geo::{Point, point_in_polygon};
pub use models::{LonLat, Record, Region, RegionId};
pub use state::{ControlError, ViewState, YearBounds};
pub use storage::{Dataset, LoadError};
