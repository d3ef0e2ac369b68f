//! Geometry utilities: screen points, the even-odd point-in-polygon test,
//! the fixed Mercator projection shared by the map and the lasso, and
//! planar centroids of projected regions.

use crate::models::{LonLat, Region, RegionId};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// A point in screen (projected) coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Crossing-number (even-odd) test of `p` against the closed polygon `vs`.
///
/// Toggles once per edge whose y-range straddles `p.y` and which crosses to
/// the right of `p.x`. Self-intersecting paths follow even-odd semantics.
/// Fewer than three vertices never contain anything.
pub fn point_in_polygon(p: Point, vs: &[Point]) -> bool {
    if vs.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vs.len() - 1;
    for i in 0..vs.len() {
        let (a, b) = (vs[i], vs[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Spherical Mercator with a fixed scale and translation (degrees in, pixels out).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub translate: [f64; 2],
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale: 380.0,
            translate: [950.0, 500.0],
        }
    }
}

impl Projection {
    pub fn project(&self, ll: LonLat) -> Point {
        let lambda = ll.lon.to_radians();
        let phi = ll.lat.to_radians();
        Point {
            x: self.translate[0] + self.scale * lambda,
            y: self.translate[1] - self.scale * (FRAC_PI_4 + phi / 2.0).tan().ln(),
        }
    }

    /// Inverse of [`Projection::project`].
    pub fn invert(&self, p: Point) -> LonLat {
        let lambda = (p.x - self.translate[0]) / self.scale;
        let y = (self.translate[1] - p.y) / self.scale;
        let phi = 2.0 * y.exp().atan() - 2.0 * FRAC_PI_4;
        LonLat {
            lon: lambda.to_degrees(),
            lat: phi.to_degrees(),
        }
    }
}

/// A region after projection into screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRegion {
    pub id: RegionId,
    pub name: String,
    /// Exterior rings only, one per polygon, in screen coordinates.
    pub outlines: Vec<Vec<Point>>,
    pub centroid: Point,
}

impl ProjectedRegion {
    pub fn project(region: &Region, projection: &Projection) -> Self {
        let polygons: Vec<Vec<Vec<Point>>> = region
            .polygons
            .iter()
            .map(|poly| {
                poly.iter()
                    .map(|ring| ring.iter().map(|ll| projection.project(*ll)).collect())
                    .collect()
            })
            .collect();
        let centroid = polygons_centroid(&polygons);
        let outlines = polygons
            .into_iter()
            .filter_map(|mut rings| (!rings.is_empty()).then(|| rings.swap_remove(0)))
            .collect();
        Self {
            id: region.id.clone(),
            name: region.name.clone(),
            outlines,
            centroid,
        }
    }
}

/// Signed area and area-weighted centroid sums of a single ring (shoelace).
fn ring_moments(ring: &[Point]) -> (f64, f64, f64) {
    let (mut a, mut cx, mut cy) = (0.0, 0.0, 0.0);
    if ring.len() < 3 {
        return (a, cx, cy);
    }
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (p, q) = (ring[j], ring[i]);
        let cross = p.x * q.y - q.x * p.y;
        a += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
        j = i;
    }
    (a / 2.0, cx, cy)
}

/// Planar area-weighted centroid of polygons-with-holes. Holes subtract from
/// the exterior regardless of their winding. Degenerate (zero-area) input
/// falls back to the vertex mean.
pub fn polygons_centroid(polygons: &[Vec<Vec<Point>>]) -> Point {
    let (mut area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for rings in polygons {
        for (k, ring) in rings.iter().enumerate() {
            let (a, x, y) = ring_moments(ring);
            // Normalize orientation so exterior adds and holes subtract.
            let sign = if (a >= 0.0) == (k == 0) { 1.0 } else { -1.0 };
            area += sign * a;
            cx += sign * x;
            cy += sign * y;
        }
    }
    if area.abs() > f64::EPSILON {
        return Point::new(cx / (6.0 * area), cy / (6.0 * area));
    }
    let pts: Vec<Point> = polygons.iter().flatten().flatten().copied().collect();
    if pts.is_empty() {
        return Point::default();
    }
    let n = pts.len() as f64;
    Point::new(
        pts.iter().map(|p| p.x).sum::<f64>() / n,
        pts.iter().map(|p| p.y).sum::<f64>() / n,
    )
}
