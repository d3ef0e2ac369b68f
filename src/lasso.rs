//! Freehand lasso gesture over the map.

use crate::geo::{point_in_polygon, Point, ProjectedRegion};
use crate::models::RegionId;
use std::collections::BTreeSet;

/// Gesture state. `Drawing` remembers the selection that was active when the
/// drag began so an abandoned drag can put it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LassoSelector {
    #[default]
    Idle,
    Drawing {
        path: Vec<Point>,
        prior: BTreeSet<RegionId>,
    },
}

impl LassoSelector {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Begin a new gesture with an empty path.
    pub fn start(&mut self, prior: BTreeSet<RegionId>) {
        *self = Self::Drawing {
            path: Vec::new(),
            prior,
        };
    }

    /// Append a pointer sample. Returns the path so far, or `None` when idle.
    pub fn push(&mut self, p: Point) -> Option<&[Point]> {
        match self {
            Self::Drawing { path, .. } => {
                path.push(p);
                Some(path.as_slice())
            }
            Self::Idle => None,
        }
    }

    pub fn path(&self) -> &[Point] {
        match self {
            Self::Drawing { path, .. } => path,
            Self::Idle => &[],
        }
    }

    /// Finish the gesture and return the accumulated path.
    pub fn finish(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(self) {
            Self::Drawing { path, .. } => Some(path),
            Self::Idle => None,
        }
    }

    /// Abandon the gesture and return the selection it started from.
    pub fn cancel(&mut self) -> Option<BTreeSet<RegionId>> {
        match std::mem::take(self) {
            Self::Drawing { prior, .. } => Some(prior),
            Self::Idle => None,
        }
    }
}

/// Regions whose projected centroid lies inside `path` (even-odd rule).
/// Paths with fewer than two points select nothing.
pub fn select_regions(path: &[Point], regions: &[ProjectedRegion]) -> BTreeSet<RegionId> {
    if path.len() < 2 {
        return BTreeSet::new();
    }
    regions
        .iter()
        .filter(|r| point_in_polygon(r.centroid, path))
        .map(|r| r.id.clone())
        .collect()
}
