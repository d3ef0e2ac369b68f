//! Shared view state: the single source of truth for the controls and the
//! current selection. Only [`crate::dispatch::Dashboard`] mutates it, and
//! every mutation replaces a whole field.

use crate::models::RegionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Rejected control input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
    #[error("year {year} outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    #[error("unknown region `{0}`")]
    UnknownRegion(RegionId),
}

/// Inclusive slider range for the year control.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawYearBounds")]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

/// Bounds as written in a config file; may come in either order.
#[derive(Deserialize)]
struct RawYearBounds {
    min: i32,
    max: i32,
}

impl From<RawYearBounds> for YearBounds {
    fn from(raw: RawYearBounds) -> Self {
        Self::new(raw.min, raw.max)
    }
}

impl YearBounds {
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }

    /// Number of selectable years. Always at least 1.
    pub fn span(&self) -> i64 {
        i64::from(self.max) - i64::from(self.min) + 1
    }

    /// The year after `year`, wrapping past `max` back to `min`.
    pub fn next(&self, year: i32) -> i32 {
        self.advance(year, 1)
    }

    /// `year` moved forward by `steps`, wrapping within the bounds.
    pub fn advance(&self, year: i32, steps: u32) -> i32 {
        let min = i64::from(self.min);
        let offset = (i64::from(year) - min + i64::from(steps)).rem_euclid(self.span());
        // min + offset lies in min..=max
        i32::try_from(min + offset).unwrap_or(self.max)
    }

    pub fn check(&self, year: i32) -> Result<i32, ControlError> {
        if self.contains(year) {
            Ok(year)
        } else {
            Err(ControlError::YearOutOfRange {
                year,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Current attribute, year, scale mode and selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewState {
    pub(crate) attribute: String,
    pub(crate) year: i32,
    pub(crate) use_all_years: bool,
    pub(crate) selection: BTreeSet<RegionId>,
}

impl ViewState {
    pub fn new(attribute: impl Into<String>, year: i32) -> Self {
        Self {
            attribute: attribute.into(),
            year,
            use_all_years: false,
            selection: BTreeSet::new(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// `true` when the color domain spans all years instead of the current one.
    pub fn use_all_years(&self) -> bool {
        self.use_all_years
    }

    pub fn selection(&self) -> &BTreeSet<RegionId> {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_to_min() {
        let b = YearBounds::new(2012, 2016);
        assert_eq!(b.next(2014), 2015);
        assert_eq!(b.next(2016), 2012);
        assert_eq!(b.span(), 5);
    }

    #[test]
    fn advance_wraps_more_than_once() {
        let b = YearBounds::new(2012, 2016);
        assert_eq!(b.advance(2014, 0), 2014);
        assert_eq!(b.advance(2014, 12), 2016);
        assert_eq!(b.advance(2016, 5), 2016);
        assert_eq!(b.advance(2012, u32::MAX), 2012 + (u32::MAX % 5) as i32);
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let b: YearBounds =
            serde_json::from_str(&format!(r#"{{"min":{},"max":{}}}"#, i32::MAX, i32::MIN))
                .unwrap();
        assert_eq!((b.min, b.max), (i32::MIN, i32::MAX));
        assert_eq!(b.span(), 1 << 32);
        assert_eq!(b.next(i32::MAX), i32::MIN);
        assert_eq!(b.next(0), 1);

        let single = YearBounds::new(2015, 2015);
        assert_eq!(single.advance(2015, 7), 2015);
    }

    #[test]
    fn check_rejects_out_of_range() {
        let b = YearBounds::new(2016, 2012);
        assert_eq!(b.min, 2012);
        assert_eq!(b.check(2012), Ok(2012));
        assert_eq!(
            b.check(2017),
            Err(ControlError::YearOutOfRange {
                year: 2017,
                min: 2012,
                max: 2016
            })
        );
    }
}
