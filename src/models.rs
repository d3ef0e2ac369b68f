use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute shown when nothing else has been chosen.
pub const DEFAULT_ATTRIBUTE: &str = "Data.Job Creation.Rate";

/// Suffix carried by display names in the hex-grid geometry.
pub const REGION_NAME_SUFFIX: &str = " (United States)";

/// Regions present in the hex-grid geometry that have no rows in the dataset.
/// They render as "no data" and are never an error.
pub const KNOWN_NO_DATA_REGIONS: [&str; 4] = ["Arizona", "Illinois", "Connecticut", "Tennessee"];

/// The enumerated attributes offered by the attribute selector, with their descriptions.
pub const ATTRIBUTE_CATALOG: [(&str, &str); 5] = [
    (
        "Data.Job Creation.Rate",
        "The number of jobs that were created in the last year divided by the DHS denominator. The result is the rate at which jobs have been created.",
    ),
    (
        "Data.Job Destruction.Rate",
        "The number of jobs that were destroyed in the last year divided by the DHS denominator. The result is the rate at which jobs have been destroyed.",
    ),
    (
        "Data.Job Creation.Count",
        "The number of jobs that were created in the last year.",
    ),
    (
        "Data.DHS Denominator",
        "The Davis-Haltiwanger-Schuh (DHS) denominator is the two-period trailing moving average of employment, intended to prevent transitory shocks from distorting net growth. In other words, this value roughly represents the employment for the area, but is resistant to sudden, spiking growth.",
    ),
    (
        "Data.Job Destruction.Continuers",
        "The number of jobs at continuing establishments that were destroyed in the last year.",
    ),
];

/// Names of the catalog attributes, in selector order.
pub fn catalog_attributes() -> Vec<String> {
    ATTRIBUTE_CATALOG
        .iter()
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Hover description for an attribute.
pub fn attribute_description(attribute: &str) -> &'static str {
    ATTRIBUTE_CATALOG
        .iter()
        .find(|(name, _)| *name == attribute)
        .map(|(_, desc)| *desc)
        .unwrap_or("No description available for this attribute.")
}

/// Axis caption for an attribute: "Data.Job Creation.Rate" -> "Job Creation Rate".
pub fn attribute_axis_label(attribute: &str) -> String {
    attribute
        .replacen("Data.", "", 1)
        .replacen('.', " ", 1)
}

/// Strip the geometry's country qualifier so the name matches dataset `State` values.
pub fn normalize_region_name(display_name: &str) -> String {
    display_name.replace(REGION_NAME_SUFFIX, "")
}

/// Whether `name` is one of the regions known to have no dataset rows.
pub fn is_known_no_data(name: &str) -> bool {
    KNOWN_NO_DATA_REGIONS.contains(&name)
}

/// Stable two-letter region identifier (e.g. `CA`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Longitude/latitude pair in degrees, as found in the geometry file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

/// One mapped area: identifier, normalized display name and its polygons.
///
/// Each polygon is a list of rings; the first ring is the exterior, the rest are holes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub polygons: Vec<Vec<Vec<LonLat>>>,
}

impl Region {
    /// Single-ring region, mostly useful for fixtures.
    pub fn with_ring(id: &str, name: &str, ring: Vec<LonLat>) -> Self {
        Self {
            id: RegionId::new(id),
            name: name.to_string(),
            polygons: vec![vec![ring]],
        }
    }
}

/// One observation (one row = one `State` x `Year`). Missing or non-numeric
/// attribute cells are simply absent from `values`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub state: String,
    pub year: i32,
    pub values: BTreeMap<String, f64>,
}

impl Record {
    pub fn new(state: &str, year: i32) -> Self {
        Self {
            state: state.to_string(),
            year,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach one attribute value.
    pub fn with(mut self, attribute: &str, value: f64) -> Self {
        self.values.insert(attribute.to_string(), value);
        self
    }

    /// Numeric value for `attribute`, if present and finite.
    pub fn value(&self, attribute: &str) -> Option<f64> {
        self.values.get(attribute).copied().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_label_strips_prefix_and_first_dot() {
        assert_eq!(attribute_axis_label("Data.Job Creation.Rate"), "Job Creation Rate");
        assert_eq!(attribute_axis_label("Data.DHS Denominator"), "DHS Denominator");
    }

    #[test]
    fn region_names_are_normalized() {
        assert_eq!(normalize_region_name("California (United States)"), "California");
        assert_eq!(normalize_region_name("Ohio"), "Ohio");
    }

    #[test]
    fn unknown_attribute_has_fallback_description() {
        assert!(attribute_description("Data.Job Creation.Count").starts_with("The number of jobs"));
        assert_eq!(
            attribute_description("Nope"),
            "No description available for this attribute."
        );
    }
}
