//! Severity categories for AQI values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named AQI band, ordered from "no data" through increasing severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    NoData,
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Inclusive upper bounds; anything above the last one is hazardous
const THRESHOLDS: [(f64, Category); 5] = [
    (50.0, Category::Good),
    (100.0, Category::Moderate),
    (150.0, Category::UnhealthyForSensitiveGroups),
    (200.0, Category::Unhealthy),
    (300.0, Category::VeryUnhealthy),
];

impl Category {
    pub const ALL: [Category; 7] = [
        Category::NoData,
        Category::Good,
        Category::Moderate,
        Category::UnhealthyForSensitiveGroups,
        Category::Unhealthy,
        Category::VeryUnhealthy,
        Category::Hazardous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::NoData => "No data",
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for sensitive groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket an AQI value. Missing (or NaN) values map to [`Category::NoData`].
pub fn categorize(aqi: Option<f64>) -> Category {
    match aqi {
        Some(value) if !value.is_nan() => THRESHOLDS
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map(|(_, category)| *category)
            .unwrap_or(Category::Hazardous),
        _ => Category::NoData,
    }
}
