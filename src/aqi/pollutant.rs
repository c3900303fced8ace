//! Canonical pollutant keys and free-text label classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pollutants with a breakpoint profile
///
/// The derive order is the column order used in wide output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PollutantKey {
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "PM2.5")]
    Pm25,
}

impl PollutantKey {
    pub const ALL: [PollutantKey; 4] = [
        PollutantKey::No2,
        PollutantKey::Pm10,
        PollutantKey::O3,
        PollutantKey::Pm25,
    ];

    /// Canonical label as it appears in the source tables
    pub fn as_str(&self) -> &'static str {
        match self {
            PollutantKey::No2 => "NO2",
            PollutantKey::Pm10 => "PM10",
            PollutantKey::O3 => "O3",
            PollutantKey::Pm25 => "PM2.5",
        }
    }
}

impl fmt::Display for PollutantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring rules, evaluated top to bottom; the first hit wins.
///
/// "PM2.5" must precede "PM10" so a label mentioning both resolves to PM2.5.
const CLASSIFICATION_RULES: [(&str, PollutantKey); 4] = [
    ("PM2.5", PollutantKey::Pm25),
    ("PM10", PollutantKey::Pm10),
    ("NO2", PollutantKey::No2),
    ("O3", PollutantKey::O3),
];

/// Map a raw pollutant label to its canonical key.
///
/// Annotated variants such as `NO2*` or ` PM10 (auto)` still classify because
/// matching is by containment after trimming. Returns `None` for labels that
/// match no rule (CO, SO2, benzene...).
pub fn classify(raw_label: &str) -> Option<PollutantKey> {
    let label = raw_label.trim();
    CLASSIFICATION_RULES
        .iter()
        .find(|(needle, _)| label.contains(needle))
        .map(|(_, key)| *key)
}
