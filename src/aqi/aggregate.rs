//! Wide-mode AQI: one row per station and hour, governed by the worst pollutant.

use super::category::{Category, categorize};
use super::interpolate::interpolate;
use super::pollutant::{PollutantKey, classify};
use crate::models::{Observation, ObservationKey};
use std::collections::BTreeMap;

/// Overall AQI from the sub-indices of one observation.
///
/// Absent values are ignored. An empty set (or one made only of absent
/// values) has no AQI; the overall value is never an average.
pub fn resolve<I>(sub_indices: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    sub_indices
        .into_iter()
        .flatten()
        .filter(|value| !value.is_nan())
        .fold(None, |worst: Option<f64>, value| {
            Some(worst.map_or(value, |current| current.max(value)))
        })
}

/// Station/hour row with one sub-index per pollutant present
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateAqiReading {
    pub key: ObservationKey,
    pub station_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Mean concentration per pollutant over the group's valid readings
    pub concentrations: BTreeMap<PollutantKey, f64>,
    pub sub_indices: BTreeMap<PollutantKey, f64>,
    pub overall_aqi: Option<f64>,
    pub category: Category,
}

impl AggregateAqiReading {
    /// Build the row for one station/hour group.
    ///
    /// Labels are classified first; several raw labels mapping to the same key
    /// (`NO2` and `NO2*`) are averaged together, like a pivot with a mean
    /// aggregate. Unknown pollutants and missing concentrations are skipped.
    pub fn from_group<'a, I>(key: ObservationKey, observations: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut station_name = None;
        let mut latitude = None;
        let mut longitude = None;
        let mut sums: BTreeMap<PollutantKey, (f64, usize)> = BTreeMap::new();

        for observation in observations {
            station_name = station_name.or_else(|| observation.station_name.clone());
            latitude = latitude.or(observation.latitude);
            longitude = longitude.or(observation.longitude);

            let Some(pollutant) = observation.pollutant_label.as_deref().and_then(classify)
            else {
                continue;
            };
            let Some(value) = observation.concentration.filter(|v| !v.is_nan()) else {
                continue;
            };

            let entry = sums.entry(pollutant).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        let concentrations: BTreeMap<PollutantKey, f64> = sums
            .into_iter()
            .map(|(pollutant, (sum, count))| (pollutant, sum / count as f64))
            .collect();

        let sub_indices: BTreeMap<PollutantKey, f64> = concentrations
            .iter()
            .filter_map(|(pollutant, mean)| {
                interpolate(*pollutant, *mean).map(|index| (*pollutant, index))
            })
            .collect();

        let overall_aqi = resolve(sub_indices.values().copied().map(Some));

        Self {
            key,
            station_name,
            latitude,
            longitude,
            concentrations,
            sub_indices,
            overall_aqi,
            category: categorize(overall_aqi),
        }
    }

    /// Pollutant that sets the overall AQI; ties go to the first key in canonical order
    pub fn dominant_pollutant(&self) -> Option<PollutantKey> {
        let overall = self.overall_aqi?;
        self.sub_indices
            .iter()
            .find(|(_, index)| **index == overall)
            .map(|(pollutant, _)| *pollutant)
    }
}
