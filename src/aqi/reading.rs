//! Per-measurement AQI readings (long/individual mode).

use super::category::{Category, categorize};
use super::interpolate::interpolate_opt;
use super::pollutant::{PollutantKey, classify};
use crate::models::Observation;

/// An observation scored on its own
#[derive(Debug, Clone, PartialEq)]
pub struct AqiReading {
    pub observation: Observation,
    /// `None` when the label matches no known pollutant
    pub pollutant_key: Option<PollutantKey>,
    /// `None` when the pollutant is unknown or the concentration is unusable
    pub sub_index: Option<f64>,
    pub category: Category,
}

impl AqiReading {
    pub fn from_observation(observation: Observation) -> Self {
        let pollutant_key = observation.pollutant_label.as_deref().and_then(classify);
        let sub_index =
            pollutant_key.and_then(|key| interpolate_opt(key, observation.concentration));

        Self {
            observation,
            pollutant_key,
            sub_index,
            category: categorize(sub_index),
        }
    }

    pub fn has_index(&self) -> bool {
        self.sub_index.is_some()
    }
}

/// Score every observation independently, preserving input order
pub fn score_individually(observations: Vec<Observation>) -> Vec<AqiReading> {
    observations
        .into_iter()
        .map(AqiReading::from_observation)
        .collect()
}
