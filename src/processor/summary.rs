//! Run summaries printed after each stage

use super::meteo::EnrichedReading;
use crate::aqi::{AggregateAqiReading, AqiReading, Category};
use crate::models::Observation;
use chrono::NaiveDate;
use colored::*;
use std::collections::BTreeMap;

/// Count, mean, min and max over a stream of values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    pub count: usize,
    sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::default();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanSummary {
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl CleanSummary {
    pub fn from_observations(observations: &[Observation]) -> Self {
        Self {
            rows: observations.len(),
            first_date: observations.iter().map(|o| o.date).min(),
            last_date: observations.iter().map(|o| o.date).max(),
        }
    }

    pub fn report(&self) {
        println!("\n{}", "Clean Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Rows:".bright_cyan(),
            self.rows.to_string().bright_white().bold()
        );
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            println!("  {} {} → {}", "Date range:".bright_cyan(), first, last);
        }
    }
}

/// Category distribution and AQI range of the aggregate table
#[derive(Debug, Clone, PartialEq)]
pub struct AqiSummary {
    pub rows: usize,
    pub distribution: BTreeMap<Category, usize>,
    pub aqi: RunningStats,
}

impl AqiSummary {
    pub fn from_readings<'a, I>(readings: I) -> Self
    where
        I: IntoIterator<Item = &'a AggregateAqiReading>,
    {
        let mut rows = 0;
        let mut distribution = BTreeMap::new();
        let mut aqi = RunningStats::default();

        for reading in readings {
            rows += 1;
            *distribution.entry(reading.category).or_insert(0) += 1;
            if let Some(value) = reading.overall_aqi {
                aqi.push(value);
            }
        }

        Self {
            rows,
            distribution,
            aqi,
        }
    }

    pub fn report(&self) {
        println!("\n{}", "AQI Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Rows:".bright_cyan(),
            self.rows.to_string().bright_white().bold()
        );
        println!("  {}", "Categories:".bright_cyan());
        for (category, count) in &self.distribution {
            println!("    {:<32} {}", category.label(), count.to_string().bright_white());
        }
        println!(
            "  {} mean {}, min {}, max {}",
            "AQI:".bright_cyan(),
            one_decimal(self.aqi.mean()),
            one_decimal(self.aqi.min),
            one_decimal(self.aqi.max)
        );
    }
}

/// Sub-index statistics per raw pollutant label
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollutantSummary {
    pub by_label: BTreeMap<String, RunningStats>,
}

impl PollutantSummary {
    pub fn from_readings(readings: &[AqiReading]) -> Self {
        let mut by_label: BTreeMap<String, RunningStats> = BTreeMap::new();
        for reading in readings {
            let (Some(label), Some(index)) =
                (reading.observation.pollutant_label.as_ref(), reading.sub_index)
            else {
                continue;
            };
            by_label.entry(label.clone()).or_default().push(index);
        }
        Self { by_label }
    }

    pub fn report(&self) {
        println!("\n{}", "Individual AQI Summary".bright_green().bold());
        for (label, stats) in &self.by_label {
            println!(
                "  {:<10} count {}, mean {}, min {}, max {}",
                label.bright_cyan(),
                stats.count.to_string().bright_white(),
                one_decimal(stats.mean()),
                one_decimal(stats.min),
                one_decimal(stats.max)
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeteoSummary {
    pub rows: usize,
    pub precipitation: RunningStats,
    pub wind_speed: RunningStats,
    pub rainy_rows: usize,
    pub rows_without_meteo: usize,
}

impl MeteoSummary {
    pub fn from_readings(readings: &[EnrichedReading]) -> Self {
        Self {
            rows: readings.len(),
            precipitation: readings.iter().filter_map(|r| r.precipitation_mm).collect(),
            wind_speed: readings.iter().filter_map(|r| r.wind_speed_ms).collect(),
            rainy_rows: readings
                .iter()
                .filter(|r| r.precipitation_mm.is_some_and(|p| p > 0.0))
                .count(),
            rows_without_meteo: readings.iter().filter(|r| !r.has_meteo()).count(),
        }
    }

    pub fn report(&self) {
        println!("\n{}", "Meteo Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Rows:".bright_cyan(),
            self.rows.to_string().bright_white().bold()
        );
        println!(
            "  {} {} mm",
            "Mean precipitation:".bright_cyan(),
            one_decimal(self.precipitation.mean())
        );
        println!(
            "  {} {} m/s",
            "Mean wind speed:".bright_cyan(),
            one_decimal(self.wind_speed.mean())
        );
        println!(
            "  {} {}",
            "Rows with rain:".bright_cyan(),
            self.rainy_rows.to_string().bright_white()
        );
        if self.rows_without_meteo > 0 {
            println!(
                "  {} {}",
                "Rows without meteo data:".bright_yellow(),
                self.rows_without_meteo.to_string().bright_yellow()
            );
        }
    }
}
