//! Breakpoint tables for the supported pollutants.
//!
//! Concentrations are in µg/m³. Each profile is a run of contiguous segments
//! starting at zero. The last segment is open-ended: its upper bound only
//! fixes the extrapolation slope, it is never used for matching, so indices
//! above 300 (and above 500) are reachable.

use super::pollutant::PollutantKey;

/// One linear piece of a pollutant profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakpointSegment {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: f64,
    pub index_high: f64,
}

impl BreakpointSegment {
    pub const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: f64,
        index_high: f64,
    ) -> Self {
        Self {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    /// Index points per µg/m³ within this segment
    pub fn slope(&self) -> f64 {
        (self.index_high - self.index_low) / (self.concentration_high - self.concentration_low)
    }

    /// Linear interpolation; callers pick the segment, no bounds are checked here
    pub fn index_at(&self, concentration: f64) -> f64 {
        self.index_low
            + ((concentration - self.concentration_low)
                / (self.concentration_high - self.concentration_low))
                * (self.index_high - self.index_low)
    }
}

/// Ordered segments for one pollutant
#[derive(Debug, Clone, Copy)]
pub struct PollutantProfile {
    pub key: PollutantKey,
    pub segments: &'static [BreakpointSegment],
}

const NO2_SEGMENTS: [BreakpointSegment; 5] = [
    BreakpointSegment::new(0.0, 40.0, 0.0, 50.0),
    BreakpointSegment::new(40.0, 90.0, 50.0, 100.0),
    BreakpointSegment::new(90.0, 120.0, 100.0, 150.0),
    BreakpointSegment::new(120.0, 230.0, 150.0, 200.0),
    BreakpointSegment::new(230.0, 400.0, 200.0, 300.0),
];

const PM10_SEGMENTS: [BreakpointSegment; 5] = [
    BreakpointSegment::new(0.0, 25.0, 0.0, 50.0),
    BreakpointSegment::new(25.0, 50.0, 50.0, 100.0),
    BreakpointSegment::new(50.0, 90.0, 100.0, 150.0),
    BreakpointSegment::new(90.0, 180.0, 150.0, 200.0),
    BreakpointSegment::new(180.0, 300.0, 200.0, 300.0),
];

const O3_SEGMENTS: [BreakpointSegment; 5] = [
    BreakpointSegment::new(0.0, 100.0, 0.0, 50.0),
    BreakpointSegment::new(100.0, 140.0, 50.0, 100.0),
    BreakpointSegment::new(140.0, 180.0, 100.0, 150.0),
    BreakpointSegment::new(180.0, 240.0, 150.0, 200.0),
    BreakpointSegment::new(240.0, 400.0, 200.0, 300.0),
];

const PM25_SEGMENTS: [BreakpointSegment; 5] = [
    BreakpointSegment::new(0.0, 15.0, 0.0, 50.0),
    BreakpointSegment::new(15.0, 30.0, 50.0, 100.0),
    BreakpointSegment::new(30.0, 55.0, 100.0, 150.0),
    BreakpointSegment::new(55.0, 110.0, 150.0, 200.0),
    BreakpointSegment::new(110.0, 200.0, 200.0, 300.0),
];

static PROFILES: [PollutantProfile; 4] = [
    PollutantProfile {
        key: PollutantKey::No2,
        segments: &NO2_SEGMENTS,
    },
    PollutantProfile {
        key: PollutantKey::Pm10,
        segments: &PM10_SEGMENTS,
    },
    PollutantProfile {
        key: PollutantKey::O3,
        segments: &O3_SEGMENTS,
    },
    PollutantProfile {
        key: PollutantKey::Pm25,
        segments: &PM25_SEGMENTS,
    },
];

/// Breakpoint profile for a pollutant
pub fn profile(key: PollutantKey) -> &'static PollutantProfile {
    match key {
        PollutantKey::No2 => &PROFILES[0],
        PollutantKey::Pm10 => &PROFILES[1],
        PollutantKey::O3 => &PROFILES[2],
        PollutantKey::Pm25 => &PROFILES[3],
    }
}

/// All profiles in canonical key order
pub fn profiles() -> &'static [PollutantProfile] {
    &PROFILES
}
