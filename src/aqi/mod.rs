//! Air Quality Index computation.
//!
//! Everything in this module is pure: pollutant labels are classified into
//! canonical keys, concentrations are mapped onto a 0–500+ scale through
//! fixed breakpoint tables, and the resulting values are bucketed into
//! severity categories. Two scoring modes sit on top of the same
//! interpolator:
//!
//! - individual: every measurement gets its own sub-index ([`AqiReading`])
//! - aggregate: one row per station and hour whose AQI is the maximum of the
//!   pollutants present ([`AggregateAqiReading`])

pub mod aggregate;
pub mod breakpoints;
pub mod category;
pub mod interpolate;
pub mod pollutant;
pub mod reading;

pub use aggregate::{AggregateAqiReading, resolve};
pub use breakpoints::{BreakpointSegment, PollutantProfile, profile, profiles};
pub use category::{Category, categorize};
pub use interpolate::{interpolate, interpolate_opt};
pub use pollutant::{PollutantKey, classify};
pub use reading::{AqiReading, score_individually};
