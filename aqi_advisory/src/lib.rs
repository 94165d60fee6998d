#![forbid(unsafe_code)]

//! AQI categorization, pollutant-based AQI estimation and group-aware health
//! advisories.
//!
//! pollutant readings -> [`estimate`] -> AQI -> [`categorize`] -> [`compose`]
//!
//! Every operation is pure and synchronous. The band table and estimator
//! weights are immutable process-wide values; out-of-range AQI and unusable
//! readings degrade to well-defined outputs instead of errors.

pub mod composer;
pub mod config;
pub mod estimator;
pub mod guards;
pub mod pollutants;
pub mod thresholds;
pub mod types;

pub use composer::{caution_sentence, AdvisoryComposer, AqiClassifier};
pub use config::{Advisor, AdvisoryConfig, ConfigError};
pub use estimator::{AqiEstimator, EstimatorWeights, PollutantVector, WeightedSumEstimator};
pub use guards::{handle_json, RequestError, RequestHandler};
pub use pollutants::{LevelReport, LevelStatus, Pollutant, PollutantSpec};
pub use thresholds::{TableError, ThresholdEntry, ThresholdTable, MAX_AQI, MIN_AQI};
pub use types::{AdvisoryResult, AqiCategory, Categorization, SensitiveGroup};

/// Category and base advice for `aqi` from the canonical table.
pub fn categorize(aqi: f64) -> Categorization<'static> {
    ThresholdTable::canonical().categorize(aqi)
}

/// Canonical weighted-sum AQI estimate, always in [0, 500].
pub fn estimate(pollutants: &PollutantVector) -> f64 {
    Advisor::canonical().estimator.estimate(pollutants)
}

/// Canonical advisory for `aqi` and an optional sensitive-group name.
pub fn compose(aqi: f64, group: Option<&str>) -> AdvisoryResult {
    Advisor::canonical().composer.compose(aqi, group)
}
