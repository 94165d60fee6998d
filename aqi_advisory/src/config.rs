//! Process-wide advisory configuration.
//!
//! The default is the canonical band table and estimator weights. A JSON file
//! with the same shape may replace either part; it is validated once when
//! loaded and never changes afterwards.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composer::AdvisoryComposer;
use crate::estimator::{EstimatorWeights, WeightedSumEstimator, WeightsError};
use crate::thresholds::{canonical_entries, TableError, ThresholdEntry, ThresholdTable};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid threshold table: {0}")]
    Table(#[from] TableError),
    #[error("invalid estimator weights: {0}")]
    Weights(#[from] WeightsError),
}

/// On-disk shape of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub thresholds: Vec<ThresholdEntry>,
    pub weights: EstimatorWeights,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            thresholds: canonical_entries(),
            weights: EstimatorWeights::default(),
        }
    }
}

impl AdvisoryConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AdvisoryConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), bands = config.thresholds.len(), "loaded advisory config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ThresholdTable::new(self.thresholds.clone())?;
        self.weights.validate()?;
        Ok(())
    }

    /// Freeze into the runtime components.
    pub fn build(self) -> Result<Advisor, ConfigError> {
        Ok(Advisor {
            composer: AdvisoryComposer::new(ThresholdTable::new(self.thresholds)?),
            estimator: WeightedSumEstimator::new(self.weights)?,
        })
    }
}

/// Immutable composer + estimator pair built from one configuration.
#[derive(Debug, Clone)]
pub struct Advisor {
    pub composer: AdvisoryComposer<ThresholdTable>,
    pub estimator: WeightedSumEstimator,
}

impl Advisor {
    /// The canonical advisor, built once on first use.
    pub fn canonical() -> &'static Advisor {
        static CANONICAL: OnceLock<Advisor> = OnceLock::new();
        CANONICAL.get_or_init(|| Advisor {
            composer: AdvisoryComposer::new(ThresholdTable::canonical().clone()),
            estimator: WeightedSumEstimator::default(),
        })
    }
}
