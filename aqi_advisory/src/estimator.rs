use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::pollutants::Pollutant;
use crate::thresholds::{MAX_AQI, MIN_AQI};

/// Fixed reading order x = [NO2, SO2, CO, O3, PM10, NH3].
pub const VECTOR_ORDER: [Pollutant; 6] = [
    Pollutant::No2,
    Pollutant::So2,
    Pollutant::Co,
    Pollutant::O3,
    Pollutant::Pm10,
    Pollutant::Nh3,
];

/// Six pollutant readings in `VECTOR_ORDER`. Every slot is finite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PollutantVector([f64; 6]);

impl PollutantVector {
    /// Non-finite readings are stored as 0.0.
    pub fn new(readings: [f64; 6]) -> Self {
        let mut values = [0.0; 6];
        for (slot, (value, pollutant)) in values.iter_mut().zip(readings.iter().zip(VECTOR_ORDER)) {
            *slot = sanitize(*value, pollutant);
        }
        Self(values)
    }

    /// Positional readings; missing trailing entries read as 0.0, extras are ignored.
    pub fn from_slice(readings: &[f64]) -> Self {
        let mut values = [0.0; 6];
        for (slot, value) in values.iter_mut().zip(readings) {
            *slot = *value;
        }
        Self::new(values)
    }

    /// Positional JSON readings; anything that is not a number reads as 0.0.
    pub fn from_json_values(readings: &[Value]) -> Self {
        let mut values = [0.0; 6];
        for ((slot, value), pollutant) in values.iter_mut().zip(readings).zip(VECTOR_ORDER) {
            *slot = reading_from_json(value).unwrap_or_else(|| {
                tracing::warn!(pollutant = pollutant.symbol(), %value, "non-numeric reading counted as 0.0");
                0.0
            });
        }
        Self::new(values)
    }

    /// Readings keyed by pollutant name in any accepted spelling.
    /// Unrecognized names and pollutants outside the vector are ignored.
    pub fn from_named<'a, I>(readings: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values = [0.0; 6];
        for (name, value) in readings {
            match Pollutant::lookup(name).and_then(|p| p.vector_index()) {
                Some(index) => values[index] = value,
                None => tracing::debug!(name, "reading not used by the estimator"),
            }
        }
        Self::new(values)
    }

    /// JSON object keyed by pollutant name; non-numeric values read as 0.0.
    pub fn from_json_object(readings: &serde_json::Map<String, Value>) -> Self {
        Self::from_named(readings.iter().map(|(name, value)| {
            let reading = reading_from_json(value).unwrap_or_else(|| {
                tracing::warn!(name = name.as_str(), %value, "non-numeric reading counted as 0.0");
                0.0
            });
            (name.as_str(), reading)
        }))
    }

    pub fn get(&self, pollutant: Pollutant) -> f64 {
        pollutant.vector_index().map_or(0.0, |i| self.0[i])
    }

    pub fn values(&self) -> &[f64; 6] {
        &self.0
    }
}

fn sanitize(value: f64, pollutant: Pollutant) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(pollutant = pollutant.symbol(), value, "non-finite reading counted as 0.0");
        0.0
    }
}

/// Numbers and numeric strings are readings; everything else is not.
pub fn reading_from_json(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Weight configuration for the linear heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorWeights {
    /// Per-position weights for `VECTOR_ORDER`.
    pub weights: [f64; 6],
    /// Normalizing divisor applied to the weighted sum.
    pub divisor: f64,
}

impl Default for EstimatorWeights {
    fn default() -> Self {
        EstimatorWeights {
            weights: [0.8, 0.6, 0.2, 0.5, 1.2, 0.1],
            divisor: 2.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weight for {pollutant} must be finite and non-negative, got {value}")]
    InvalidWeight { pollutant: &'static str, value: f64 },
    #[error("divisor must be finite and positive, got {0}")]
    InvalidDivisor(f64),
}

impl EstimatorWeights {
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (value, pollutant) in self.weights.iter().zip(VECTOR_ORDER) {
            if !value.is_finite() || *value < 0.0 {
                return Err(WeightsError::InvalidWeight {
                    pollutant: pollutant.symbol(),
                    value: *value,
                });
            }
        }
        if !self.divisor.is_finite() || self.divisor <= 0.0 {
            return Err(WeightsError::InvalidDivisor(self.divisor));
        }
        Ok(())
    }
}

/// Anything that turns a pollutant vector into an AQI estimate.
pub trait AqiEstimator {
    /// Always a finite value in [0, 500].
    fn estimate(&self, readings: &PollutantVector) -> f64;
}

/// Weighted sum / divisor, clamped to [0, 500] and rounded to one decimal.
/// A deterministic heuristic, not a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSumEstimator {
    weights: EstimatorWeights,
}

impl WeightedSumEstimator {
    pub fn new(weights: EstimatorWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &EstimatorWeights {
        &self.weights
    }
}

impl Default for WeightedSumEstimator {
    fn default() -> Self {
        Self {
            weights: EstimatorWeights::default(),
        }
    }
}

impl AqiEstimator for WeightedSumEstimator {
    fn estimate(&self, readings: &PollutantVector) -> f64 {
        let total: f64 = readings
            .values()
            .iter()
            .zip(self.weights.weights.iter())
            .map(|(v, w)| v * w)
            .sum();
        let raw = total / self.weights.divisor;

        // Overflowing sums of opposite sign can produce NaN.
        let clamped = if raw.is_nan() {
            MIN_AQI
        } else {
            raw.clamp(MIN_AQI, MAX_AQI)
        };
        let aqi = round_tenth(clamped);
        tracing::debug!(total, aqi, "estimated AQI from pollutant vector");
        aqi
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn estimate(readings: [f64; 6]) -> f64 {
        WeightedSumEstimator::default().estimate(&PollutantVector::new(readings))
    }

    #[test]
    fn zero_vector_estimates_zero() {
        assert_eq!(estimate([0.0; 6]), 0.0);
    }

    #[test]
    fn weighted_sum_is_halved_and_rounded() {
        // 0.8*40 + 0.6*20 + 0.2*1 + 0.5*30 + 1.2*60 + 0.1*10 = 132.2
        assert_eq!(estimate([40.0, 20.0, 1.0, 30.0, 60.0, 10.0]), 66.1);
        assert_eq!(estimate([0.0, 0.0, 0.0, 0.0, 10.0, 0.0]), 6.0);
        assert_eq!(estimate([0.0, 0.0, 0.0, 0.0, 0.0, 4.0]), 0.2);
        // 0.5 * 0.33 / 2 = 0.0825
        assert_eq!(estimate([0.0, 0.0, 0.0, 0.33, 0.0, 0.0]), 0.1);
    }

    #[test]
    fn clamps_to_aqi_range() {
        assert_eq!(estimate([1.0e6; 6]), 500.0);
        assert_eq!(estimate([-1.0e6; 6]), 0.0);
        assert_eq!(estimate([f64::MAX, 0.0, 0.0, 0.0, f64::MAX, 0.0]), 500.0);
    }

    #[test]
    fn non_finite_readings_contribute_nothing() {
        let v = PollutantVector::new([f64::NAN, f64::INFINITY, 0.0, 0.0, 10.0, f64::NEG_INFINITY]);
        assert_eq!(v.values(), &[0.0, 0.0, 0.0, 0.0, 10.0, 0.0]);
        assert_eq!(WeightedSumEstimator::default().estimate(&v), 6.0);
    }

    #[test]
    fn short_vectors_are_zero_padded() {
        let v = PollutantVector::from_slice(&[10.0, 10.0]);
        assert_eq!(v.values(), &[10.0, 10.0, 0.0, 0.0, 0.0, 0.0]);
        let v = PollutantVector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(v.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn json_readings_tolerate_junk() {
        let values = vec![json!(40), json!("20"), json!(null), json!("abc"), json!(60.0), json!([1])];
        let v = PollutantVector::from_json_values(&values);
        assert_eq!(v.values(), &[40.0, 20.0, 0.0, 0.0, 60.0, 0.0]);
    }

    #[test]
    fn named_readings_accept_any_spelling() {
        let v = PollutantVector::from_named([("NO₂", 40.0), ("pm10", 60.0), ("PM2.5", 99.0), ("dust", 5.0)]);
        assert_eq!(v.get(Pollutant::No2), 40.0);
        assert_eq!(v.get(Pollutant::Pm10), 60.0);
        assert_eq!(v.get(Pollutant::Pm25), 0.0);
        assert_eq!(v.values(), &[40.0, 0.0, 0.0, 0.0, 60.0, 0.0]);

        let obj = json!({"NO2": 40, "SO₂": "oops", "NH3": 10});
        let v = PollutantVector::from_json_object(obj.as_object().unwrap());
        assert_eq!(v.values(), &[40.0, 0.0, 0.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn weights_are_validated() {
        assert!(EstimatorWeights::default().validate().is_ok());

        let mut negative = EstimatorWeights::default();
        negative.weights[4] = -1.0;
        assert_eq!(
            WeightedSumEstimator::new(negative),
            Err(WeightsError::InvalidWeight {
                pollutant: "PM10",
                value: -1.0
            })
        );

        let zero_divisor = EstimatorWeights {
            divisor: 0.0,
            ..EstimatorWeights::default()
        };
        assert_eq!(
            WeightedSumEstimator::new(zero_divisor),
            Err(WeightsError::InvalidDivisor(0.0))
        );
    }
}
