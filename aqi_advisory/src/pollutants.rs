//! Per-pollutant reference ranges and warning/severe level checks.
//!
//! Thresholds are illustrative reference data for operator dashboards; they
//! do not feed the AQI estimate.

use std::fmt;

use serde::{Serialize, Serializer};

/// Pollutants with reference data. The first six also feed the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    No2,
    So2,
    Co,
    O3,
    Pm10,
    Pm25,
    Nh3,
    Pb,
    Co2,
    Ch4,
}

impl Pollutant {
    pub const ALL: [Pollutant; 10] = [
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::Nh3,
        Pollutant::Pb,
        Pollutant::Co2,
        Pollutant::Ch4,
    ];

    /// ASCII symbol, e.g. "PM2.5".
    pub fn symbol(&self) -> &'static str {
        match self {
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Nh3 => "NH3",
            Pollutant::Pb => "Pb",
            Pollutant::Co2 => "CO2",
            Pollutant::Ch4 => "CH4",
        }
    }

    /// Symbol with subscript digits, as shown on dashboards.
    pub fn display_symbol(&self) -> &'static str {
        match self {
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O₃",
            Pollutant::Pm10 => "PM₁₀",
            Pollutant::Pm25 => "PM₂.₅",
            Pollutant::Nh3 => "NH₃",
            Pollutant::Pb => "Pb",
            Pollutant::Co2 => "CO₂",
            Pollutant::Ch4 => "CH₄",
        }
    }

    /// Position in the estimator's reading vector, if it has one.
    pub fn vector_index(&self) -> Option<usize> {
        match self {
            Pollutant::No2 => Some(0),
            Pollutant::So2 => Some(1),
            Pollutant::Co => Some(2),
            Pollutant::O3 => Some(3),
            Pollutant::Pm10 => Some(4),
            Pollutant::Nh3 => Some(5),
            _ => None,
        }
    }

    /// Exact symbol match first, then case/subscript/punctuation-insensitive.
    pub fn lookup(name: &str) -> Option<Self> {
        if let Some(p) = Self::ALL
            .into_iter()
            .find(|p| p.symbol() == name || p.display_symbol() == name)
        {
            return Some(p);
        }
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|p| normalize_name(p.symbol()) == wanted)
    }

    pub fn spec(&self) -> &'static PollutantSpec {
        // SPECS is declared in variant order.
        &SPECS[*self as usize]
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Pollutant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// Lower-case, fold subscript digits to ASCII, drop everything non-alphanumeric.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '₀'..='₉' => char::from(b'0' + (c as u32 - '₀' as u32) as u8),
            _ => c,
        })
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Reference data for one pollutant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantSpec {
    pub pollutant: Pollutant,
    pub unit: &'static str,
    /// Accepted input range for data entry.
    pub min: f64,
    pub max: f64,
    /// Typical ambient reading used to pre-fill inputs.
    pub default: f64,
    pub warning_threshold: f64,
    pub severe_threshold: f64,
    pub description: &'static str,
    pub health_effects: &'static str,
}

static SPECS: [PollutantSpec; 10] = [
    PollutantSpec {
        pollutant: Pollutant::No2,
        unit: "µg/m³",
        min: 0.0,
        max: 1000.0,
        default: 40.0,
        warning_threshold: 100.0,
        severe_threshold: 200.0,
        description: "Nitrogen dioxide",
        health_effects: "Irritation of airways; respiratory symptoms.",
    },
    PollutantSpec {
        pollutant: Pollutant::So2,
        unit: "µg/m³",
        min: 0.0,
        max: 1000.0,
        default: 20.0,
        warning_threshold: 80.0,
        severe_threshold: 200.0,
        description: "Sulfur dioxide",
        health_effects: "Breathing difficulty for asthmatics; throat irritation.",
    },
    PollutantSpec {
        pollutant: Pollutant::Co,
        unit: "mg/m³",
        min: 0.0,
        max: 100.0,
        default: 0.5,
        warning_threshold: 5.0,
        severe_threshold: 30.0,
        description: "Carbon monoxide",
        health_effects: "Reduces oxygen delivery to the body.",
    },
    PollutantSpec {
        pollutant: Pollutant::O3,
        unit: "µg/m³",
        min: 0.0,
        max: 1000.0,
        default: 30.0,
        warning_threshold: 100.0,
        severe_threshold: 180.0,
        description: "Ozone",
        health_effects: "Respiratory irritation and reduced lung function.",
    },
    PollutantSpec {
        pollutant: Pollutant::Pm10,
        unit: "µg/m³",
        min: 0.0,
        max: 1000.0,
        default: 60.0,
        warning_threshold: 100.0,
        severe_threshold: 250.0,
        description: "Particulate matter 10µm",
        health_effects: "Aggravates respiratory illness.",
    },
    PollutantSpec {
        pollutant: Pollutant::Pm25,
        unit: "µg/m³",
        min: 0.0,
        max: 1000.0,
        default: 40.0,
        warning_threshold: 60.0,
        severe_threshold: 150.0,
        description: "Fine particulate matter 2.5µm",
        health_effects: "Penetrates deep into lungs and bloodstream.",
    },
    PollutantSpec {
        pollutant: Pollutant::Nh3,
        unit: "µg/m³",
        min: 0.0,
        max: 10000.0,
        default: 10.0,
        warning_threshold: 400.0,
        severe_threshold: 1000.0,
        description: "Ammonia",
        health_effects: "Irritation to eyes and respiratory tract.",
    },
    PollutantSpec {
        pollutant: Pollutant::Pb,
        unit: "µg/m³",
        min: 0.0,
        max: 10.0,
        default: 0.1,
        warning_threshold: 0.5,
        severe_threshold: 1.0,
        description: "Lead",
        health_effects: "Neurotoxin; long-term exposure harmful.",
    },
    PollutantSpec {
        pollutant: Pollutant::Co2,
        unit: "ppm",
        min: 0.0,
        max: 5000.0,
        default: 410.0,
        warning_threshold: 1000.0,
        severe_threshold: 5000.0,
        description: "Carbon dioxide",
        health_effects: "High levels cause drowsiness and headaches.",
    },
    PollutantSpec {
        pollutant: Pollutant::Ch4,
        unit: "ppm",
        min: 0.0,
        max: 10000.0,
        default: 1.9,
        warning_threshold: 50.0,
        severe_threshold: 1000.0,
        description: "Methane",
        health_effects: "Asphyxiant at very high concentrations.",
    },
];

/// Three-level status of a single reading against its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelStatus {
    Normal,
    Warning,
    Severe,
}

/// Outcome of checking one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    pub pollutant: Pollutant,
    pub value: f64,
    pub unit: &'static str,
    pub status: LevelStatus,
    pub message: String,
    /// Percent above the warning threshold; only set when not `Normal`.
    pub exceedance_pct: Option<f64>,
}

impl PollutantSpec {
    pub fn all() -> &'static [PollutantSpec] {
        &SPECS
    }

    pub fn lookup(name: &str) -> Option<&'static PollutantSpec> {
        Pollutant::lookup(name).map(|p| p.spec())
    }

    /// Severe at or above `severe_threshold`, Warning at or above `warning_threshold`.
    pub fn check_level(&self, value: f64) -> LevelStatus {
        if value >= self.severe_threshold {
            LevelStatus::Severe
        } else if value >= self.warning_threshold {
            LevelStatus::Warning
        } else {
            LevelStatus::Normal
        }
    }

    pub fn exceedance_pct(&self, value: f64) -> f64 {
        if self.warning_threshold <= 0.0 {
            0.0
        } else {
            (value / self.warning_threshold - 1.0) * 100.0
        }
    }

    pub fn report(&self, value: f64) -> LevelReport {
        let status = self.check_level(value);
        let symbol = self.pollutant.symbol();
        let message = match status {
            LevelStatus::Severe => format!(
                "{symbol} level is {value:.1} {} - SEVERE! {} Recommended action: immediate reduction needed.",
                self.unit, self.health_effects
            ),
            LevelStatus::Warning => format!(
                "{symbol} level is {value:.1} {} - HIGH! {} Recommended action: consider reduction measures.",
                self.unit, self.health_effects
            ),
            LevelStatus::Normal => format!("{symbol} level is within acceptable range"),
        };
        if status != LevelStatus::Normal {
            tracing::debug!(pollutant = symbol, value, ?status, "pollutant above threshold");
        }
        LevelReport {
            pollutant: self.pollutant,
            value,
            unit: self.unit,
            status,
            message,
            exceedance_pct: (status != LevelStatus::Normal).then(|| self.exceedance_pct(value)),
        }
    }
}
