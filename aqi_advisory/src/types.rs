use std::fmt;

use serde::{Deserialize, Serialize};

/// Group label echoed back when the caller supplies none.
pub const GENERAL_GROUP: &str = "General";

/// Advice returned for AQI values outside the table.
pub const OUT_OF_RANGE_ADVICE: &str = "AQI value out of range. Please check the input.";

/// Qualitative health-risk label for an AQI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    /// Only produced for non-finite or out-of-range input, never stored in a table.
    Unknown,
}

impl AqiCategory {
    /// The six categories a threshold table may use, mildest first.
    pub const BANDED: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    /// Wire name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "UnhealthyForSensitiveGroups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "VeryUnhealthy",
            AqiCategory::Hazardous => "Hazardous",
            AqiCategory::Unknown => "Unknown",
        }
    }

    /// Human-readable label for dashboards and terminals.
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
            AqiCategory::Unknown => "Unknown",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AqiCategory::Good => "🟢",
            AqiCategory::Moderate => "🟡",
            AqiCategory::UnhealthyForSensitiveGroups => "🟠",
            AqiCategory::Unhealthy => "🔴",
            AqiCategory::VeryUnhealthy => "🟣",
            AqiCategory::Hazardous => "⚫️",
            AqiCategory::Unknown => "❓",
        }
    }

    /// Short general-public recommendation; empty for `Unknown`.
    pub fn recommendation(&self) -> &'static str {
        match self {
            AqiCategory::Good => "No special precautions needed.",
            AqiCategory::Unknown => "",
            _ => "Reduce prolonged outdoor exertion.",
        }
    }

    /// True from `UnhealthyForSensitiveGroups` upwards.
    pub fn affects_sensitive_groups(&self) -> bool {
        !matches!(
            self,
            AqiCategory::Good | AqiCategory::Moderate | AqiCategory::Unknown
        )
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population subgroups that get an extra caution sentence at elevated AQI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensitiveGroup {
    Children,
    Elderly,
    RespiratoryOrHeartDisease,
    PregnantWomen,
}

impl SensitiveGroup {
    pub const ALL: [SensitiveGroup; 4] = [
        SensitiveGroup::Children,
        SensitiveGroup::Elderly,
        SensitiveGroup::RespiratoryOrHeartDisease,
        SensitiveGroup::PregnantWomen,
    ];

    /// The exact name callers use to select this group.
    pub fn name(&self) -> &'static str {
        match self {
            SensitiveGroup::Children => "Children",
            SensitiveGroup::Elderly => "Elderly",
            SensitiveGroup::RespiratoryOrHeartDisease => "People with respiratory or heart diseases",
            SensitiveGroup::PregnantWomen => "Pregnant women",
        }
    }

    /// Exact-match lookup. Anything else is "no recognized group", not an error.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }
}

impl fmt::Display for SensitiveGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category and base advice for one AQI value, borrowed from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Categorization<'a> {
    pub category: AqiCategory,
    pub advice: &'a str,
}

impl Categorization<'static> {
    pub const fn unknown() -> Self {
        Categorization {
            category: AqiCategory::Unknown,
            advice: OUT_OF_RANGE_ADVICE,
        }
    }
}

/// Final advisory record; the sole output contract of the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryResult {
    aqi_category: AqiCategory,
    advice: String,
    group: String,
}

impl AdvisoryResult {
    pub(crate) fn new(aqi_category: AqiCategory, advice: String, group: String) -> Self {
        Self {
            aqi_category,
            advice,
            group,
        }
    }

    pub fn category(&self) -> AqiCategory {
        self.aqi_category
    }

    pub fn advice(&self) -> &str {
        &self.advice
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Plain-text rendering for terminals: status line, advice, then the
    /// category recommendation when there is one.
    pub fn status_text(&self) -> String {
        let category = self.aqi_category;
        let mut text = format!(
            "Status: {} {}\n{}",
            category.emoji(),
            category.label(),
            self.advice
        );
        let recommendation = category.recommendation();
        if !recommendation.is_empty() {
            text.push_str("\nRecommendation: ");
            text.push_str(recommendation);
        }
        text
    }
}
