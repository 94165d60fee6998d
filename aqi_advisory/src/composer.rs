use crate::thresholds::ThresholdTable;
use crate::types::{AdvisoryResult, Categorization, SensitiveGroup, GENERAL_GROUP};

/// Lowest AQI at which a sensitive group gets the extra caution sentence.
pub const SENSITIVE_GROUP_MIN_AQI: f64 = 101.0;

/// Trait for AQI band classification.
pub trait AqiClassifier {
    /// Category and base advice; out-of-range input resolves to `Unknown`.
    fn categorize(&self, aqi: f64) -> Categorization<'_>;
}

impl AqiClassifier for ThresholdTable {
    fn categorize(&self, aqi: f64) -> Categorization<'_> {
        match self.lookup(aqi) {
            Some(entry) => {
                tracing::debug!(aqi, category = %entry.category, "classified AQI");
                Categorization {
                    category: entry.category,
                    advice: &entry.advice,
                }
            }
            None => {
                tracing::debug!(aqi, "AQI outside table, category Unknown");
                Categorization::unknown()
            }
        }
    }
}

impl<C: AqiClassifier + ?Sized> AqiClassifier for &C {
    fn categorize(&self, aqi: f64) -> Categorization<'_> {
        (**self).categorize(aqi)
    }
}

/// Group-specific guidance appended to elevated-band advice.
pub fn caution_sentence(group: SensitiveGroup) -> String {
    format!(
        "{} should consider limiting outdoor exertion, wearing masks, and staying indoors if possible.",
        group.name()
    )
}

/// Combines classification with optional sensitive-group guidance.
#[derive(Debug, Clone)]
pub struct AdvisoryComposer<C: AqiClassifier> {
    classifier: C,
}

impl AdvisoryComposer<&'static ThresholdTable> {
    pub fn canonical() -> Self {
        Self::new(ThresholdTable::canonical())
    }
}

impl<C: AqiClassifier> AdvisoryComposer<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn categorize(&self, aqi: f64) -> Categorization<'_> {
        self.classifier.categorize(aqi)
    }

    /// Build the advisory for `aqi` and an optional group name.
    ///
    /// The caution sentence is appended once, only for a recognized group at
    /// `aqi >= 101` in a band from `UnhealthyForSensitiveGroups` up. The
    /// supplied group is echoed back verbatim whether or not it is
    /// recognized; empty or missing is "General".
    pub fn compose(&self, aqi: f64, group: Option<&str>) -> AdvisoryResult {
        let Categorization { category, advice } = self.classifier.categorize(aqi);
        let mut advice = advice.to_owned();
        let supplied = group.filter(|g| !g.is_empty());

        if let Some(name) = supplied {
            match SensitiveGroup::parse(name) {
                Some(g) if category.affects_sensitive_groups() && aqi >= SENSITIVE_GROUP_MIN_AQI => {
                    advice.push(' ');
                    advice.push_str(&caution_sentence(g));
                }
                Some(_) => {}
                None => tracing::warn!(group = name, "unrecognized sensitive group, no caution added"),
            }
        }

        AdvisoryResult::new(
            category,
            advice,
            supplied.unwrap_or(GENERAL_GROUP).to_owned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::{canonical_entries, ThresholdEntry};
    use crate::types::{AqiCategory, OUT_OF_RANGE_ADVICE};

    const GOOD: &str =
        "Air quality is considered satisfactory, and air pollution poses little or no risk.";
    const MODERATE: &str = "Air quality is acceptable; however, there may be a risk for some people, particularly those who are unusually sensitive to air pollution.";
    const USG: &str = "Members of sensitive groups may experience health effects. The general public is less likely to be affected.";
    const UNHEALTHY: &str = "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects.";

    fn composer() -> AdvisoryComposer<&'static ThresholdTable> {
        AdvisoryComposer::canonical()
    }

    #[test]
    fn categorize_returns_table_advice_verbatim() {
        let c = composer();
        assert_eq!(
            c.categorize(30.0),
            Categorization {
                category: AqiCategory::Good,
                advice: GOOD
            }
        );
        assert_eq!(c.categorize(75.0).advice, MODERATE);
        assert_eq!(c.categorize(120.0).advice, USG);
        assert_eq!(c.categorize(180.0).category, AqiCategory::Unhealthy);
        assert_eq!(c.categorize(250.0).category, AqiCategory::VeryUnhealthy);
        assert_eq!(c.categorize(400.0).category, AqiCategory::Hazardous);
    }

    #[test]
    fn categorize_out_of_range_is_unknown() {
        let c = composer();
        for aqi in [-1.0, 500.5, 600.0, f64::NAN, f64::INFINITY] {
            let got = c.categorize(aqi);
            assert_eq!(got.category, AqiCategory::Unknown);
            assert_eq!(got.advice, OUT_OF_RANGE_ADVICE);
        }
    }

    #[test]
    fn general_when_no_group() {
        let r = composer().compose(30.0, None);
        assert_eq!(r.category(), AqiCategory::Good);
        assert_eq!(r.advice(), GOOD);
        assert_eq!(r.group(), "General");

        let r = composer().compose(30.0, Some(""));
        assert_eq!(r.group(), "General");
    }

    #[test]
    fn caution_appended_for_sensitive_group_at_elevated_aqi() {
        let r = composer().compose(120.0, Some("Children"));
        assert_eq!(r.category(), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(
            r.advice(),
            format!("{USG} Children should consider limiting outdoor exertion, wearing masks, and staying indoors if possible.")
        );
        assert_eq!(r.group(), "Children");

        let r = composer().compose(180.0, Some("Elderly"));
        assert_eq!(
            r.advice(),
            format!("{UNHEALTHY} Elderly should consider limiting outdoor exertion, wearing masks, and staying indoors if possible.")
        );
    }

    #[test]
    fn no_caution_below_threshold_or_when_unknown() {
        let r = composer().compose(75.0, Some("Pregnant women"));
        assert_eq!(r.category(), AqiCategory::Moderate);
        assert_eq!(r.advice(), MODERATE);
        assert_eq!(r.group(), "Pregnant women");

        // Between bands: still Moderate, still below 101.
        let r = composer().compose(100.5, Some("Children"));
        assert_eq!(r.advice(), MODERATE);

        let r = composer().compose(600.0, Some("Elderly"));
        assert_eq!(r.category(), AqiCategory::Unknown);
        assert_eq!(r.advice(), OUT_OF_RANGE_ADVICE);
        assert_eq!(r.group(), "Elderly");
    }

    #[test]
    fn caution_follows_the_band_not_just_the_number() {
        let table = ThresholdTable::new(vec![
            ThresholdEntry::new(0.0, 50.0, AqiCategory::Good, "Clear."),
            ThresholdEntry::new(51.0, 150.0, AqiCategory::Moderate, "Fair."),
            ThresholdEntry::new(151.0, 500.0, AqiCategory::Unhealthy, "Poor."),
        ])
        .unwrap();
        let c = AdvisoryComposer::new(table);

        let r = c.compose(120.0, Some("Children"));
        assert_eq!(r.category(), AqiCategory::Moderate);
        assert_eq!(r.advice(), "Fair.");

        let r = c.compose(160.0, Some("Children"));
        assert_eq!(
            r.advice(),
            "Poor. Children should consider limiting outdoor exertion, wearing masks, and staying indoors if possible."
        );
    }

    #[test]
    fn unrecognized_group_is_echoed_without_caution() {
        let r = composer().compose(250.0, Some("Athletes"));
        assert_eq!(r.category(), AqiCategory::VeryUnhealthy);
        assert_eq!(
            r.advice(),
            "Health alert: everyone may experience more serious health effects."
        );
        assert_eq!(r.group(), "Athletes");
    }

    #[test]
    fn composing_does_not_touch_the_table() {
        let table = ThresholdTable::new(canonical_entries()).unwrap();
        let c = AdvisoryComposer::new(&table);
        let first = c.compose(350.0, Some("People with respiratory or heart diseases"));
        let second = c.compose(350.0, Some("People with respiratory or heart diseases"));
        assert_eq!(first, second);
        assert!(first
            .advice()
            .ends_with("People with respiratory or heart diseases should consider limiting outdoor exertion, wearing masks, and staying indoors if possible."));
        assert_eq!(table.entries(), canonical_entries().as_slice());
    }

    #[test]
    fn custom_tables_plug_in() {
        let mut entries = canonical_entries();
        entries[0] = ThresholdEntry::new(0.0, 50.0, AqiCategory::Good, "Clear skies.");
        let table = ThresholdTable::new(entries).unwrap();
        let r = AdvisoryComposer::new(table).compose(10.0, None);
        assert_eq!(r.advice(), "Clear skies.");
    }
}
