use aqi_advisory::{categorize, compose, estimate, AqiCategory, PollutantVector};
use proptest::prelude::*;
use proptest::test_runner::Config;

const OUT_OF_RANGE: &str = "AQI value out of range. Please check the input.";

const BANDS: [(u32, u32, AqiCategory, &str); 6] = [
    (0, 50, AqiCategory::Good, "Air quality is considered satisfactory, and air pollution poses little or no risk."),
    (51, 100, AqiCategory::Moderate, "Air quality is acceptable; however, there may be a risk for some people, particularly those who are unusually sensitive to air pollution."),
    (101, 150, AqiCategory::UnhealthyForSensitiveGroups, "Members of sensitive groups may experience health effects. The general public is less likely to be affected."),
    (151, 200, AqiCategory::Unhealthy, "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects."),
    (201, 300, AqiCategory::VeryUnhealthy, "Health alert: everyone may experience more serious health effects."),
    (301, 500, AqiCategory::Hazardous, "Health warnings of emergency conditions. The entire population is more likely to be affected."),
];

#[test]
fn every_integer_aqi_maps_to_its_band() {
    for (lower, upper, category, advice) in BANDS {
        for aqi in lower..=upper {
            let got = categorize(aqi as f64);
            assert_eq!(got.category, category, "aqi {aqi}");
            assert_eq!(got.advice, advice, "aqi {aqi}");
        }
    }
}

#[test]
fn non_finite_aqi_is_unknown() {
    for aqi in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let got = categorize(aqi);
        assert_eq!(got.category, AqiCategory::Unknown);
        assert_eq!(got.advice, OUT_OF_RANGE);
    }
}

#[test]
fn zero_readings_estimate_zero() {
    assert_eq!(estimate(&PollutantVector::new([0.0; 6])), 0.0);
}

#[test]
fn compose_general_good() {
    let json = serde_json::to_value(compose(30.0, None)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "aqi_category": "Good",
            "advice": "Air quality is considered satisfactory, and air pollution poses little or no risk.",
            "group": "General"
        })
    );
}

#[test]
fn compose_children_usg() {
    let json = serde_json::to_value(compose(120.0, Some("Children"))).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "aqi_category": "UnhealthyForSensitiveGroups",
            "advice": "Members of sensitive groups may experience health effects. The general public is less likely to be affected. Children should consider limiting outdoor exertion, wearing masks, and staying indoors if possible.",
            "group": "Children"
        })
    );
}

#[test]
fn compose_pregnant_women_moderate_has_no_caution() {
    let r = compose(75.0, Some("Pregnant women"));
    assert_eq!(r.category(), AqiCategory::Moderate);
    assert_eq!(r.advice(), BANDS[1].3);
    assert_eq!(r.group(), "Pregnant women");
}

#[test]
fn compose_elderly_out_of_range() {
    let json = serde_json::to_value(compose(600.0, Some("Elderly"))).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "aqi_category": "Unknown",
            "advice": OUT_OF_RANGE,
            "group": "Elderly"
        })
    );
}

fn reading() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e9f64
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn out_of_range_aqi_is_unknown(aqi in prop_oneof![-1.0e12..-1.0e-9f64, 500.000001..1.0e12f64]) {
        let got = categorize(aqi);
        prop_assert_eq!(got.category, AqiCategory::Unknown);
        prop_assert_eq!(got.advice, OUT_OF_RANGE);
    }

    #[test]
    fn in_range_aqi_is_never_unknown(aqi in 0.0..=500.0f64) {
        prop_assert_ne!(categorize(aqi).category, AqiCategory::Unknown);
    }

    #[test]
    fn estimate_stays_in_range(values in prop::array::uniform6(reading())) {
        let aqi = estimate(&PollutantVector::new(values));
        prop_assert!(aqi.is_finite());
        prop_assert!((0.0..=500.0).contains(&aqi));
    }

    #[test]
    fn estimate_is_monotone_per_coordinate(
        values in prop::array::uniform6(reading()),
        index in 0usize..6,
        bump in 0.0..1.0e6f64,
    ) {
        let mut raised = values;
        raised[index] += bump;
        let before = estimate(&PollutantVector::new(values));
        let after = estimate(&PollutantVector::new(raised));
        prop_assert!(after >= before, "{} -> {}", before, after);
    }

    #[test]
    fn compose_is_idempotent(
        aqi in -100.0..700.0f64,
        group in prop::option::of(prop_oneof![
            Just("Children".to_string()),
            Just("Elderly".to_string()),
            Just("People with respiratory or heart diseases".to_string()),
            Just("Pregnant women".to_string()),
            "[A-Za-z ]{0,12}",
        ]),
    ) {
        let first = compose(aqi, group.as_deref());
        let second = compose(aqi, group.as_deref());
        prop_assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
        prop_assert!(first.advice().matches("should consider limiting").count() <= 1);
    }
}
