//! Air-quality index classification and alert policy.
//!
//! Display classification and alerting are two separate policies: the six
//! display bands come from [`ThresholdConfig`], while the alert fires on its
//! own threshold which sits inside the Moderate band.
//!
//! # Example
//!
//! ```
//! use airsight_core::{AqiLevel, Thresholds};
//!
//! let thresholds = Thresholds::default();
//!
//! let class = thresholds.classify(Some(35.0));
//! assert_eq!(class.level, AqiLevel::Fair);
//! assert_eq!(class.label, "Fair");
//!
//! assert!(!thresholds.should_alert(50.0));
//! assert!(thresholds.should_alert(51.0));
//! ```

use serde::{Deserialize, Serialize};

/// Air-quality category derived from the European AQI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiLevel {
    /// Index ≤ 20.
    Good,
    /// Index ≤ 40.
    Fair,
    /// Index ≤ 60.
    Moderate,
    /// Index ≤ 80.
    Poor,
    /// Index ≤ 100.
    VeryPoor,
    /// Index > 100.
    Hazardous,
    /// No index reported.
    Unknown,
}

impl AqiLevel {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Hazardous => "Hazardous",
            AqiLevel::Unknown => "unknown",
        }
    }

    /// Hex color token for the level.
    pub fn color_token(&self) -> &'static str {
        match self {
            AqiLevel::Good => "#00e400",
            AqiLevel::Fair => "#ffff00",
            AqiLevel::Moderate => "#ff7e00",
            AqiLevel::Poor => "#ff0000",
            AqiLevel::VeryPoor => "#8f3f97",
            AqiLevel::Hazardous => "#7e0023",
            AqiLevel::Unknown => "#9e9e9e",
        }
    }

    /// Emoji shown next to the label.
    pub fn emoji(&self) -> &'static str {
        match self {
            AqiLevel::Good => "😊",
            AqiLevel::Fair => "🙂",
            AqiLevel::Moderate => "😐",
            AqiLevel::Poor => "😷",
            AqiLevel::VeryPoor => "🤢",
            AqiLevel::Hazardous => "☠️",
            AqiLevel::Unknown => "❔",
        }
    }

    /// Health advice for the level. Empty for `Unknown`.
    pub fn advisory(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Air quality is great. Enjoy outdoor activities.",
            AqiLevel::Fair => "Air quality is acceptable for most people.",
            AqiLevel::Moderate => "Sensitive groups should reduce prolonged outdoor exertion.",
            AqiLevel::Poor => "Consider reducing outdoor activities.",
            AqiLevel::VeryPoor => "Avoid outdoor activities and keep windows closed.",
            AqiLevel::Hazardous => "Stay indoors and avoid all outdoor exertion.",
            AqiLevel::Unknown => "",
        }
    }
}

/// Full display classification of an index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Category.
    pub level: AqiLevel,
    /// Display label, e.g. `"Very Poor"`.
    pub label: &'static str,
    /// Hex color token.
    pub color_token: &'static str,
    /// Emoji.
    pub emoji: &'static str,
    /// Advisory text (empty when unknown).
    pub advisory: &'static str,
}

impl From<AqiLevel> for Classification {
    fn from(level: AqiLevel) -> Self {
        Self {
            level,
            label: level.label(),
            color_token: level.color_token(),
            emoji: level.emoji(),
            advisory: level.advisory(),
        }
    }
}

/// Band boundaries and alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Upper bound (inclusive) for Good.
    pub good_max: f64,
    /// Upper bound (inclusive) for Fair.
    pub fair_max: f64,
    /// Upper bound (inclusive) for Moderate.
    pub moderate_max: f64,
    /// Upper bound (inclusive) for Poor.
    pub poor_max: f64,
    /// Upper bound (inclusive) for Very Poor.
    pub very_poor_max: f64,
    // Above very_poor_max is Hazardous
    /// An alert fires when the index is strictly above this value.
    pub alert_above: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            good_max: 20.0,
            fair_max: 40.0,
            moderate_max: 60.0,
            poor_max: 80.0,
            very_poor_max: 100.0,
            alert_above: 50.0,
        }
    }
}

/// Threshold evaluator for air-quality index values.
#[derive(Debug, Clone, Default)]
pub struct Thresholds {
    config: ThresholdConfig,
}

impl Thresholds {
    /// Create a threshold evaluator with the given configuration.
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Map an index to its band. Missing or NaN values are `Unknown`.
    pub fn level(&self, index: Option<f64>) -> AqiLevel {
        let Some(value) = index.filter(|v| !v.is_nan()) else {
            return AqiLevel::Unknown;
        };

        if value <= self.config.good_max {
            AqiLevel::Good
        } else if value <= self.config.fair_max {
            AqiLevel::Fair
        } else if value <= self.config.moderate_max {
            AqiLevel::Moderate
        } else if value <= self.config.poor_max {
            AqiLevel::Poor
        } else if value <= self.config.very_poor_max {
            AqiLevel::VeryPoor
        } else {
            AqiLevel::Hazardous
        }
    }

    /// Classify an index for display.
    pub fn classify(&self, index: Option<f64>) -> Classification {
        self.level(index).into()
    }

    /// Whether an index warrants a warning notification.
    pub fn should_alert(&self, index: f64) -> bool {
        index > self.config.alert_above
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_bands() {
        let t = Thresholds::default();
        assert_eq!(t.level(Some(10.0)), AqiLevel::Good);
        assert_eq!(t.level(Some(30.0)), AqiLevel::Fair);
        assert_eq!(t.level(Some(50.0)), AqiLevel::Moderate);
        assert_eq!(t.level(Some(70.0)), AqiLevel::Poor);
        assert_eq!(t.level(Some(90.0)), AqiLevel::VeryPoor);
        assert_eq!(t.level(Some(150.0)), AqiLevel::Hazardous);
    }

    #[test]
    fn test_boundary_values() {
        let t = Thresholds::default();
        assert_eq!(t.classify(Some(20.0)).label, "Good");
        assert_eq!(t.classify(Some(20.0001)).label, "Fair");
        assert_eq!(t.classify(Some(40.0)).label, "Fair");
        assert_eq!(t.classify(Some(40.0001)).label, "Moderate");
        assert_eq!(t.classify(Some(60.0)).label, "Moderate");
        assert_eq!(t.classify(Some(80.0)).label, "Poor");
        assert_eq!(t.classify(Some(100.0)).label, "Very Poor");
        assert_eq!(t.classify(Some(100.0001)).label, "Hazardous");
    }

    #[test]
    fn test_negative_and_zero_are_good() {
        let t = Thresholds::default();
        assert_eq!(t.level(Some(0.0)), AqiLevel::Good);
        assert_eq!(t.level(Some(-5.0)), AqiLevel::Good);
    }

    #[test]
    fn test_missing_index_is_unknown() {
        let t = Thresholds::default();
        let class = t.classify(None);
        assert_eq!(class.level, AqiLevel::Unknown);
        assert_eq!(class.label, "unknown");
        assert!(class.advisory.is_empty());
    }

    #[test]
    fn test_nan_is_unknown() {
        let t = Thresholds::default();
        assert_eq!(t.level(Some(f64::NAN)), AqiLevel::Unknown);
        assert!(!t.should_alert(f64::NAN));
    }

    #[test]
    fn test_should_alert_boundary() {
        let t = Thresholds::default();
        assert!(!t.should_alert(50.0));
        assert!(t.should_alert(50.5));
        assert!(t.should_alert(51.0));
        assert!(!t.should_alert(35.0));
    }

    #[test]
    fn test_alert_sits_inside_moderate() {
        let t = Thresholds::default();
        // 55 is Moderate for display but still alerts
        assert_eq!(t.level(Some(55.0)), AqiLevel::Moderate);
        assert!(t.should_alert(55.0));
        // 45 is Moderate for display and does not alert
        assert_eq!(t.level(Some(45.0)), AqiLevel::Moderate);
        assert!(!t.should_alert(45.0));
    }

    #[test]
    fn test_known_levels_have_advisory() {
        for level in [
            AqiLevel::Good,
            AqiLevel::Fair,
            AqiLevel::Moderate,
            AqiLevel::Poor,
            AqiLevel::VeryPoor,
            AqiLevel::Hazardous,
        ] {
            assert!(!level.advisory().is_empty(), "{level:?}");
            assert!(level.color_token().starts_with('#'));
        }
    }

    #[test]
    fn test_custom_config() {
        let t = Thresholds::new(ThresholdConfig {
            alert_above: 80.0,
            ..ThresholdConfig::default()
        });
        assert!(!t.should_alert(75.0));
        assert_eq!(t.level(Some(75.0)), AqiLevel::Poor);
    }

    proptest! {
        #[test]
        fn prop_classify_is_total(index in proptest::num::f64::ANY) {
            let class = Thresholds::default().classify(Some(index));
            prop_assert!(!class.label.is_empty());
        }

        #[test]
        fn prop_bands_are_monotonic(a in -50.0f64..500.0, b in -50.0f64..500.0) {
            let t = Thresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let rank = |l: AqiLevel| l as u8;
            prop_assert!(rank(t.level(Some(lo))) <= rank(t.level(Some(hi))));
        }

        #[test]
        fn prop_alert_matches_threshold(index in 0.0f64..500.0) {
            prop_assert_eq!(Thresholds::default().should_alert(index), index > 50.0);
        }
    }
}
