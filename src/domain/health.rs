//! Health guidance derived from the current AQI. Pure and total; recomputed
//! on every render, never stored.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTag {
    Good,
    Moderate,
    Sensitive,
    Unhealthy,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthRecommendation {
    pub level: &'static str,
    pub message: &'static str,
    pub description: &'static str,
    pub severity: SeverityTag,
}

const GENERAL_ADVICE: HealthRecommendation = HealthRecommendation {
    level: "General",
    message: "Stay informed about air quality",
    description: "Check daily AQI forecasts and plan activities accordingly",
    severity: SeverityTag::General,
};

/// Exactly one severity-tier entry followed by the constant general entry.
/// The tier uses four buckets: everything above 150 collapses to Unhealthy.
#[must_use]
pub fn recommendations_for(aqi: u16) -> Vec<HealthRecommendation> {
    let tier = if aqi <= 50 {
        HealthRecommendation {
            level: "Good",
            message: "Air quality is satisfactory",
            description: "Ideal for outdoor activities",
            severity: SeverityTag::Good,
        }
    } else if aqi <= 100 {
        HealthRecommendation {
            level: "Moderate",
            message: "Acceptable air quality",
            description: "Unusually sensitive people should consider reducing prolonged outdoor exertion",
            severity: SeverityTag::Moderate,
        }
    } else if aqi <= 150 {
        HealthRecommendation {
            level: "Sensitive Groups",
            message: "Sensitive groups should limit exposure",
            description: "People with respiratory or heart disease, the elderly and children should limit prolonged outdoor exertion",
            severity: SeverityTag::Sensitive,
        }
    } else {
        HealthRecommendation {
            level: "Unhealthy",
            message: "Everyone may experience health effects",
            description: "Active children and adults, and people with respiratory disease should avoid prolonged outdoor exertion",
            severity: SeverityTag::Unhealthy,
        }
    };

    vec![tier, GENERAL_ADVICE]
}
