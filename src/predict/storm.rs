//! Heuristic geomagnetic storm scoring.
//!
//! A weighted sum over six solar and geomagnetic readings, each contribution
//! capped at its own ceiling, summed and clamped to a 0..=100 probability.
//! Everything here is pure; the same readings always give the same result.
//!
//! ```text
//! solar wind   (v - 300) / 700 * 30    ≤ 30
//! IMF          B / 50 * 25             ≤ 25
//! sunspots     n / 300 * 15            ≤ 15
//! X-ray class  (c - 1) / 4 * 20        ≤ 20
//! protons      p / 10000 * 10          ≤ 10
//! Kp           kp / 9 * 10             ≤ 10
//! ```

use serde::{Deserialize, Serialize};

/// Distance from the Sun to the Earth in km, used for transit estimates.
const SUN_EARTH_KM: f64 = 150_000_000.0;

/// Observed solar and geomagnetic conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarConditions {
    /// Solar wind speed in km/s.
    pub solar_wind: f64,
    /// Interplanetary magnetic field strength in nT.
    pub magnetic_field: f64,
    /// Daily sunspot number.
    pub sunspot_number: f64,
    /// X-ray flare class, 1 (A) through 5 (X).
    pub xray_flux: f64,
    /// Proton flux in pfu.
    pub proton_flux: f64,
    /// Planetary K-index, 0..=9.
    pub kp_index: f64,
}

/// Probability that the given conditions produce a geomagnetic storm.
pub fn storm_probability(c: &SolarConditions) -> f64 {
    let sum = capped((c.solar_wind - 300.0) / 700.0 * 30.0, 30.0)
        + capped(c.magnetic_field / 50.0 * 25.0, 25.0)
        + capped(c.sunspot_number / 300.0 * 15.0, 15.0)
        + capped((c.xray_flux - 1.0) / 4.0 * 20.0, 20.0)
        + capped(c.proton_flux / 10_000.0 * 10.0, 10.0)
        + capped(c.kp_index / 9.0 * 10.0, 10.0);

    sum.clamp(0.0, 100.0)
}

// A NaN reading contributes nothing.
fn capped(value: f64, ceiling: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.min(ceiling)
    }
}

/// NOAA-style storm category for a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StormCategory {
    Quiet,
    Minor,
    Moderate,
    Strong,
    Severe,
}

impl StormCategory {
    pub fn from_probability(probability: f64) -> Self {
        match probability {
            p if p < 20.0 => Self::Quiet,
            p if p < 40.0 => Self::Minor,
            p if p < 60.0 => Self::Moderate,
            p if p < 80.0 => Self::Strong,
            _ => Self::Severe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Quiet => "Quiet Conditions",
            Self::Minor => "Minor Storm (G1)",
            Self::Moderate => "Moderate Storm (G2)",
            Self::Strong => "Strong Storm (G3)",
            Self::Severe => "Severe Storm (G4-G5)",
        }
    }
}

/// Risk level for a single Kp reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KpRisk {
    Low,
    Moderate,
    High,
}

impl KpRisk {
    pub fn from_kp(kp: f64) -> Self {
        if kp <= 3.0 {
            Self::Low
        } else if kp < 5.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Expected storm impact at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactPoint {
    pub label: &'static str,
    pub value: f64,
}

/// Projected impact over the next two days.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactTimeline {
    /// Hours for the solar wind to cover the Sun-Earth distance.
    /// `None` when the speed is not positive.
    pub transit_hours: Option<f64>,
    pub points: Vec<ImpactPoint>,
}

pub fn impact_timeline(probability: f64, solar_wind: f64) -> ImpactTimeline {
    const STEPS: [(&str, f64); 5] = [
        ("now", 0.3),
        ("6h", 0.5),
        ("12h", 0.8),
        ("24h", 1.0),
        ("48h", 0.6),
    ];

    let transit_hours = (solar_wind > 0.0).then(|| SUN_EARTH_KM / solar_wind / 3600.0);

    ImpactTimeline {
        transit_hours,
        points: STEPS
            .iter()
            .map(|&(label, factor)| ImpactPoint {
                label,
                value: probability * factor,
            })
            .collect(),
    }
}

/// Severity band for an infrastructure risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 25.0 => Self::Low,
            s if s < 50.0 => Self::Moderate,
            s if s < 75.0 => Self::High,
            _ => Self::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Risk {
    pub score: f64,
    pub level: RiskLevel,
}

impl Risk {
    fn new(score: f64) -> Self {
        let score = score.min(100.0);
        Self {
            score,
            level: RiskLevel::from_score(score),
        }
    }
}

/// Risk to the systems most exposed to space weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureRisks {
    pub gps: Risk,
    pub power_grid: Risk,
    pub communications: Risk,
    pub aviation: Risk,
}

pub fn infrastructure_risks(probability: f64, xray_flux: f64, kp_index: f64) -> InfrastructureRisks {
    InfrastructureRisks {
        gps: Risk::new(probability * 0.8 + xray_flux * 5.0),
        power_grid: Risk::new(probability * 0.9 + kp_index * 8.0),
        communications: Risk::new(probability * 0.7 + xray_flux * 7.0),
        aviation: Risk::new(probability * 0.6 + xray_flux * 6.0),
    }
}

/// Advisories for operators and sky watchers.
pub fn recommendations(category: StormCategory) -> &'static [&'static str] {
    match category {
        StormCategory::Quiet => &[
            "All systems operating normally",
            "Continue routine space weather monitoring",
            "No special precautions needed for satellite operations",
        ],
        StormCategory::Minor => &[
            "Minor GPS accuracy degradation possible",
            "HF radio communications may be affected at high latitudes",
            "Increased monitoring recommended",
            "Aurora may be visible at high latitudes",
        ],
        StormCategory::Moderate => &[
            "Satellite operators should review contingency plans",
            "Power grid operators: monitor voltage irregularities",
            "Consider rerouting polar flights to lower latitudes",
            "HF radio propagation disruptions likely",
            "Aurora may be visible at mid-latitudes",
        ],
        StormCategory::Strong => &[
            "CRITICAL: Satellite orientation anomalies possible",
            "URGENT: Power grid operators activate storm protocols",
            "Aviation: Avoid polar routes, monitor radiation levels",
            "Expect widespread HF radio blackouts",
            "GPS accuracy significantly degraded",
            "Aurora may be visible at lower latitudes",
        ],
        StormCategory::Severe => &[
            "SEVERE: Satellite damage and failures likely",
            "EMERGENCY: Power grid blackouts possible",
            "CRITICAL: Ground all polar flights immediately",
            "Complete HF radio blackout expected",
            "GPS systems may be completely unavailable",
            "Activate all emergency space weather protocols",
            "Aurora may be visible at very low latitudes",
        ],
    }
}

/// Everything derived from one set of conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StormAssessment {
    pub probability: f64,
    pub category: StormCategory,
    pub category_label: &'static str,
    pub kp_risk: KpRisk,
    pub timeline: ImpactTimeline,
    pub risks: InfrastructureRisks,
    pub recommendations: &'static [&'static str],
}

pub fn assess(conditions: &SolarConditions) -> StormAssessment {
    let probability = storm_probability(conditions);
    let category = StormCategory::from_probability(probability);

    StormAssessment {
        probability,
        category,
        category_label: category.label(),
        kp_risk: KpRisk::from_kp(conditions.kp_index),
        timeline: impact_timeline(probability, conditions.solar_wind),
        risks: infrastructure_risks(probability, conditions.xray_flux, conditions.kp_index),
        recommendations: recommendations(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(
        solar_wind: f64,
        magnetic_field: f64,
        sunspot_number: f64,
        xray_flux: f64,
        proton_flux: f64,
        kp_index: f64,
    ) -> SolarConditions {
        SolarConditions {
            solar_wind,
            magnetic_field,
            sunspot_number,
            xray_flux,
            proton_flux,
            kp_index,
        }
    }

    #[test]
    fn test_reference_inputs_are_deterministic() {
        let c = conditions(400.0, 10.0, 50.0, 2.0, 100.0, 3.0);
        let p = storm_probability(&c);

        // 30/7 + 5 + 2.5 + 5 + 0.1 + 10/3
        let expected = 30.0 / 7.0 + 5.0 + 2.5 + 5.0 + 0.1 + 10.0 / 3.0;
        assert!((p - expected).abs() < 1e-9, "got {p}, expected {expected}");
        assert!((0.0..=100.0).contains(&p));
        assert_eq!(p.to_bits(), storm_probability(&c).to_bits());
    }

    #[test]
    fn test_each_term_is_capped() {
        let c = conditions(5_000.0, 500.0, 3_000.0, 50.0, 1e9, 90.0);
        assert_eq!(storm_probability(&c), 100.0);

        let only_wind = conditions(5_000.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(storm_probability(&only_wind), 30.0);

        let only_xray = conditions(300.0, 0.0, 0.0, 50.0, 0.0, 0.0);
        assert_eq!(storm_probability(&only_xray), 20.0);
    }

    #[test]
    fn test_clamped_at_zero() {
        let c = conditions(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(storm_probability(&c), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_are_total() {
        let nan_wind = conditions(f64::NAN, 10.0, 50.0, 2.0, 100.0, 3.0);
        let calm_wind = conditions(300.0, 10.0, 50.0, 2.0, 100.0, 3.0);
        assert_eq!(storm_probability(&nan_wind), storm_probability(&calm_wind));

        let collapsed = conditions(f64::NEG_INFINITY, f64::INFINITY, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(storm_probability(&collapsed), 0.0);
    }

    #[test]
    fn test_always_within_bounds() {
        let values = [-1e6, -10.0, 0.0, 1.0, 4.5, 300.0, 1e4, 1e9];
        for &a in &values {
            for &b in &values {
                let p = storm_probability(&conditions(a, b, a, b, a, b));
                assert!((0.0..=100.0).contains(&p), "{p} out of range for ({a}, {b})");
            }
        }
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(StormCategory::from_probability(0.0), StormCategory::Quiet);
        assert_eq!(StormCategory::from_probability(19.9), StormCategory::Quiet);
        assert_eq!(StormCategory::from_probability(20.0), StormCategory::Minor);
        assert_eq!(StormCategory::from_probability(59.9), StormCategory::Moderate);
        assert_eq!(StormCategory::from_probability(79.0), StormCategory::Strong);
        assert_eq!(StormCategory::from_probability(100.0), StormCategory::Severe);
        assert_eq!(StormCategory::Minor.label(), "Minor Storm (G1)");
    }

    #[test]
    fn test_kp_risk_levels() {
        assert_eq!(KpRisk::from_kp(0.0), KpRisk::Low);
        assert_eq!(KpRisk::from_kp(3.0), KpRisk::Low);
        assert_eq!(KpRisk::from_kp(4.0), KpRisk::Moderate);
        assert_eq!(KpRisk::from_kp(5.0), KpRisk::High);
        assert_eq!(KpRisk::from_kp(9.0), KpRisk::High);
    }

    #[test]
    fn test_timeline_scales_probability() {
        let timeline = impact_timeline(50.0, 500.0);
        let values: Vec<f64> = timeline.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![15.0, 25.0, 40.0, 50.0, 30.0]);
        assert_eq!(timeline.points[3].label, "24h");

        let hours = timeline.transit_hours.unwrap();
        assert!((hours - 300_000.0 / 3600.0).abs() < 1e-9);

        assert_eq!(impact_timeline(50.0, 0.0).transit_hours, None);
    }

    #[test]
    fn test_infrastructure_risks() {
        let risks = infrastructure_risks(50.0, 2.0, 4.0);
        assert_eq!(risks.gps.score, 50.0);
        assert_eq!(risks.gps.level, RiskLevel::High);
        assert_eq!(risks.power_grid.score, 77.0);
        assert_eq!(risks.power_grid.level, RiskLevel::Critical);
        assert_eq!(risks.communications.score, 49.0);
        assert_eq!(risks.communications.level, RiskLevel::Moderate);

        let capped = infrastructure_risks(100.0, 5.0, 9.0);
        assert_eq!(capped.power_grid.score, 100.0);
    }

    #[test]
    fn test_assess_bundles_results() {
        let c = conditions(800.0, 30.0, 200.0, 4.0, 5_000.0, 7.0);
        let assessment = assess(&c);
        assert_eq!(assessment.probability, storm_probability(&c));
        assert_eq!(assessment.category, StormCategory::from_probability(assessment.probability));
        assert_eq!(assessment.kp_risk, KpRisk::High);
        assert_eq!(assessment.recommendations, recommendations(assessment.category));
        assert_eq!(assessment.timeline.points.len(), 5);
    }

    #[test]
    fn test_conditions_use_camel_case_fields() {
        let c: SolarConditions = serde_json::from_str(
            r#"{"solarWind":400,"magneticField":10,"sunspotNumber":50,"xrayFlux":2,"protonFlux":100,"kpIndex":3}"#,
        )
        .unwrap();
        assert_eq!(c, conditions(400.0, 10.0, 50.0, 2.0, 100.0, 3.0));
    }
}
