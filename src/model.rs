//! Records produced by the two script analyses.
//!
//! Field names follow the JSON the model is asked to return, so the same types
//! serve for parsing replies and for re-serializing results.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    #[default]
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Critical, Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    pub fn parse(label: &str) -> Option<Severity> {
        match label.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(Severity::parse).unwrap_or_default())
    }
}

/// Accepts `3`, `3.0` and `"3"`; anything else reads as absent.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(lenient_number(deserializer)?.map(|n| n.max(0) as u64).unwrap_or_default())
}

/// Strings with `null` read as empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Violation {
    #[serde(deserialize_with = "lenient_string")]
    pub violation_type: String,
    pub severity: Severity,
    #[serde(deserialize_with = "lenient_string")]
    pub violation_text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub explanation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub suggested_action: String,
    #[serde(deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViolationSummary {
    #[serde(deserialize_with = "lenient_count")]
    pub total_violations: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub critical_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub high_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub medium_count: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub low_count: u64,
}

impl ViolationSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let count = |severity: Severity| violations.iter().filter(|v| v.severity == severity).count() as u64;
        Self {
            total_violations: violations.len() as u64,
            critical_count: count(Severity::Critical),
            high_count: count(Severity::High),
            medium_count: count(Severity::Medium),
            low_count: count(Severity::Low),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardsReport {
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ViolationSummary>,
}

impl StandardsReport {
    /// The model's own summary when it sent one, counted from the list otherwise.
    pub fn summary(&self) -> ViolationSummary {
        self.summary
            .clone()
            .unwrap_or_else(|| ViolationSummary::from_violations(&self.violations))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    #[serde(deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    pub scene_heading: String,
    #[serde(deserialize_with = "lenient_string")]
    pub time_of_day: String,
    #[serde(deserialize_with = "lenient_string")]
    pub brief_description: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub props_in_scene: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "lenient_string")]
    pub location_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location_type: String,
    pub scenes_in_location: Vec<Scene>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionSummary {
    #[serde(deserialize_with = "lenient_count")]
    pub total_locations: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_scenes: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_props: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionBreakdown {
    pub location_breakdown: Vec<Location>,
    #[serde(deserialize_with = "lenient_strings")]
    pub unique_props: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ProductionSummary>,
}

impl ProductionBreakdown {
    pub fn scene_count(&self) -> usize {
        self.location_breakdown
            .iter()
            .map(|l| l.scenes_in_location.len())
            .sum()
    }

    pub fn summary(&self) -> ProductionSummary {
        self.summary.clone().unwrap_or_else(|| ProductionSummary {
            total_locations: self.location_breakdown.len() as u64,
            total_scenes: self.scene_count() as u64,
            total_props: self.unique_props.len() as u64,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.location_breakdown.is_empty() && self.unique_props.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_violation_defaults() -> anyhow::Result<()> {
        let v: Violation = serde_json::from_value(json!({ "violationType": "language" }))?;
        assert_eq!(v.violation_type, "language");
        assert_eq!(v.severity, Severity::Low);
        assert_eq!(v.page_number, None);
        assert_eq!(v.explanation, "");
        Ok(())
    }

    #[test]
    fn test_lenient_fields() -> anyhow::Result<()> {
        let v: Violation = serde_json::from_value(json!({
            "severity": "HIGH",
            "pageNumber": "3",
            "explanation": null,
        }))?;
        assert_eq!(v.severity, Severity::High);
        assert_eq!(v.page_number, Some(3));
        assert_eq!(v.explanation, "");

        let v: Violation = serde_json::from_value(json!({ "severity": "extreme", "pageNumber": "n/a" }))?;
        assert_eq!(v.severity, Severity::Low);
        assert_eq!(v.page_number, None);
        Ok(())
    }

    #[test]
    fn test_summary_computed_when_missing() -> anyhow::Result<()> {
        let report: StandardsReport = serde_json::from_value(json!({
            "violations": [
                { "severity": "critical" },
                { "severity": "high" },
                { "severity": "high" },
                { "severity": "low" },
            ]
        }))?;
        assert_eq!(
            report.summary(),
            ViolationSummary {
                total_violations: 4,
                critical_count: 1,
                high_count: 2,
                medium_count: 0,
                low_count: 1,
            }
        );
        Ok(())
    }

    #[test]
    fn test_summary_from_model_wins() -> anyhow::Result<()> {
        let report: StandardsReport = serde_json::from_value(json!({
            "violations": [],
            "summary": { "totalViolations": 2, "highCount": 1, "mediumCount": 1 }
        }))?;
        assert_eq!(report.summary().total_violations, 2);
        assert_eq!(report.summary().critical_count, 0);
        Ok(())
    }

    #[test]
    fn test_production_breakdown() -> anyhow::Result<()> {
        let breakdown: ProductionBreakdown = serde_json::from_value(json!({
            "location_breakdown": [{
                "location_name": "Office Building",
                "location_type": "Interior",
                "scenes_in_location": [
                    { "scene_number": 1, "scene_heading": "INT. OFFICE - DAY", "props_in_scene": ["desk", null] },
                    { "scene_number": "2", "time_of_day": "NIGHT" }
                ]
            }],
            "unique_props": ["desk", "computer"]
        }))?;
        assert_eq!(breakdown.scene_count(), 2);
        assert_eq!(breakdown.location_breakdown[0].scenes_in_location[0].props_in_scene, vec!["desk"]);
        assert_eq!(breakdown.location_breakdown[0].scenes_in_location[1].scene_number, Some(2));
        assert_eq!(
            breakdown.summary(),
            ProductionSummary { total_locations: 1, total_scenes: 2, total_props: 2 }
        );
        assert!(!breakdown.is_empty());
        assert!(ProductionBreakdown::default().is_empty());
        Ok(())
    }
}
