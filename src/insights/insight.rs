use serde::{Deserialize, Serialize};

/// Severity classification, ordered from healthy to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightStatus {
    /// Within the healthy reference range
    Ok,
    /// Mildly outside normal, worth monitoring
    Borderline,
    /// Outside normal range, action recommended
    Warning,
    /// Significantly outside range, medical attention advised
    Danger,
}

/// Reference interval shown next to an insight. Either bound may be open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}

impl ReferenceRange {
    pub fn between(min: f64, max: f64, description: impl Into<String>) -> Self {
        Self { min: Some(min), max: Some(max), description: description.into() }
    }

    pub fn at_least(min: f64, description: impl Into<String>) -> Self {
        Self { min: Some(min), max: None, description: description.into() }
    }

    pub fn below(max: f64, description: impl Into<String>) -> Self {
        Self { min: None, max: Some(max), description: description.into() }
    }
}

/// One evaluated metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInsight {
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub status: InsightStatus,
    pub message: String,
    pub reference_range: Option<ReferenceRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_orders_by_severity() {
        assert!(InsightStatus::Ok < InsightStatus::Borderline);
        assert!(InsightStatus::Borderline < InsightStatus::Warning);
        assert!(InsightStatus::Warning < InsightStatus::Danger);
    }

    #[test]
    fn serializes_to_camel_case_wire_format() {
        let insight = MetricInsight {
            metric_type: "cholesterolHDL".to_string(),
            value: 62.0,
            unit: "mg/dL".to_string(),
            status: InsightStatus::Ok,
            message: "fine".to_string(),
            reference_range: Some(ReferenceRange::at_least(60.0, "Protective: ≥ 60 mg/dL")),
        };

        let value = serde_json::to_value(&insight).unwrap();
        assert_eq!(value["metricType"], json!("cholesterolHDL"));
        assert_eq!(value["status"], json!("OK"));
        assert_eq!(value["referenceRange"]["min"], json!(60.0));
        assert!(value["referenceRange"]["max"].is_null());
    }
}
