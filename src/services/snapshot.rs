// Latest-value-per-metric snapshot plus the two metrics derived from it

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::BodyMetricEntry;

/// Metric types derived from stored values; they are never stored themselves
pub const COMPUTED_TYPES: [&str; 2] = ["bmi", "smiComputed"];

const DERIVED_UNIT: &str = "kg/m²";

pub fn is_computed_type(metric_type: &str) -> bool {
    COMPUTED_TYPES.contains(&metric_type)
}

/// Most recent value of one metric type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshotItem {
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub log_date: NaiveDate,
}

impl From<&BodyMetricEntry> for MetricSnapshotItem {
    fn from(entry: &BodyMetricEntry) -> Self {
        Self {
            metric_type: entry.metric_type.clone(),
            value: entry.value,
            unit: entry.unit.clone(),
            log_date: entry.log_date,
        }
    }
}

/// Build the snapshot from entries ordered newest first.
///
/// The first entry seen for a type wins. Stored `bmi` / `smiComputed` rows are
/// ignored; both are derived and appended when their sources are present and
/// height is positive. Their log date is the later of the two source dates.
pub fn build_snapshot(recent: &[BodyMetricEntry]) -> Vec<MetricSnapshotItem> {
    let mut items: Vec<MetricSnapshotItem> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for entry in recent {
        if is_computed_type(&entry.metric_type) {
            continue;
        }
        if !seen.contains_key(entry.metric_type.as_str()) {
            seen.insert(entry.metric_type.as_str(), items.len());
            items.push(MetricSnapshotItem::from(entry));
        }
    }

    let lookup = |metric_type: &str| seen.get(metric_type).map(|&idx| items[idx].clone());
    let height = lookup("height").filter(|h| h.value > 0.0);

    let mut derived = Vec::new();
    if let Some(height) = &height {
        for (source, derived_type) in [("weight", "bmi"), ("smm", "smiComputed")] {
            if let Some(item) = lookup(source) {
                derived.push(per_square_metre(derived_type, &item, height));
            }
        }
    }

    items.extend(derived);
    items
}

/// Index the snapshot by metric type
pub fn snapshot_map(items: Vec<MetricSnapshotItem>) -> HashMap<String, MetricSnapshotItem> {
    items
        .into_iter()
        .map(|item| (item.metric_type.clone(), item))
        .collect()
}

fn per_square_metre(
    metric_type: &str,
    mass: &MetricSnapshotItem,
    height_cm: &MetricSnapshotItem,
) -> MetricSnapshotItem {
    let height_m = height_cm.value / 100.0;
    MetricSnapshotItem {
        metric_type: metric_type.to_string(),
        value: round_one_decimal(mass.value / height_m.powi(2)),
        unit: DERIVED_UNIT.to_string(),
        log_date: mass.log_date.max(height_cm.log_date),
    }
}

// Half-to-even on the tenths digit
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: i64, metric_type: &str, value: f64, unit: &str, day: u32) -> BodyMetricEntry {
        BodyMetricEntry {
            id,
            user_id: "u1".to_string(),
            metric_type: metric_type.to_string(),
            value,
            unit: unit.to_string(),
            log_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn find<'a>(items: &'a [MetricSnapshotItem], metric_type: &str) -> Option<&'a MetricSnapshotItem> {
        items.iter().find(|i| i.metric_type == metric_type)
    }

    #[test]
    fn bmi_uses_latest_weight_and_height() {
        let recent = vec![
            entry(3, "weight", 80.0, "kg", 10),
            entry(2, "height", 180.0, "cm", 5),
            entry(1, "weight", 90.0, "kg", 1),
        ];
        let items = build_snapshot(&recent);

        let bmi = find(&items, "bmi").expect("bmi derived");
        assert_eq!(bmi.value, 24.7);
        assert_eq!(bmi.unit, "kg/m²");
        assert_eq!(bmi.log_date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(find(&items, "weight").unwrap().value, 80.0);
    }

    #[test]
    fn no_duplicate_metric_types() {
        let recent = vec![
            entry(4, "bodyFat", 18.0, "%", 9),
            entry(3, "bodyFat", 19.0, "%", 8),
            entry(2, "bodyFat", 20.0, "%", 7),
        ];
        let items = build_snapshot(&recent);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, 18.0);
    }

    #[test]
    fn smi_derived_from_smm() {
        let recent = vec![
            entry(2, "smm", 32.0, "kg", 4),
            entry(1, "height", 175.0, "cm", 6),
        ];
        let items = build_snapshot(&recent);
        let smi = find(&items, "smiComputed").expect("smi derived");
        // 32 / 1.75^2 = 10.449
        assert_eq!(smi.value, 10.4);
        assert_eq!(smi.log_date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert!(find(&items, "bmi").is_none());
    }

    #[test]
    fn derived_metrics_need_positive_height() {
        let recent = vec![
            entry(2, "weight", 80.0, "kg", 4),
            entry(1, "height", 0.0, "cm", 4),
        ];
        let items = build_snapshot(&recent);
        assert!(find(&items, "bmi").is_none());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn missing_source_omits_derived_metric() {
        let items = build_snapshot(&[entry(1, "height", 180.0, "cm", 1)]);
        assert_eq!(items.len(), 1);
        assert!(build_snapshot(&[]).is_empty());
    }

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round_one_decimal(24.25), 24.2);
        assert_eq!(round_one_decimal(24.75), 24.8);
        assert_eq!(round_one_decimal(24.71), 24.7);
    }

    #[test]
    fn computed_types_are_recognised() {
        assert!(is_computed_type("bmi"));
        assert!(is_computed_type("smiComputed"));
        assert!(!is_computed_type("weight"));
    }

    #[test]
    fn stored_computed_rows_never_duplicate_derived_items() {
        let recent = vec![
            entry(1, "bmi", 31.0, "kg/m²", 12),
            entry(2, "weight", 80.0, "kg", 10),
            entry(3, "height", 180.0, "cm", 5),
        ];
        let snapshot = build_snapshot(&recent);

        let bmis: Vec<&MetricSnapshotItem> = snapshot.iter().filter(|i| i.metric_type == "bmi").collect();
        assert_eq!(bmis.len(), 1);
        assert_eq!(bmis[0].value, 24.7);
    }
}
