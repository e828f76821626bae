// Reference-range engine: compares snapshot values against fixed clinical
// reference ranges (WHO / ACC / ADA / AWGS). Pure and stateless.
//
// Every tier is half-open on its lower bound: "< X" excludes X, which belongs
// to the next tier. Visceral fat is the exception and uses "<=".

use crate::insights::context::InsightContext;
use crate::insights::error::InsightError;
use crate::insights::insight::{InsightStatus, MetricInsight, ReferenceRange};
use crate::insights::traits::InsightEngine;
use crate::types::Gender;

use InsightStatus::{Borderline, Danger, Ok as Healthy, Warning};

/// Metric rules in evaluation order
const RULES: &[(&str, Rule)] = &[
    // Body composition
    ("bmi", Rule::Plain(bmi)),
    ("bodyFat", Rule::Gendered(body_fat)),
    ("visceralFat", Rule::Plain(visceral_fat)),
    ("smiComputed", Rule::Gendered(smi)),
    // Lipid panel
    ("cholesterolTotal", Rule::Plain(cholesterol_total)),
    ("cholesterolLDL", Rule::Plain(cholesterol_ldl)),
    ("cholesterolHDL", Rule::Plain(cholesterol_hdl)),
    ("triglycerides", Rule::Plain(triglycerides)),
    // Blood sugar
    ("fastingGlucose", Rule::Plain(fasting_glucose)),
    ("hba1c", Rule::Plain(hba1c)),
];

#[derive(Clone, Copy)]
enum Rule {
    Plain(fn(f64) -> MetricInsight),
    Gendered(fn(f64, Gender) -> MetricInsight),
}

/// Built-in engine covering body composition, lipids and blood sugar
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceRangeEngine;

impl InsightEngine for ReferenceRangeEngine {
    fn name(&self) -> &'static str {
        "reference-range"
    }

    fn analyze(&self, ctx: &InsightContext) -> Result<Vec<MetricInsight>, InsightError> {
        let insights = RULES
            .iter()
            .filter_map(|(metric_type, rule)| {
                let value = ctx.value(metric_type)?;
                Some(match rule {
                    Rule::Plain(f) => f(value),
                    Rule::Gendered(f) => f(value, ctx.gender()),
                })
            })
            .collect();
        Ok(insights)
    }
}

fn insight(
    metric_type: &str,
    value: f64,
    unit: &str,
    (status, message): (InsightStatus, String),
    range: ReferenceRange,
) -> MetricInsight {
    MetricInsight {
        metric_type: metric_type.to_string(),
        value,
        unit: unit.to_string(),
        status,
        message,
        reference_range: Some(range),
    }
}

fn tier(status: InsightStatus, message: &str) -> (InsightStatus, String) {
    (status, message.to_string())
}

// ── Body composition ────────────────────────────────────────────────────────

fn bmi(value: f64) -> MetricInsight {
    let verdict = if value < 18.5 {
        tier(Warning, "Underweight (BMI < 18.5). Consider consulting a healthcare provider about healthy weight gain.")
    } else if value < 25.0 {
        tier(Healthy, "BMI is in the healthy range (18.5–24.9).")
    } else if value < 30.0 {
        tier(Borderline, "Overweight range (BMI 25–29.9). A healthy target is 18.5–24.9.")
    } else if value < 35.0 {
        tier(Warning, "Obese Class I (BMI 30–34.9). Weight management is recommended.")
    } else {
        tier(Danger, "Obese Class II+ (BMI ≥ 35). Medical guidance is strongly advised.")
    };
    insight("bmi", value, "kg/m²", verdict, ReferenceRange::between(18.5, 24.9, "Normal: 18.5–24.9 kg/m²"))
}

/// Healthy band and tier cutoffs for body fat, per gender
struct BodyFatBand {
    danger_below: f64,
    ok_below: f64,
    borderline_below: f64,
    ok_min: f64,
    ok_max: f64,
    messages: [&'static str; 4],
}

fn body_fat_band(gender: Gender) -> BodyFatBand {
    match gender {
        Gender::Male => BodyFatBand {
            danger_below: 6.0,
            ok_below: 18.0,
            borderline_below: 25.0,
            ok_min: 6.0,
            ok_max: 17.0,
            messages: [
                "Extremely low body fat (< 6% for men). This level can impair organ function.",
                "Body fat is in the healthy range for men (6–17%).",
                "Body fat is above the ideal range for men (6–17%).",
                "Body fat is high for men (≥ 25%). Focus on resistance training and diet.",
            ],
        },
        Gender::Female => BodyFatBand {
            danger_below: 16.0,
            ok_below: 25.0,
            borderline_below: 32.0,
            ok_min: 16.0,
            ok_max: 24.0,
            messages: [
                "Extremely low body fat (< 16% for women). This can affect hormonal health.",
                "Body fat is in the healthy range for women (16–24%).",
                "Body fat is above the ideal range for women (16–24%).",
                "Body fat is high for women (≥ 32%). Focus on resistance training and diet.",
            ],
        },
        // Blended band when sex is unknown
        Gender::Unspecified => BodyFatBand {
            danger_below: 10.0,
            ok_below: 22.0,
            borderline_below: 28.0,
            ok_min: 10.0,
            ok_max: 22.0,
            messages: [
                "Body fat is very low. This level may impair normal bodily functions.",
                "Body fat appears to be in a reasonable healthy range.",
                "Body fat is mildly elevated. Note: healthy range varies by sex.",
                "Body fat appears high. For an accurate assessment, provide your gender.",
            ],
        },
    }
}

fn body_fat(value: f64, gender: Gender) -> MetricInsight {
    let band = body_fat_band(gender);
    let verdict = if value < band.danger_below {
        tier(Danger, band.messages[0])
    } else if value < band.ok_below {
        tier(Healthy, band.messages[1])
    } else if value < band.borderline_below {
        tier(Borderline, band.messages[2])
    } else {
        tier(Warning, band.messages[3])
    };
    let label = match gender {
        Gender::Male => "for male",
        Gender::Female => "for female",
        Gender::Unspecified => "(approx)",
    };
    let description = format!("Normal {label}: {:.1}–{:.1}%", band.ok_min, band.ok_max);
    insight("bodyFat", value, "%", verdict, ReferenceRange::between(band.ok_min, band.ok_max, description))
}

fn visceral_fat(value: f64) -> MetricInsight {
    let verdict = if value <= 9.0 {
        tier(Healthy, "Visceral fat level is normal (1–9).")
    } else if value <= 14.0 {
        (Borderline, format!("Visceral fat level is mildly elevated ({value:.0}). Target is 1–9."))
    } else {
        (Warning, format!("Visceral fat level is high ({value:.0}). Excess visceral fat is linked to metabolic disease."))
    };
    insight("visceralFat", value, "level", verdict, ReferenceRange::between(1.0, 9.0, "Normal: level 1–9"))
}

/// Skeletal muscle index, AWGS 2019 sarcopenia cutoffs
fn smi(value: f64, gender: Gender) -> MetricInsight {
    let (cutoff, label) = match gender {
        Gender::Male => (7.0, "men"),
        Gender::Female => (5.7, "women"),
        Gender::Unspecified => (6.0, "adults (varies by sex)"),
    };
    let verdict = if value >= cutoff {
        (Healthy, format!("Skeletal muscle index is in a healthy range for {label} (≥ {cutoff:.1} kg/m²)."))
    } else if value >= cutoff - 0.5 {
        (
            Borderline,
            format!("Skeletal muscle index is mildly low for {label} (target ≥ {cutoff:.1} kg/m²). Consider adding resistance training."),
        )
    } else {
        (
            Warning,
            format!("Skeletal muscle index is low for {label} (< {cutoff:.1} kg/m²). This may indicate sarcopenia risk."),
        )
    };
    let description = format!("Normal for {label}: ≥ {cutoff:.1} kg/m²");
    insight("smiComputed", value, "kg/m²", verdict, ReferenceRange::at_least(cutoff, description))
}

// ── Lipid panel ─────────────────────────────────────────────────────────────

fn cholesterol_total(value: f64) -> MetricInsight {
    let verdict = if value < 200.0 {
        tier(Healthy, "Total cholesterol is in the desirable range (< 200 mg/dL).")
    } else if value < 240.0 {
        tier(Borderline, "Total cholesterol is borderline high (200–239 mg/dL). Dietary changes may help.")
    } else {
        tier(Warning, "Total cholesterol is high (≥ 240 mg/dL). Consult a doctor about cardiovascular risk.")
    };
    insight("cholesterolTotal", value, "mg/dL", verdict, ReferenceRange::below(200.0, "Desirable: < 200 mg/dL"))
}

fn cholesterol_ldl(value: f64) -> MetricInsight {
    let verdict = if value < 100.0 {
        tier(Healthy, "LDL cholesterol is optimal (< 100 mg/dL).")
    } else if value < 130.0 {
        tier(Healthy, "LDL cholesterol is near-optimal (100–129 mg/dL).")
    } else if value < 160.0 {
        tier(Borderline, "LDL cholesterol is borderline high (130–159 mg/dL). Diet and activity can lower LDL.")
    } else if value < 190.0 {
        tier(Warning, "LDL cholesterol is high (160–189 mg/dL). Medical review recommended.")
    } else {
        tier(Danger, "LDL cholesterol is very high (≥ 190 mg/dL). Please consult a doctor.")
    };
    insight("cholesterolLDL", value, "mg/dL", verdict, ReferenceRange::below(100.0, "Optimal: < 100 mg/dL"))
}

/// HDL runs the other way: higher is better
fn cholesterol_hdl(value: f64) -> MetricInsight {
    let verdict = if value < 40.0 {
        tier(Danger, "HDL cholesterol is low (< 40 mg/dL). Low HDL is a risk factor for heart disease.")
    } else if value < 60.0 {
        tier(Borderline, "HDL cholesterol is acceptable (40–59 mg/dL). Above 60 is protective.")
    } else {
        tier(Healthy, "HDL cholesterol is at a protective level (≥ 60 mg/dL).")
    };
    insight("cholesterolHDL", value, "mg/dL", verdict, ReferenceRange::at_least(60.0, "Protective: ≥ 60 mg/dL"))
}

fn triglycerides(value: f64) -> MetricInsight {
    let verdict = if value < 150.0 {
        tier(Healthy, "Triglycerides are normal (< 150 mg/dL).")
    } else if value < 200.0 {
        tier(Borderline, "Triglycerides are borderline high (150–199 mg/dL). Reducing sugar and refined carbs helps.")
    } else if value < 500.0 {
        tier(Warning, "Triglycerides are high (200–499 mg/dL). Medical evaluation recommended.")
    } else {
        tier(Danger, "Triglycerides are very high (≥ 500 mg/dL). Risk of pancreatitis, please see a doctor.")
    };
    insight("triglycerides", value, "mg/dL", verdict, ReferenceRange::below(150.0, "Normal: < 150 mg/dL"))
}

// ── Blood sugar ─────────────────────────────────────────────────────────────

fn fasting_glucose(value: f64) -> MetricInsight {
    let verdict = if value < 70.0 {
        tier(Warning, "Fasting glucose is low (< 70 mg/dL, hypoglycemia range). Consult a doctor.")
    } else if value < 100.0 {
        tier(Healthy, "Fasting glucose is normal (70–99 mg/dL).")
    } else if value < 126.0 {
        tier(Borderline, "Fasting glucose is in the prediabetes range (100–125 mg/dL). Lifestyle changes can reverse this.")
    } else {
        tier(Danger, "Fasting glucose is in the diabetes range (≥ 126 mg/dL). Please consult a doctor.")
    };
    insight("fastingGlucose", value, "mg/dL", verdict, ReferenceRange::between(70.0, 99.0, "Normal: 70–99 mg/dL"))
}

fn hba1c(value: f64) -> MetricInsight {
    let verdict = if value < 5.7 {
        tier(Healthy, "HbA1c is in the normal range (< 5.7%).")
    } else if value < 6.5 {
        tier(Borderline, "HbA1c is in the prediabetes range (5.7–6.4%). Diet and exercise can bring this down.")
    } else {
        tier(Danger, "HbA1c is in the diabetes range (≥ 6.5%). Medical management is recommended.")
    };
    insight("hba1c", value, "%", verdict, ReferenceRange::below(5.7, "Normal: < 5.7%"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::snapshot::MetricSnapshotItem;
    use chrono::NaiveDate;

    fn evaluate(metric_type: &str, value: f64, gender: Gender) -> MetricInsight {
        let item = MetricSnapshotItem {
            metric_type: metric_type.to_string(),
            value,
            unit: String::new(),
            log_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        };
        let ctx = InsightContext::from_items(vec![item], gender);
        let mut insights = ReferenceRangeEngine.analyze(&ctx).unwrap();
        assert_eq!(insights.len(), 1, "expected exactly one insight for {metric_type}");
        insights.remove(0)
    }

    fn status(metric_type: &str, value: f64) -> InsightStatus {
        evaluate(metric_type, value, Gender::Unspecified).status
    }

    fn gendered(metric_type: &str, value: f64, gender: Gender) -> InsightStatus {
        evaluate(metric_type, value, gender).status
    }

    #[test]
    fn bmi_tiers_and_boundaries() {
        assert_eq!(status("bmi", 18.49), Warning);
        assert_eq!(status("bmi", 18.5), Healthy);
        assert_eq!(status("bmi", 24.9), Healthy);
        assert_eq!(status("bmi", 25.0), Borderline);
        assert_eq!(status("bmi", 29.99), Borderline);
        assert_eq!(status("bmi", 30.0), Warning);
        assert_eq!(status("bmi", 34.9), Warning);
        assert_eq!(status("bmi", 35.0), Danger);

        let range = evaluate("bmi", 22.0, Gender::Male).reference_range.unwrap();
        assert_eq!((range.min, range.max), (Some(18.5), Some(24.9)));
    }

    #[test]
    fn body_fat_male_tiers() {
        assert_eq!(gendered("bodyFat", 5.9, Gender::Male), Danger);
        assert_eq!(gendered("bodyFat", 6.0, Gender::Male), Healthy);
        assert_eq!(gendered("bodyFat", 17.9, Gender::Male), Healthy);
        assert_eq!(gendered("bodyFat", 18.0, Gender::Male), Borderline);
        assert_eq!(gendered("bodyFat", 24.9, Gender::Male), Borderline);
        assert_eq!(gendered("bodyFat", 25.0, Gender::Male), Warning);

        let insight = evaluate("bodyFat", 12.0, Gender::Male);
        let range = insight.reference_range.unwrap();
        assert_eq!((range.min, range.max), (Some(6.0), Some(17.0)));
        assert_eq!(range.description, "Normal for male: 6.0–17.0%");
    }

    #[test]
    fn body_fat_female_tiers() {
        assert_eq!(gendered("bodyFat", 15.9, Gender::Female), Danger);
        assert_eq!(gendered("bodyFat", 16.0, Gender::Female), Healthy);
        assert_eq!(gendered("bodyFat", 24.9, Gender::Female), Healthy);
        assert_eq!(gendered("bodyFat", 25.0, Gender::Female), Borderline);
        assert_eq!(gendered("bodyFat", 31.9, Gender::Female), Borderline);
        assert_eq!(gendered("bodyFat", 32.0, Gender::Female), Warning);

        let range = evaluate("bodyFat", 20.0, Gender::Female).reference_range.unwrap();
        assert_eq!((range.min, range.max), (Some(16.0), Some(24.0)));
    }

    #[test]
    fn body_fat_unspecified_uses_blended_band() {
        assert_eq!(status("bodyFat", 9.9), Danger);
        assert_eq!(status("bodyFat", 10.0), Healthy);
        assert_eq!(status("bodyFat", 21.9), Healthy);
        assert_eq!(status("bodyFat", 22.0), Borderline);
        assert_eq!(status("bodyFat", 27.9), Borderline);
        assert_eq!(status("bodyFat", 28.0), Warning);

        let range = evaluate("bodyFat", 15.0, Gender::Unspecified).reference_range.unwrap();
        assert_eq!((range.min, range.max), (Some(10.0), Some(22.0)));
        assert_eq!(range.description, "Normal (approx): 10.0–22.0%");
    }

    #[test]
    fn visceral_fat_upper_bounds_are_inclusive() {
        assert_eq!(status("visceralFat", 9.0), Healthy);
        assert_eq!(status("visceralFat", 9.01), Borderline);
        assert_eq!(status("visceralFat", 14.0), Borderline);
        assert_eq!(status("visceralFat", 14.01), Warning);

        let insight = evaluate("visceralFat", 12.0, Gender::Unspecified);
        assert_eq!(insight.message, "Visceral fat level is mildly elevated (12). Target is 1–9.");
    }

    #[test]
    fn smi_cutoffs_by_gender() {
        assert_eq!(gendered("smiComputed", 7.0, Gender::Male), Healthy);
        assert_eq!(gendered("smiComputed", 6.5, Gender::Male), Borderline);
        assert_eq!(gendered("smiComputed", 6.49, Gender::Male), Warning);

        assert_eq!(gendered("smiComputed", 5.7, Gender::Female), Healthy);
        assert_eq!(gendered("smiComputed", 5.2, Gender::Female), Borderline);
        assert_eq!(gendered("smiComputed", 5.19, Gender::Female), Warning);

        assert_eq!(status("smiComputed", 6.0), Healthy);
        assert_eq!(status("smiComputed", 5.5), Borderline);
        assert_eq!(status("smiComputed", 5.49), Warning);

        let range = evaluate("smiComputed", 8.0, Gender::Male).reference_range.unwrap();
        assert_eq!((range.min, range.max), (Some(7.0), None));
    }

    #[test]
    fn lipid_panel_tiers() {
        assert_eq!(status("cholesterolTotal", 199.9), Healthy);
        assert_eq!(status("cholesterolTotal", 200.0), Borderline);
        assert_eq!(status("cholesterolTotal", 239.9), Borderline);
        assert_eq!(status("cholesterolTotal", 240.0), Warning);

        assert_eq!(status("cholesterolLDL", 99.0), Healthy);
        assert_eq!(status("cholesterolLDL", 100.0), Healthy);
        assert_eq!(status("cholesterolLDL", 129.9), Healthy);
        assert_eq!(status("cholesterolLDL", 130.0), Borderline);
        assert_eq!(status("cholesterolLDL", 160.0), Warning);
        assert_eq!(status("cholesterolLDL", 189.9), Warning);
        assert_eq!(status("cholesterolLDL", 190.0), Danger);

        assert_eq!(status("triglycerides", 149.9), Healthy);
        assert_eq!(status("triglycerides", 150.0), Borderline);
        assert_eq!(status("triglycerides", 200.0), Warning);
        assert_eq!(status("triglycerides", 499.9), Warning);
        assert_eq!(status("triglycerides", 500.0), Danger);
    }

    #[test]
    fn hdl_is_inverted() {
        assert_eq!(status("cholesterolHDL", 39.9), Danger);
        assert_eq!(status("cholesterolHDL", 40.0), Borderline);
        assert_eq!(status("cholesterolHDL", 59.99), Borderline);
        assert_eq!(status("cholesterolHDL", 60.0), Healthy);

        let range = evaluate("cholesterolHDL", 70.0, Gender::Unspecified).reference_range.unwrap();
        assert_eq!((range.min, range.max), (Some(60.0), None));
    }

    #[test]
    fn blood_sugar_tiers() {
        assert_eq!(status("fastingGlucose", 69.9), Warning);
        assert_eq!(status("fastingGlucose", 70.0), Healthy);
        assert_eq!(status("fastingGlucose", 99.9), Healthy);
        assert_eq!(status("fastingGlucose", 100.0), Borderline);
        assert_eq!(status("fastingGlucose", 125.9), Borderline);
        assert_eq!(status("fastingGlucose", 126.0), Danger);

        assert_eq!(status("hba1c", 5.69), Healthy);
        assert_eq!(status("hba1c", 5.7), Borderline);
        assert_eq!(status("hba1c", 6.49), Borderline);
        assert_eq!(status("hba1c", 6.5), Danger);
    }

    #[test]
    fn output_follows_rule_order() {
        let items = ["hba1c", "bmi", "cholesterolHDL", "bodyFat"].map(|metric_type| MetricSnapshotItem {
            metric_type: metric_type.to_string(),
            value: 50.0,
            unit: String::new(),
            log_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        });
        let ctx = InsightContext::from_items(items, Gender::Unspecified);

        let order: Vec<String> = ReferenceRangeEngine
            .analyze(&ctx)
            .unwrap()
            .into_iter()
            .map(|i| i.metric_type)
            .collect();
        assert_eq!(order, vec!["bmi", "bodyFat", "cholesterolHDL", "hba1c"]);
    }

    #[test]
    fn unrelated_metrics_are_ignored() {
        let item = MetricSnapshotItem {
            metric_type: "weight".to_string(),
            value: 80.0,
            unit: "kg".to_string(),
            log_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        };
        let ctx = InsightContext::from_items(vec![item], Gender::Male);
        assert!(ReferenceRangeEngine.analyze(&ctx).unwrap().is_empty());
    }
}
