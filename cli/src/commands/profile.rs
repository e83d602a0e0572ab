use melascope_core::classification::ClassificationResult;
use melascope_core::risk::{self, RULES};
use serde_json::json;

use crate::util::{exit_error, pretty};

/// Offline risk profile; no API or LLM involved.
pub fn run(label: &str, confidence: f64) -> i32 {
    if !(0.0..=1.0).contains(&confidence) {
        exit_error(
            &format!("confidence must be between 0 and 1, got {confidence}"),
            Some("Pass the classifier probability, e.g. --confidence 0.87"),
        );
    }

    let result = ClassificationResult::new(label, confidence);
    println!("{}", pretty(&profile_output(&result)));
    0
}

fn profile_output(result: &ClassificationResult) -> serde_json::Value {
    json!({
        "label": result.label,
        "confidence": result.confidence,
        "group": risk::group_of(&result.label),
        "profile": result.risk_profile(),
    })
}

/// Print the precedence-ordered rule table.
pub fn rules() -> i32 {
    println!("{}", pretty(&rules_output()));
    0
}

fn rules_output() -> serde_json::Value {
    let rows: Vec<serde_json::Value> = RULES
        .iter()
        .enumerate()
        .map(|(idx, rule)| {
            json!({
                "precedence": idx + 1,
                "group": rule.group,
                "markers": rule.markers,
                "tier": rule.tier,
                "category": rule.category,
            })
        })
        .collect();
    json!({ "rules": rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_includes_group_and_profile() {
        let output = profile_output(&ClassificationResult::new("Leprosy", 0.7));
        assert_eq!(output["group"], "chronic_bacterial");
        assert_eq!(output["profile"]["tier"], "High");
    }

    #[test]
    fn rules_are_listed_in_precedence_order() {
        let output = rules_output();
        let rows = output["rules"].as_array().unwrap();

        assert_eq!(rows.len(), RULES.len());
        assert_eq!(rows[0]["precedence"], 1);
        assert_eq!(rows[0]["group"], "neoplastic");
        assert_eq!(rows[0]["tier"], "High");
        for (row, rule) in rows.iter().zip(RULES) {
            assert_eq!(row["category"], rule.category);
            assert_eq!(row["markers"], json!(rule.markers));
        }
    }
}
