use crate::error::AppError;

pub mod advisory;
pub mod health;
pub mod risk;

/// Reject classifier input the core cannot interpret.
///
/// The classifier always yields a probability in [0, 1]; anything else means
/// the caller built the request by hand and got it wrong.
pub(crate) fn validate_classification(label: &str, confidence: f64) -> Result<(), AppError> {
    if label.trim().is_empty() {
        return Err(AppError::Validation {
            message: "label must not be empty".to_string(),
            field: Some("label".to_string()),
            received: Some(serde_json::Value::String(label.to_string())),
            docs_hint: Some(
                "Pass the top prediction label returned by the classifier.".to_string(),
            ),
        });
    }

    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(AppError::Validation {
            message: "confidence must be a number between 0 and 1".to_string(),
            field: Some("confidence".to_string()),
            received: serde_json::Number::from_f64(confidence).map(serde_json::Value::Number),
            docs_hint: Some("Pass the classifier probability, e.g. 0.87.".to_string()),
        });
    }

    Ok(())
}
