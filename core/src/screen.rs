//! Keyword screen for generated text that names treatments or medications.
//!
//! The prompt forbids such content, but the model can ignore instructions.
//! When enabled, the advisor swaps any flagged text for a fixed safe value.

use std::sync::LazyLock;

use regex::Regex;

const SCREENED_TERMS: &[&str] = &[
    "antibiotics?",
    "antifungals?",
    "antivirals?",
    "antiparasitics?",
    "antihistamines?",
    "corticosteroids?",
    "steroids?",
    "retinoids?",
    "immunosuppressants?",
    "creams?",
    "ointments?",
    "lotions?",
    "pills?",
    "tablets?",
    "capsules?",
    "dosages?",
    "doses?",
    "prescribe",
    "prescriptions?",
    "mg",
    r"\d+(?:\.\d+)?\s*mg",
];

static SCREEN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = SCREENED_TERMS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("screen pattern is valid")
});

/// First screened term found in `text`, lowercased.
pub fn flagged_term(text: &str) -> Option<String> {
    SCREEN.find(text).map(|m| m.as_str().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_medication_classes_case_insensitively() {
        assert_eq!(
            flagged_term("An Antifungal cream is often used."),
            Some("antifungal".to_string())
        );
        assert_eq!(flagged_term("Take 200 mg daily"), Some("200 mg".to_string()));
        assert_eq!(flagged_term("Dose in mg"), Some("dose".to_string()));
        assert_eq!(flagged_term("Corticosteroids help"), Some("corticosteroids".to_string()));
    }

    #[test]
    fn flags_plurals_and_unspaced_doses() {
        assert_eq!(
            flagged_term("Topical creams are common"),
            Some("creams".to_string())
        );
        assert_eq!(
            flagged_term("Take 200mg twice daily"),
            Some("200mg".to_string())
        );
        assert_eq!(flagged_term("Split the doses"), Some("doses".to_string()));
    }

    #[test]
    fn ignores_words_that_only_contain_a_term() {
        assert_eq!(flagged_term("Creamy texture, pillow, dosed nothing"), None);
        assert_eq!(
            flagged_term("The image shows signs consistent with a nevus. See a doctor."),
            None
        );
    }
}
