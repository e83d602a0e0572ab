use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Confidence below which the note is marked as uncertain.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Appended to every note when the classifier confidence is low.
pub const LOW_CONFIDENCE_SUFFIX: &str = " (Model confidence is LOW. Emphasize uncertainty.)";

pub const DEFAULT_CATEGORY: &str = "Skin Condition";
pub const DEFAULT_NOTE: &str = "Standard dermatological condition.";

/// Ordinal risk tier. Ordering follows severity: Low < Medium < Medium-High < High.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum RiskTier {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::MediumHigh => "Medium-High",
            RiskTier::High => "High",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule group a label resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskGroup {
    Neoplastic,
    PreCancerous,
    Fungal,
    Viral,
    Bacterial,
    Parasitic,
    ChronicBacterial,
    Inflammatory,
    Benign,
    Unclassified,
}

/// One row of the precedence-ordered rule table.
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub group: RiskGroup,
    /// Lowercase substrings; any one of them selects the rule.
    pub markers: &'static [&'static str],
    pub tier: RiskTier,
    pub category: &'static str,
    pub note: &'static str,
}

impl RiskRule {
    fn matches(&self, lowered_label: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| lowered_label.contains(marker))
    }
}

/// Rule table, highest precedence first. The first matching row wins, so a
/// label such as "keratosis with carcinoma" resolves to the neoplastic row
/// even though it also contains a benign marker.
pub const RULES: &[RiskRule] = &[
    RiskRule {
        group: RiskGroup::Neoplastic,
        markers: &[
            "melanoma",
            "basal cell",
            "squamous cell",
            "mycosis fungoides",
            "carcinoma",
        ],
        tier: RiskTier::High,
        category: "Neoplastic / Potential Malignancy",
        note: "Urgent. Suggest professional biopsy/evaluation. Do not panic but emphasize importance of doctor visit.",
    },
    RiskRule {
        group: RiskGroup::PreCancerous,
        markers: &["actinic keratosis"],
        tier: RiskTier::MediumHigh,
        category: "Pre-cancerous (Actinic Keratosis)",
        note: "Potential to develop into carcinoma if left unattended. Needs medical attention.",
    },
    RiskRule {
        group: RiskGroup::Fungal,
        markers: &["tinea"],
        tier: RiskTier::Medium,
        category: "Fungal Infection",
        note: "Contagious. Needs professional evaluation for a care plan.",
    },
    RiskRule {
        group: RiskGroup::Viral,
        markers: &["herpes", "molluscum"],
        tier: RiskTier::Medium,
        category: "Viral Infection",
        note: "Contagious. Herpes needs clinical review; Molluscum is often self-limiting but contagious.",
    },
    RiskRule {
        group: RiskGroup::Bacterial,
        markers: &["impetigo"],
        tier: RiskTier::Medium,
        category: "Bacterial Infection",
        note: "Highly contagious. Needs clinical review.",
    },
    RiskRule {
        group: RiskGroup::Parasitic,
        markers: &["larva", "pediculosis", "tungiasis", "scabies"],
        tier: RiskTier::Medium,
        category: "Parasitic Infestation",
        note: "Needs clinical review. Hygiene advice important.",
    },
    RiskRule {
        group: RiskGroup::ChronicBacterial,
        markers: &["leprosy"],
        tier: RiskTier::High,
        category: "Chronic Bacterial Infection (Leprosy)",
        note: "Serious condition requiring specialized long-term care.",
    },
    RiskRule {
        group: RiskGroup::Inflammatory,
        markers: &[
            "psoriasis",
            "lichen",
            "lupus",
            "porokeratosis",
            "pityriasis",
            "darier",
            "hailey",
            "epidermolysis",
        ],
        tier: RiskTier::Medium,
        category: "Inflammatory / Autoimmune",
        note: "Chronic management. Not usually an immediate emergency, but needs a dermatologist for quality of life.",
    },
    RiskRule {
        group: RiskGroup::Benign,
        markers: &[
            "nevus",
            "benign",
            "keratosis",
            "dermatofibroma",
            "vascular",
            "skin tag",
            "papilomatosis",
        ],
        tier: RiskTier::Low,
        category: "Benign Growth",
        note: "Likely harmless. Monitor for changes.",
    },
];

/// Deterministic risk categorization of a classifier label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskProfile {
    pub tier: RiskTier,
    pub category: String,
    pub note: String,
}

/// First rule whose markers occur in `label` (case-insensitive), if any.
pub fn matching_rule(label: &str) -> Option<&'static RiskRule> {
    let lowered = label.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowered))
}

/// Group a label resolves to; `Unclassified` when no rule matches.
pub fn group_of(label: &str) -> RiskGroup {
    matching_rule(label).map_or(RiskGroup::Unclassified, |rule| rule.group)
}

/// Map a classifier result to its risk profile. Total: never fails.
pub fn classify(label: &str, confidence: f64) -> RiskProfile {
    let (tier, category, note) = match matching_rule(label) {
        Some(rule) => (rule.tier, rule.category, rule.note),
        None => (RiskTier::Medium, DEFAULT_CATEGORY, DEFAULT_NOTE),
    };

    let mut note = note.to_string();
    if confidence < LOW_CONFIDENCE_THRESHOLD {
        note.push_str(LOW_CONFIDENCE_SUFFIX);
    }

    RiskProfile {
        tier,
        category: category.to_string(),
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neoplastic_markers_are_high_regardless_of_case() {
        for label in [
            "Melanoma",
            "MELANOMA IN SITU",
            "Basal Cell Carcinoma",
            "squamous cell carcinoma",
            "Mycosis Fungoides",
            "Merkel cell carcinoma",
        ] {
            let profile = classify(label, 0.9);
            assert_eq!(profile.tier, RiskTier::High, "label {label}");
            assert_eq!(profile.category, "Neoplastic / Potential Malignancy");
        }
    }

    #[test]
    fn leprosy_is_high_inside_infectious_group() {
        let profile = classify("Leprosy Borderline", 0.8);
        assert_eq!(profile.tier, RiskTier::High);
        assert_eq!(profile.category, "Chronic Bacterial Infection (Leprosy)");
        assert_eq!(group_of("leprosy"), RiskGroup::ChronicBacterial);
    }

    #[test]
    fn other_infections_are_medium_with_own_category() {
        let cases = [
            ("Tinea Ringworm Candidiasis", "Fungal Infection"),
            ("Herpes HPV", "Viral Infection"),
            ("Molluscum Contagiosum", "Viral Infection"),
            ("Impetigo", "Bacterial Infection"),
            ("Larva Migrans", "Parasitic Infestation"),
            ("Scabies", "Parasitic Infestation"),
            ("Tungiasis", "Parasitic Infestation"),
        ];
        for (label, category) in cases {
            let profile = classify(label, 0.9);
            assert_eq!(profile.tier, RiskTier::Medium, "label {label}");
            assert_eq!(profile.category, category, "label {label}");
        }
    }

    #[test]
    fn actinic_keratosis_beats_benign_keratosis() {
        let profile = classify("Actinic Keratosis", 0.9);
        assert_eq!(profile.tier, RiskTier::MediumHigh);

        let profile = classify("Seborrheic Keratosis", 0.9);
        assert_eq!(profile.tier, RiskTier::Low);
        assert_eq!(profile.category, "Benign Growth");
    }

    #[test]
    fn overlapping_markers_resolve_by_rule_order() {
        // "carcinoma" (row 1) wins over "keratosis" (benign row).
        assert_eq!(classify("keratosis carcinoma", 0.9).tier, RiskTier::High);
        // "lichen" (inflammatory) wins over "benign".
        assert_eq!(
            classify("benign lichen planus", 0.9).category,
            "Inflammatory / Autoimmune"
        );
        // "tinea" (fungal) wins over "vascular".
        assert_eq!(group_of("vascular tinea"), RiskGroup::Fungal);
    }

    #[test]
    fn inflammatory_markers_are_medium() {
        for label in [
            "Psoriasis",
            "Lupus",
            "Darier Disease",
            "Hailey-Hailey",
            "Epidermolysis Bullosa",
        ] {
            let profile = classify(label, 0.9);
            assert_eq!(profile.tier, RiskTier::Medium, "label {label}");
            assert_eq!(profile.category, "Inflammatory / Autoimmune");
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_default() {
        for label in ["Acne", "", "Rosacea", "unknown-label-42"] {
            let profile = classify(label, 0.95);
            assert_eq!(profile.tier, RiskTier::Medium);
            assert_eq!(profile.category, DEFAULT_CATEGORY);
            assert_eq!(profile.note, DEFAULT_NOTE);
            assert_eq!(group_of(label), RiskGroup::Unclassified);
        }
    }

    #[test]
    fn low_confidence_appends_suffix_for_every_rule() {
        for label in ["Melanoma", "Nevus", "Acne", "Leprosy"] {
            let low = classify(label, 0.59);
            assert!(low.note.ends_with(LOW_CONFIDENCE_SUFFIX), "label {label}");

            let high = classify(label, 0.6);
            assert!(!high.note.ends_with(LOW_CONFIDENCE_SUFFIX), "label {label}");
        }
    }

    #[test]
    fn classify_is_deterministic() {
        assert_eq!(classify("Dermatofibroma", 0.3), classify("Dermatofibroma", 0.3));
    }

    #[test]
    fn melanoma_at_low_confidence() {
        let profile = classify("Melanoma", 0.42);
        assert_eq!(profile.tier, RiskTier::High);
        assert_eq!(profile.category, "Neoplastic / Potential Malignancy");
        assert!(profile.note.ends_with(LOW_CONFIDENCE_SUFFIX));
    }

    #[test]
    fn tiers_are_ordered_by_severity() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::MediumHigh);
        assert!(RiskTier::MediumHigh < RiskTier::High);
    }

    #[test]
    fn medium_high_serializes_with_hyphen() {
        let json = serde_json::to_string(&RiskTier::MediumHigh).unwrap();
        assert_eq!(json, "\"Medium-High\"");
        assert_eq!(RiskTier::MediumHigh.to_string(), "Medium-High");
    }
}
