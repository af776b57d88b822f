// Polarity Normalization
// Maps raw (label, confidence) pairs to a canonical 0-100 fake likelihood

use crate::models::ClassificationEntry;
use tracing::warn;

/// How a label's confidence relates to fake likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Label names the authentic class; fake likelihood = 1 - confidence.
    Invert,
    /// Label names the synthetic class; confidence already is fake likelihood.
    Direct,
    /// Label matched neither set; scored like Direct as the conservative
    /// default. Kept distinct so the ambiguity is observable.
    Unknown,
}

/// Substring sets for one modality's label vocabulary.
///
/// Containment, not exact match: vocabularies vary across models
/// ("bonafide", "human-written", "Realism") and cannot be enumerated
/// per model.
#[derive(Debug, Clone, Copy)]
pub struct PolarityTable {
    pub authentic: &'static [&'static str],
    pub synthetic: &'static [&'static str],
}

pub const IMAGE_POLARITY: PolarityTable = PolarityTable {
    authentic: &["real", "realism"],
    synthetic: &["fake", "deepfake", "artificial"],
};

pub const AUDIO_POLARITY: PolarityTable = PolarityTable {
    authentic: &["real", "bonafide"],
    synthetic: &["fake", "spoof"],
};

pub const TEXT_POLARITY: PolarityTable = PolarityTable {
    authentic: &["real", "human"],
    synthetic: &["fake", "generated"],
};

impl PolarityTable {
    /// Authenticity indicators are tested first: loosely named labels can
    /// contain markers from both sets, and the authentic match wins.
    pub fn classify_label(&self, label: &str) -> Polarity {
        let label = label.to_lowercase();
        if self.authentic.iter().any(|marker| label.contains(marker)) {
            return Polarity::Invert;
        }
        if self.synthetic.iter().any(|marker| label.contains(marker)) {
            return Polarity::Direct;
        }
        Polarity::Unknown
    }
}

/// Normalize the top-ranked classification to a fake-likelihood percentage.
///
/// A confidence of exactly 0.5 goes through the same arithmetic as any other
/// value; the midpoint is not special-cased.
pub fn normalize(top: &ClassificationEntry, table: &PolarityTable) -> f64 {
    match table.classify_label(&top.label) {
        Polarity::Invert => (1.0 - top.confidence) * 100.0,
        Polarity::Direct => top.confidence * 100.0,
        Polarity::Unknown => {
            warn!(
                "[POLARITY] unrecognized label {:?}; scoring its confidence as fake likelihood",
                top.label
            );
            top.confidence * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, confidence: f64) -> ClassificationEntry {
        ClassificationEntry {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_authentic_labels_invert_across_confidence_range() {
        for i in 0..=20 {
            let c = i as f64 / 20.0;
            let score = normalize(&entry("bonafide", c), &AUDIO_POLARITY);
            assert!((score - (1.0 - c) * 100.0).abs() < 1e-9, "c={}", c);
        }
    }

    #[test]
    fn test_fake_and_unknown_labels_score_directly() {
        for i in 0..=20 {
            let c = i as f64 / 20.0;
            assert!((normalize(&entry("spoof", c), &AUDIO_POLARITY) - c * 100.0).abs() < 1e-9);
            assert!((normalize(&entry("class_7", c), &AUDIO_POLARITY) - c * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_realism_image_label() {
        let score = normalize(&entry("Realism", 0.9), &IMAGE_POLARITY);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fake_text_label() {
        let score = normalize(&entry("Fake", 0.82), &TEXT_POLARITY);
        assert!((score - 82.0).abs() < 1e-9);
    }

    #[test]
    fn test_substring_containment_not_exact_match() {
        assert_eq!(
            TEXT_POLARITY.classify_label("Human-Written"),
            Polarity::Invert
        );
        assert_eq!(
            TEXT_POLARITY.classify_label("machine-generated"),
            Polarity::Direct
        );
        assert_eq!(IMAGE_POLARITY.classify_label("HyperRealism"), Polarity::Invert);
    }

    #[test]
    fn test_authentic_checked_before_synthetic() {
        // A label carrying markers from both sets resolves to the authentic side.
        assert_eq!(
            TEXT_POLARITY.classify_label("real-vs-generated"),
            Polarity::Invert
        );
    }

    #[test]
    fn test_unknown_label_is_distinct_but_scores_direct() {
        assert_eq!(TEXT_POLARITY.classify_label("LABEL_1"), Polarity::Unknown);
        let score = normalize(&entry("LABEL_1", 0.73), &TEXT_POLARITY);
        assert!((score - 73.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_confidence_not_special_cased() {
        assert!((normalize(&entry("real", 0.5), &IMAGE_POLARITY) - 50.0).abs() < 1e-9);
        assert!((normalize(&entry("fake", 0.5), &IMAGE_POLARITY) - 50.0).abs() < 1e-9);
    }
}
