// Synthscan Data Models
// Shared types for the analysis facade and its inference collaborators

use serde::{Deserialize, Serialize};

/// Content modality declared by the caller.
///
/// Image and Video share identical handling: video is represented to the
/// image capability by a single frame supplied by the caller, so no frame
/// extraction happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    Image,
    Video,
    Audio,
    Text,
}

impl Modality {
    /// Parse a caller-supplied modality label; `None` for unrecognized labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
        }
    }
}

/// One ranked entry from an inference collaborator.
///
/// Sequences are consumed in the collaborator's own confidence ordering;
/// only the top entry is consulted for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub label: String,
    /// Raw model confidence in [0, 1].
    #[serde(alias = "score")]
    pub confidence: f64,
}

/// Evidence behind a successful analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationDetails {
    /// Winning label as reported by the collaborator.
    pub label: String,
    /// The winning label's raw confidence as a percentage (not the
    /// polarity-normalized score).
    pub confidence: f64,
    /// Full ranked output echoed for transparency.
    #[serde(default)]
    pub ranked: Vec<ClassificationEntry>,
}

/// Structured failure description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
}

/// Either classification evidence or a structured error; callers branch on
/// which variant is present, never on score magnitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisDetails {
    Error(ErrorDetails),
    Classification(ClassificationDetails),
}

/// Uniform result of one analysis call.
///
/// Invariants: a non-error report has `0 <= score <= 100`; an error report
/// has `score == 0` and `details.error` set. A score of 0 alone is ambiguous
/// between "confidently authentic" and "analysis failed" — inspect details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub request_id: String,
    /// Fake likelihood in [0, 100].
    pub score: f64,
    pub details: AnalysisDetails,
}

impl AnalysisReport {
    /// Successful analysis: normalized score plus the raw evidence.
    pub fn classified(
        score: f64,
        label: impl Into<String>,
        confidence_pct: f64,
        ranked: Vec<ClassificationEntry>,
    ) -> Self {
        Self {
            request_id: new_request_id(),
            score: score.clamp(0.0, 100.0),
            details: AnalysisDetails::Classification(ClassificationDetails {
                label: label.into(),
                confidence: confidence_pct,
                ranked,
            }),
        }
    }

    /// Failed analysis: score pinned to 0, message carried in details.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::from_error(ErrorDetails {
            error: message.into(),
            text_length: None,
        })
    }

    pub fn from_error(details: ErrorDetails) -> Self {
        Self {
            request_id: new_request_id(),
            score: 0.0,
            details: AnalysisDetails::Error(details),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.details, AnalysisDetails::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.details {
            AnalysisDetails::Error(e) => Some(&e.error),
            AnalysisDetails::Classification(_) => None,
        }
    }
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
