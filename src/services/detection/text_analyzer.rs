// Text Analyzer
// Guards a minimum-length precondition, bounds the classified window, and
// routes the top classification through polarity rules

use super::polarity::{self, TEXT_POLARITY};
use crate::models::{AnalysisReport, ErrorDetails};
use crate::services::inference::ClassifierError;
use crate::services::model_cache::ModelHandleCache;
use tracing::{debug, warn};

/// Length thresholds (Unicode scalar count, not UTF-8 byte length)
pub(crate) const MIN_TEXT_CHARS: usize = 50; // below this the classifier has too little signal
pub(crate) const MAX_TEXT_CHARS: usize = 1000; // longer input adds latency, not detection power

const TEXT_TOO_SHORT: &str = "Text is too short for accurate analysis";

/// Hard error boundary: the length precondition and inference failures both
/// become the error report shape, nothing propagates to the facade.
pub(crate) async fn analyze(models: &ModelHandleCache, text: &str) -> AnalysisReport {
    // Correctness guard, not a performance one: rejected before any
    // collaborator is touched.
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return AnalysisReport::from_error(ErrorDetails {
            error: TEXT_TOO_SHORT.to_string(),
            text_length: Some(text.chars().count()),
        });
    }

    match classify(models, text).await {
        Ok(report) => report,
        Err(e) => {
            warn!("[TEXT_ANALYZER] analysis failed: {}", e);
            AnalysisReport::failure(format!("Error processing text: {}", e))
        }
    }
}

async fn classify(models: &ModelHandleCache, text: &str) -> anyhow::Result<AnalysisReport> {
    let window: String = text.chars().take(MAX_TEXT_CHARS).collect();
    debug!(
        "[TEXT_ANALYZER] classifying {} of {} chars",
        window.chars().count(),
        text.chars().count()
    );

    let model = models.text()?;
    let ranked = model.classify(&window).await?;
    let top = ranked
        .first()
        .cloned()
        .ok_or(ClassifierError::EmptyOutput)?;

    let score = polarity::normalize(&top, &TEXT_POLARITY);
    // Details expose the winning label and its raw confidence percentage,
    // not the inverted score.
    Ok(AnalysisReport::classified(
        score,
        top.label,
        top.confidence * 100.0,
        ranked,
    ))
}
