// Image Analyzer
// Decodes bytes to RGB and routes the top classification through polarity rules

use super::polarity::{self, IMAGE_POLARITY};
use crate::models::AnalysisReport;
use crate::services::inference::ClassifierError;
use crate::services::model_cache::ModelHandleCache;
use tracing::{debug, warn};

/// Hard error boundary: decode and inference failures become the error
/// report shape, nothing propagates to the facade.
pub(crate) async fn analyze(models: &ModelHandleCache, data: &[u8]) -> AnalysisReport {
    match classify(models, data).await {
        Ok(report) => report,
        Err(e) => {
            warn!("[IMAGE_ANALYZER] analysis failed: {}", e);
            AnalysisReport::failure(format!("Error processing image: {}", e))
        }
    }
}

async fn classify(models: &ModelHandleCache, data: &[u8]) -> anyhow::Result<AnalysisReport> {
    let pixels = image::load_from_memory(data)?.to_rgb8();
    debug!(
        "[IMAGE_ANALYZER] decoded {}x{} frame from {} bytes",
        pixels.width(),
        pixels.height(),
        data.len()
    );

    let model = models.image()?;
    let ranked = model.classify(&pixels).await?;
    let top = ranked
        .first()
        .cloned()
        .ok_or(ClassifierError::EmptyOutput)?;

    let score = polarity::normalize(&top, &IMAGE_POLARITY);
    Ok(AnalysisReport::classified(
        score,
        top.label,
        top.confidence * 100.0,
        ranked,
    ))
}
