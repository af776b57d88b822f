// Audio Analyzer
// Stages bytes in a scoped temp artifact, decodes to 16 kHz mono, re-encodes
// to WAV, and routes the top classification through polarity rules

use super::polarity::{self, AUDIO_POLARITY};
use crate::models::AnalysisReport;
use crate::services::audio_codec::AudioCodec;
use crate::services::inference::ClassifierError;
use crate::services::model_cache::ModelHandleCache;
use crate::services::temp_artifact::TempArtifact;
use std::path::Path;
use tracing::{debug, warn};

/// The rate the audio capability was trained on. Mismatched rates silently
/// degrade classifier accuracy, so resampling is mandatory, not optional.
pub(crate) const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Hard error boundary: file I/O, decode, and inference failures become the
/// error report shape, nothing propagates to the facade.
pub(crate) async fn analyze(
    models: &ModelHandleCache,
    codec: &dyn AudioCodec,
    data: &[u8],
    filename: Option<&str>,
) -> AnalysisReport {
    match classify(models, codec, data, filename).await {
        Ok(report) => report,
        Err(e) => {
            warn!("[AUDIO_ANALYZER] analysis failed: {}", e);
            AnalysisReport::failure(format!("Error processing audio: {}", e))
        }
    }
}

async fn classify(
    models: &ModelHandleCache,
    codec: &dyn AudioCodec,
    data: &[u8],
    filename: Option<&str>,
) -> anyhow::Result<AnalysisReport> {
    let artifact = TempArtifact::write(data, source_extension(filename))?;
    debug!(
        "[AUDIO_ANALYZER] staged {} bytes at {}",
        data.len(),
        artifact.path().display()
    );

    let samples = codec.decode_mono(artifact.path(), TARGET_SAMPLE_RATE)?;
    // Re-encode instead of forwarding the original bytes: arbitrary input
    // codecs are not guaranteed to be accepted by the classifier.
    let wav = codec.encode_wav(&samples, TARGET_SAMPLE_RATE)?;

    let model = models.audio()?;
    let ranked = model.classify(&wav).await?;
    let top = ranked
        .first()
        .cloned()
        .ok_or(ClassifierError::EmptyOutput)?;

    let score = polarity::normalize(&top, &AUDIO_POLARITY);
    Ok(AnalysisReport::classified(
        score,
        top.label,
        top.confidence * 100.0,
        ranked,
    ))
    // artifact drops here: the staged file is removed on success and on every
    // early `?` return above
}

fn source_extension(filename: Option<&str>) -> Option<&str> {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
}
