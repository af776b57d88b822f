// Detection Engine
// The analysis facade: strict modality dispatch over the private analyzers

use super::{audio_analyzer, image_analyzer, text_analyzer};
use crate::models::{AnalysisReport, Modality};
use crate::services::audio_codec::{AudioCodec, SymphoniaCodec};
use crate::services::config_store::AppConfig;
use crate::services::model_cache::ModelHandleCache;
use std::sync::Arc;
use tracing::info;

pub(crate) const UNSUPPORTED_MODALITY: &str = "Unsupported modality";

/// The single supported entry point for analysis. Every public method is
/// total: failures are encoded in the returned report, never thrown.
pub struct DetectionEngine {
    models: ModelHandleCache,
    codec: Arc<dyn AudioCodec>,
}

impl DetectionEngine {
    pub fn new(models: ModelHandleCache) -> Self {
        Self::with_codec(models, Arc::new(SymphoniaCodec::new()))
    }

    pub fn with_codec(models: ModelHandleCache, codec: Arc<dyn AudioCodec>) -> Self {
        Self { models, codec }
    }

    /// Engine backed by remote inference models resolved from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(ModelHandleCache::remote(config))
    }

    /// Analyze binary content under a declared modality.
    ///
    /// `filename` is consulted only by the audio path, to recover the source
    /// extension for decoding. Video shares the image path: the payload is a
    /// representative frame supplied by the caller.
    pub async fn analyze_content(
        &self,
        modality: Modality,
        data: &[u8],
        filename: Option<&str>,
    ) -> AnalysisReport {
        let report = match modality {
            Modality::Image | Modality::Video => image_analyzer::analyze(&self.models, data).await,
            Modality::Audio => {
                audio_analyzer::analyze(&self.models, self.codec.as_ref(), data, filename).await
            }
            // Text arrives through analyze_text; raw bytes declared as Text
            // have no defined decoding here.
            Modality::Text => AnalysisReport::failure(UNSUPPORTED_MODALITY),
        };

        info!(
            "[ENGINE] request_id={} modality={} bytes={} score={:.1} error={}",
            report.request_id,
            modality.as_str(),
            data.len(),
            report.score,
            report.is_error()
        );
        report
    }

    /// Analyze a text document.
    pub async fn analyze_text(&self, text: &str) -> AnalysisReport {
        let report = text_analyzer::analyze(&self.models, text).await;
        info!(
            "[ENGINE] request_id={} modality=Text chars={} score={:.1} error={}",
            report.request_id,
            text.chars().count(),
            report.score,
            report.is_error()
        );
        report
    }

    /// Dispatch on a caller-supplied modality label. Unknown labels yield the
    /// unsupported-modality report without touching any collaborator.
    pub async fn analyze_labeled(
        &self,
        modality: &str,
        data: &[u8],
        filename: Option<&str>,
    ) -> AnalysisReport {
        match Modality::parse(modality) {
            Some(parsed) => self.analyze_content(parsed, data, filename).await,
            None => {
                info!("[ENGINE] rejected unknown modality label {:?}", modality);
                AnalysisReport::failure(UNSUPPORTED_MODALITY)
            }
        }
    }
}
