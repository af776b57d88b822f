// Analysis API
// Total entry points over a process-global engine

use crate::models::{AnalysisReport, Modality};
use crate::services::config_store::{AppConfig, ConfigStore};
use crate::services::detection::DetectionEngine;
use std::sync::OnceLock;
use tracing::warn;

static ENGINE: OnceLock<DetectionEngine> = OnceLock::new();

/// The process-global engine, built on first use from the stored config plus
/// environment overrides. Model handles underneath it are likewise created on
/// first use and reused for the process lifetime.
fn global_engine() -> &'static DetectionEngine {
    ENGINE.get_or_init(|| DetectionEngine::from_config(&load_config()))
}

fn load_config() -> AppConfig {
    let stored = match ConfigStore::default_config_dir() {
        Some(dir) => match ConfigStore::new(dir).load() {
            Ok(config) => config,
            Err(e) => {
                warn!("[API] falling back to default config: {}", e);
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    };
    stored.with_env_overrides()
}

/// Analyze binary content under a declared modality. Never panics and never
/// returns an error: all failure is encoded in the report.
pub async fn analyze_content(
    modality: Modality,
    data: &[u8],
    filename: Option<&str>,
) -> AnalysisReport {
    global_engine().analyze_content(modality, data, filename).await
}

/// Analyze a text document. Same totality guarantee as `analyze_content`.
pub async fn analyze_text(text: &str) -> AnalysisReport {
    global_engine().analyze_text(text).await
}

/// Analyze under a caller-supplied modality label; unknown labels yield the
/// unsupported-modality report.
pub async fn analyze_labeled(
    modality: &str,
    data: &[u8],
    filename: Option<&str>,
) -> AnalysisReport {
    global_engine().analyze_labeled(modality, data, filename).await
}
