// Detection Module
// Score normalization and modality orchestration:
// - polarity: table-driven label polarity rules and 0-100 normalization
// - image_analyzer / audio_analyzer / text_analyzer: per-modality analyzers,
//   private to the engine
// - engine: the analysis facade dispatching by declared modality

pub mod engine;
pub mod polarity;

mod audio_analyzer;
mod image_analyzer;
mod text_analyzer;

pub use engine::DetectionEngine;
pub use polarity::{
    normalize, Polarity, PolarityTable, AUDIO_POLARITY, IMAGE_POLARITY, TEXT_POLARITY,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::ClassificationEntry;
    use crate::services::audio_codec::{AudioCodec, CodecError};
    use crate::services::inference::{
        AudioClassifier, ClassifierError, ImageClassifier, TextClassifier,
    };
    use crate::services::model_cache::ModelHandleCache;
    use async_trait::async_trait;
    use image::RgbImage;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Classifier double serving one scripted ranking (or a scripted failure)
    /// for all three capabilities, counting invocations.
    pub(crate) struct ScriptedClassifier {
        ranked: Vec<ClassificationEntry>,
        failure: Option<&'static str>,
        calls: AtomicUsize,
        last_text_chars: Mutex<Option<usize>>,
        last_audio_bytes: Mutex<Option<Vec<u8>>>,
    }

    impl ScriptedClassifier {
        pub(crate) fn new(entries: &[(&str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                ranked: entries
                    .iter()
                    .map(|(label, confidence)| ClassificationEntry {
                        label: label.to_string(),
                        confidence: *confidence,
                    })
                    .collect(),
                failure: None,
                calls: AtomicUsize::new(0),
                last_text_chars: Mutex::new(None),
                last_audio_bytes: Mutex::new(None),
            })
        }

        pub(crate) fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                ranked: Vec::new(),
                failure: Some(message),
                calls: AtomicUsize::new(0),
                last_text_chars: Mutex::new(None),
                last_audio_bytes: Mutex::new(None),
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_text_chars(&self) -> Option<usize> {
            *self.last_text_chars.lock().unwrap()
        }

        pub(crate) fn last_audio_bytes(&self) -> Option<Vec<u8>> {
            self.last_audio_bytes.lock().unwrap().clone()
        }

        fn respond(&self) -> Result<Vec<ClassificationEntry>, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure {
                Some(message) => Err(ClassifierError::Init(message.to_string())),
                None => Ok(self.ranked.clone()),
            }
        }
    }

    #[async_trait]
    impl ImageClassifier for ScriptedClassifier {
        async fn classify(
            &self,
            _image: &RgbImage,
        ) -> Result<Vec<ClassificationEntry>, ClassifierError> {
            self.respond()
        }
    }

    #[async_trait]
    impl AudioClassifier for ScriptedClassifier {
        async fn classify(
            &self,
            wav_bytes: &[u8],
        ) -> Result<Vec<ClassificationEntry>, ClassifierError> {
            *self.last_audio_bytes.lock().unwrap() = Some(wav_bytes.to_vec());
            self.respond()
        }
    }

    #[async_trait]
    impl TextClassifier for ScriptedClassifier {
        async fn classify(
            &self,
            text: &str,
        ) -> Result<Vec<ClassificationEntry>, ClassifierError> {
            *self.last_text_chars.lock().unwrap() = Some(text.chars().count());
            self.respond()
        }
    }

    /// Cache whose three capabilities all resolve to the same double.
    pub(crate) fn cache_with(classifier: &Arc<ScriptedClassifier>) -> ModelHandleCache {
        let image = Arc::clone(classifier);
        let audio = Arc::clone(classifier);
        let text = Arc::clone(classifier);
        ModelHandleCache::new(
            move || Ok(Arc::clone(&image) as Arc<dyn ImageClassifier>),
            move || Ok(Arc::clone(&audio) as Arc<dyn AudioClassifier>),
            move || Ok(Arc::clone(&text) as Arc<dyn TextClassifier>),
        )
    }

    /// Codec double that records the staged artifact path (and whether it
    /// still existed at decode time) so tests can assert cleanup.
    pub(crate) struct RecordingCodec {
        seen_path: Mutex<Option<PathBuf>>,
        fail_decode: bool,
    }

    impl RecordingCodec {
        pub(crate) fn succeeding() -> Self {
            Self {
                seen_path: Mutex::new(None),
                fail_decode: false,
            }
        }

        pub(crate) fn failing_decode() -> Self {
            Self {
                seen_path: Mutex::new(None),
                fail_decode: true,
            }
        }

        pub(crate) fn seen_path(&self) -> Option<PathBuf> {
            self.seen_path.lock().unwrap().clone()
        }
    }

    impl AudioCodec for RecordingCodec {
        fn decode_mono(&self, path: &Path, _target_rate: u32) -> Result<Vec<f32>, CodecError> {
            *self.seen_path.lock().unwrap() = Some(path.to_path_buf());
            if self.fail_decode {
                return Err(CodecError::Decode("scripted decode failure".to_string()));
            }
            Ok(vec![0.0; 1600])
        }

        fn encode_wav(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CodecError> {
            crate::services::audio_codec::SymphoniaCodec::new().encode_wav(samples, sample_rate)
        }
    }

    /// Minimal valid PNG payload: a 2x2 RGB frame.
    pub(crate) fn png_bytes() -> Vec<u8> {
        let mut frame = RgbImage::new(2, 2);
        frame.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        frame.put_pixel(1, 1, image::Rgb([0, 0, 255]));

        let mut cursor = std::io::Cursor::new(Vec::new());
        frame
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    /// Minimal valid WAV payload: a short 16 kHz mono tone.
    pub(crate) fn wav_bytes() -> Vec<u8> {
        let samples: Vec<f32> = (0..320).map(|i| (i as f32 * 0.2).sin() * 0.5).collect();
        crate::services::audio_codec::SymphoniaCodec::new()
            .encode_wav(&samples, 16_000)
            .unwrap()
    }
}
