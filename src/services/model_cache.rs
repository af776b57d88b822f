// Model Handle Cache
// Process-wide memoized inference handles, initialized at most once each

use crate::services::config_store::AppConfig;
use crate::services::inference::{
    AudioClassifier, ClassifierError, ImageClassifier, RemoteModel, TextClassifier,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::info;

type Loader<T> = Box<dyn Fn() -> Result<Arc<T>, ClassifierError> + Send + Sync>;

/// One lazily-initialized capability slot.
///
/// The lock is held across initialization: that is the single-flight
/// guarantee. Concurrent first callers block on the lock and observe the
/// handle stored by whichever caller won. A failed initialization leaves the
/// slot empty, so a later call retries instead of caching the failure.
struct LazySlot<T: ?Sized> {
    name: &'static str,
    loader: Loader<T>,
    handle: Mutex<Option<Arc<T>>>,
}

impl<T: ?Sized> LazySlot<T> {
    fn new(name: &'static str, loader: Loader<T>) -> Self {
        Self {
            name,
            loader,
            handle: Mutex::new(None),
        }
    }

    fn get(&self) -> Result<Arc<T>, ClassifierError> {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.as_ref() {
            return Ok(Arc::clone(handle));
        }

        info!("[MODEL_CACHE] initializing {} handle", self.name);
        let handle = (self.loader)()?;
        *slot = Some(Arc::clone(&handle));
        Ok(handle)
    }
}

/// Memoized handles to the three inference capabilities. Entries are created
/// on first use and live for the process lifetime; no eviction.
pub struct ModelHandleCache {
    image: LazySlot<dyn ImageClassifier>,
    audio: LazySlot<dyn AudioClassifier>,
    text: LazySlot<dyn TextClassifier>,
}

impl ModelHandleCache {
    pub fn new(
        image: impl Fn() -> Result<Arc<dyn ImageClassifier>, ClassifierError> + Send + Sync + 'static,
        audio: impl Fn() -> Result<Arc<dyn AudioClassifier>, ClassifierError> + Send + Sync + 'static,
        text: impl Fn() -> Result<Arc<dyn TextClassifier>, ClassifierError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            image: LazySlot::new("image", Box::new(image)),
            audio: LazySlot::new("audio", Box::new(audio)),
            text: LazySlot::new("text", Box::new(text)),
        }
    }

    /// Cache backed by remote models resolved from `config`.
    pub fn remote(config: &AppConfig) -> Self {
        let inference = config.inference.clone();
        let timeout = Duration::from_secs(inference.timeout_secs);

        let image = {
            let inference = inference.clone();
            move || {
                RemoteModel::new(
                    &inference.base_url,
                    &inference.image_model,
                    inference.api_key.clone(),
                    timeout,
                )
                .map(|m| Arc::new(m) as Arc<dyn ImageClassifier>)
            }
        };
        let audio = {
            let inference = inference.clone();
            move || {
                RemoteModel::new(
                    &inference.base_url,
                    &inference.audio_model,
                    inference.api_key.clone(),
                    timeout,
                )
                .map(|m| Arc::new(m) as Arc<dyn AudioClassifier>)
            }
        };
        let text = move || {
            RemoteModel::new(
                &inference.base_url,
                &inference.text_model,
                inference.api_key.clone(),
                timeout,
            )
            .map(|m| Arc::new(m) as Arc<dyn TextClassifier>)
        };

        Self::new(image, audio, text)
    }

    pub fn image(&self) -> Result<Arc<dyn ImageClassifier>, ClassifierError> {
        self.image.get()
    }

    pub fn audio(&self) -> Result<Arc<dyn AudioClassifier>, ClassifierError> {
        self.audio.get()
    }

    pub fn text(&self) -> Result<Arc<dyn TextClassifier>, ClassifierError> {
        self.text.get()
    }
}
