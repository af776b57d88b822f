// Inference Collaborator Service
// Remote classification endpoints consumed as opaque label+confidence producers

use crate::models::ClassificationEntry;
use async_trait::async_trait;
use image::RgbImage;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};
use std::io::Cursor;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_IMAGE_MODEL: &str = "prithivMLmods/Deep-Fake-Detector-v2-Model";
pub const DEFAULT_AUDIO_MODEL: &str = "Gustking/wav2vec2-large-xlsr-deepfake-audio-classification";
pub const DEFAULT_TEXT_MODEL: &str = "openai-community/roberta-large-openai-detector";

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("inference endpoint error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("malformed classification payload: {0}")]
    Payload(String),
    #[error("classifier returned no ranked output")]
    EmptyOutput,
    #[error("image encode failed: {0}")]
    ImageEncode(String),
    #[error("model handle initialization failed: {0}")]
    Init(String),
}

/// Image capability: classify a decoded RGB frame.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &RgbImage) -> Result<Vec<ClassificationEntry>, ClassifierError>;
}

/// Audio capability: classify an uncompressed mono waveform buffer.
#[async_trait]
pub trait AudioClassifier: Send + Sync {
    async fn classify(&self, wav_bytes: &[u8]) -> Result<Vec<ClassificationEntry>, ClassifierError>;
}

/// Text capability: classify a bounded text window.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationEntry>, ClassifierError>;
}

/// Remote model behind a Hugging-Face-style inference endpoint.
///
/// Image and audio payloads are POSTed as raw bytes; text goes as a JSON
/// `inputs` document. Responses are the ranked `[{label, score}, ...]` shape,
/// sometimes nested one level for batched endpoints.
pub struct RemoteModel {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteModel {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/{}", base_url.trim_end_matches('/'), model);

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    async fn post_bytes(
        &self,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<ClassificationEntry>, ClassifierError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            // Cold endpoints load the model on first request instead of failing.
            .header("x-wait-for-model", "true")
            .body(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let started = Instant::now();
        let response = request.send().await?;
        self.ranked_from_response(response, started).await
    }

    async fn post_text(&self, text: &str) -> Result<Vec<ClassificationEntry>, ClassifierError> {
        let payload = json!({
            "inputs": text,
            "options": { "wait_for_model": true },
        });

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let started = Instant::now();
        let response = request.send().await?;
        self.ranked_from_response(response, started).await
    }

    async fn ranked_from_response(
        &self,
        response: reqwest::Response,
        started: Instant,
    ) -> Result<Vec<ClassificationEntry>, ClassifierError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = response.json().await?;
        let ranked = parse_ranked(&value)?;
        debug!(
            "[INFERENCE] {} returned {} ranked entries in {}ms",
            self.endpoint,
            ranked.len(),
            started.elapsed().as_millis()
        );
        Ok(ranked)
    }
}

#[async_trait]
impl ImageClassifier for RemoteModel {
    async fn classify(&self, image: &RgbImage) -> Result<Vec<ClassificationEntry>, ClassifierError> {
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| ClassifierError::ImageEncode(e.to_string()))?;
        self.post_bytes("image/png", png.into_inner()).await
    }
}

#[async_trait]
impl AudioClassifier for RemoteModel {
    async fn classify(&self, wav_bytes: &[u8]) -> Result<Vec<ClassificationEntry>, ClassifierError> {
        self.post_bytes("audio/wav", wav_bytes.to_vec()).await
    }
}

#[async_trait]
impl TextClassifier for RemoteModel {
    async fn classify(&self, text: &str) -> Result<Vec<ClassificationEntry>, ClassifierError> {
        self.post_text(text).await
    }
}

/// Parse a ranked classification payload, preserving the endpoint's own
/// ordering. Entries missing a label or score are skipped rather than
/// failing the whole response.
fn parse_ranked(value: &Value) -> Result<Vec<ClassificationEntry>, ClassifierError> {
    let items: &[Value] = match value {
        // Batched endpoints nest the ranking one level: [[{...}, {...}]]
        Value::Array(outer) if outer.first().map_or(false, Value::is_array) => outer[0]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default(),
        Value::Array(outer) => outer.as_slice(),
        other => {
            return Err(ClassifierError::Payload(format!(
                "expected ranked array, got: {}",
                other
            )))
        }
    };

    let mut ranked = Vec::with_capacity(items.len());
    for item in items {
        let label = item.get("label").and_then(Value::as_str);
        let confidence = item
            .get("score")
            .or_else(|| item.get("confidence"))
            .and_then(Value::as_f64);
        match (label, confidence) {
            (Some(label), Some(confidence)) => ranked.push(ClassificationEntry {
                label: label.to_string(),
                confidence,
            }),
            _ => warn!("[INFERENCE] skipping malformed ranked entry: {}", item),
        }
    }

    if ranked.is_empty() {
        return Err(ClassifierError::EmptyOutput);
    }
    Ok(ranked)
}
