// Synthscan Core Services

pub mod audio_codec;
pub mod config_store;
pub mod detection;
pub mod inference;
pub mod model_cache;
pub mod temp_artifact;

pub use audio_codec::*;
pub use config_store::*;
pub use inference::*;
pub use model_cache::*;
pub use temp_artifact::*;

// Re-export detection module types
pub use detection::{
    normalize,
    DetectionEngine,
    Polarity,
    PolarityTable,
    AUDIO_POLARITY,
    IMAGE_POLARITY,
    TEXT_POLARITY,
};
