use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::emotion::EmotionLabel;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TtsError {
    #[error("speech output unavailable: {0}")]
    Unavailable(String),
}

// ── Speech Parameters ──────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Emotion the line is spoken with, if any.
    pub emotion: Option<EmotionLabel>,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            emotion: None,
        }
    }
}

// ── Output Trait ───────────────────────────────────────

/// Where assistant lines go to be heard. Injected into the companion so a
/// real backend, a console bubble or a test recorder can stand in.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Short identifier for logs (e.g., "console", "silent").
    fn id(&self) -> String;

    /// Whether the backend exists in this runtime at all.
    async fn is_available(&self) -> bool;

    /// Start speaking `text`, cutting off anything still playing.
    /// Fire-and-forget: returns once the line has been handed over.
    async fn speak(&self, text: &str, params: SpeechParams) -> Result<(), TtsError>;

    /// Stop whatever is playing.
    fn stop(&self);
}
