use super::interface::{SpeechOutput, SpeechParams, TtsError};
use async_trait::async_trait;

/// Used when the runtime has no speech engine. Every call reports
/// `Unavailable`, and the companion carries on text-only.
pub struct UnavailableSpeech {
    reason: String,
}

impl UnavailableSpeech {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SpeechOutput for UnavailableSpeech {
    fn id(&self) -> String {
        "unavailable".to_string()
    }

    async fn is_available(&self) -> bool {
        false
    }

    async fn speak(&self, _text: &str, _params: SpeechParams) -> Result<(), TtsError> {
        Err(TtsError::Unavailable(self.reason.clone()))
    }

    fn stop(&self) {}
}
