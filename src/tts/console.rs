use super::interface::{SpeechOutput, SpeechParams, TtsError};
use async_trait::async_trait;
use tracing::debug;

/// Console speech bubble: prints each line instead of producing audio.
///
/// Stands in for the platform speech engine in the terminal front-end.
pub struct ConsoleSpeech;

impl ConsoleSpeech {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    fn id(&self) -> String {
        "console".to_string()
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn speak(&self, text: &str, params: SpeechParams) -> Result<(), TtsError> {
        debug!(rate = params.rate, pitch = params.pitch, "speaking line");
        println!("  (speaking) \"{}\"", text);
        Ok(())
    }

    fn stop(&self) {
        debug!("speech stopped");
    }
}
