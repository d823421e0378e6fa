use super::interface::{SpeechOutput, SpeechParams, TtsError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Keeps every spoken line in memory. Lets callers assert on what the
/// companion said without an audio backend.
#[derive(Default)]
pub struct RecordingSpeech {
    lines: Mutex<Vec<(String, SpeechParams)>>,
    stops: AtomicUsize,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .await
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub async fn last_params(&self) -> Option<SpeechParams> {
        self.lines.lock().await.last().map(|(_, p)| p.clone())
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechOutput for RecordingSpeech {
    fn id(&self) -> String {
        "recorder".to_string()
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn speak(&self, text: &str, params: SpeechParams) -> Result<(), TtsError> {
        self.lines.lock().await.push((text.to_string(), params));
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::Relaxed);
    }
}
