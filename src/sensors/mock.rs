//! Mock sensing: canned label sets and transcripts picked at random.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use super::interface::{CaptureDevice, Permission, SensorKind};
use crate::ai::emotion::{EmotionChannel, EmotionLabel};

pub const MOCK_PHRASES: &[&str] = &[
    "Hello, how are you today?",
    "I'm feeling a bit tired",
    "Can you help me with something?",
    "I had a great day today",
    "I'm not sure what to do",
];

pub fn pick_label<R: Rng + ?Sized>(channel: EmotionChannel, rng: &mut R) -> EmotionLabel {
    channel
        .mock_labels()
        .choose(rng)
        .copied()
        .unwrap_or(EmotionLabel::Neutral)
}

pub fn pick_phrase<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MOCK_PHRASES.choose(rng).copied().unwrap_or(MOCK_PHRASES[0])
}

/// Capture device with fixed answers per sensor.
#[derive(Debug, Clone)]
pub struct MockCaptureDevice {
    camera: Permission,
    microphone: Permission,
}

impl MockCaptureDevice {
    pub fn granting() -> Self {
        Self {
            camera: Permission::Granted,
            microphone: Permission::Granted,
        }
    }

    pub fn with(camera: Permission, microphone: Permission) -> Self {
        Self { camera, microphone }
    }
}

impl Default for MockCaptureDevice {
    fn default() -> Self {
        Self::granting()
    }
}

#[async_trait]
impl CaptureDevice for MockCaptureDevice {
    async fn request_access(&self, kind: SensorKind) -> Permission {
        match kind {
            SensorKind::Camera => self.camera,
            SensorKind::Microphone => self.microphone,
        }
    }
}
