use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ai::emotion::EmotionChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Camera,
    Microphone,
}

impl SensorKind {
    pub const ALL: [SensorKind; 2] = [SensorKind::Camera, SensorKind::Microphone];

    /// Emotion channel this device feeds.
    pub fn channel(&self) -> EmotionChannel {
        match self {
            SensorKind::Camera => EmotionChannel::Face,
            SensorKind::Microphone => EmotionChannel::Voice,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Camera => f.write_str("camera"),
            SensorKind::Microphone => f.write_str("microphone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
}

/// What the UI shows for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Idle,
    Active,
    /// Sticks until the user explicitly starts the device again.
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("{0} access denied")]
    PermissionDenied(SensorKind),
}

/// Permission-gated capture hardware. Frames and waveforms never reach the
/// core; only the grant decision does.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn request_access(&self, kind: SensorKind) -> Permission;
}
