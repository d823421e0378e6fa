//! Emotion-driven speech parameter modulation.
//!
//! Maps the emotion a reply answers to small rate and pitch adjustments so
//! the voice matches the moment: softer and slower for sadness, brighter for
//! excitement.

use super::interface::SpeechParams;
use crate::ai::emotion::EmotionLabel;

/// Rate multiplier and pitch offset for an emotion.
pub fn modifiers(emotion: EmotionLabel) -> (f32, f32) {
    match emotion {
        EmotionLabel::Happy => (1.10, 0.05),
        EmotionLabel::Excited => (1.20, 0.08),
        EmotionLabel::Sad => (0.85, -0.10),
        // Calm, measured delivery when the user is upset.
        EmotionLabel::Angry => (0.90, -0.05),
        EmotionLabel::Anxious => (0.90, 0.0),
        EmotionLabel::Surprised => (1.05, 0.10),
        EmotionLabel::Calm => (0.95, 0.0),
        EmotionLabel::Neutral => (1.0, 0.0),
    }
}

/// Speech parameters for a line spoken in reply to `emotion`.
pub fn params_for(emotion: Option<EmotionLabel>) -> SpeechParams {
    let base = SpeechParams::default();
    let Some(label) = emotion else {
        return base;
    };
    let (rate_factor, pitch_offset) = modifiers(label);
    SpeechParams {
        rate: (base.rate * rate_factor).clamp(0.5, 2.0),
        pitch: (base.pitch + pitch_offset).clamp(0.5, 2.0),
        emotion: Some(label),
        ..base
    }
}
