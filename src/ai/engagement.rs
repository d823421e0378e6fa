//! Engagement level: a bounded attentiveness score in [1, 10].
//!
//! The level only moves through [`EngagementLevel::apply`], which clamps after
//! every event, so no sequence of events can push it out of range.

use serde::Serialize;

use super::context::InteractionContext;
use super::emotion::EmotionLabel;

pub const MIN_ENGAGEMENT: f32 = 1.0;
pub const MAX_ENGAGEMENT: f32 = 10.0;
pub const DEFAULT_ENGAGEMENT: f32 = 5.0;
/// Levels strictly below this count as low engagement.
pub const LOW_ENGAGEMENT_THRESHOLD: f32 = 4.0;
/// Levels strictly above this count as high engagement.
const HIGH_ENGAGEMENT_THRESHOLD: f32 = 6.0;

const SPEECH_BONUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EngagementLevel(f32);

impl Default for EngagementLevel {
    fn default() -> Self {
        Self(DEFAULT_ENGAGEMENT)
    }
}

/// Everything that can move the engagement level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngagementEvent {
    FaceEmotion(EmotionLabel),
    Speech,
    /// Only counts while learning.
    AttentionLost(InteractionContext),
    ContextChange,
}

impl EngagementLevel {
    /// Build a level, clamping out-of-range or non-finite input.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(MIN_ENGAGEMENT, MAX_ENGAGEMENT))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn apply(self, event: EngagementEvent) -> Self {
        match event {
            EngagementEvent::FaceEmotion(label) => Self::new(self.0 + face_delta(label)),
            EngagementEvent::Speech => Self::new(self.0 + SPEECH_BONUS),
            EngagementEvent::AttentionLost(InteractionContext::Learning) => Self::new(self.0 - 1.0),
            EngagementEvent::AttentionLost(_) => self,
            EngagementEvent::ContextChange => Self::default(),
        }
    }

    pub fn is_low(&self) -> bool {
        self.0 < LOW_ENGAGEMENT_THRESHOLD
    }

    pub fn band(&self) -> EngagementBand {
        if self.0 < LOW_ENGAGEMENT_THRESHOLD {
            EngagementBand::Low
        } else if self.0 <= HIGH_ENGAGEMENT_THRESHOLD {
            EngagementBand::Medium
        } else {
            EngagementBand::High
        }
    }
}

fn face_delta(label: EmotionLabel) -> f32 {
    match label {
        EmotionLabel::Happy | EmotionLabel::Excited => 1.0,
        EmotionLabel::Sad | EmotionLabel::Angry => -1.0,
        _ => 0.0,
    }
}

// ── Display Bands ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementBand {
    Low,
    Medium,
    High,
}

impl EngagementBand {
    pub fn label(&self, context: InteractionContext) -> &'static str {
        match (context, self) {
            (InteractionContext::Learning, EngagementBand::Low) => "Disengaged",
            (InteractionContext::Learning, EngagementBand::Medium) => "Attentive",
            (InteractionContext::Learning, EngagementBand::High) => "Highly Engaged",
            (InteractionContext::Assessment, EngagementBand::Low) => "Struggling",
            (InteractionContext::Assessment, EngagementBand::Medium) => "Focused",
            (InteractionContext::Assessment, EngagementBand::High) => "Confident",
            (InteractionContext::Interview, _) => "Engagement Level",
        }
    }

    pub fn suggestion(&self, context: InteractionContext) -> Option<&'static str> {
        match (context, self) {
            (InteractionContext::Learning, EngagementBand::Low) => {
                Some("Try asking a question to increase engagement")
            }
            (InteractionContext::Assessment, EngagementBand::Low) => {
                Some("Take a moment to review the question carefully")
            }
            _ => None,
        }
    }
}
