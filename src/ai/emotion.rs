//! Emotion labels and per-channel detection state.
//!
//! Face and voice channels report labels independently. The companion
//! consumes a single combined label: the face reading wins unless it is
//! neutral, and everything reads as neutral until the avatar wakes up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ── Labels ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Anxious,
    Excited,
    Calm,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Neutral,
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Surprised,
        EmotionLabel::Anxious,
        EmotionLabel::Excited,
        EmotionLabel::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Surprised => "surprised",
            EmotionLabel::Anxious => "anxious",
            EmotionLabel::Excited => "excited",
            EmotionLabel::Calm => "calm",
        }
    }

    /// Glyph shown on the avatar for this label.
    pub fn expression(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "😊",
            EmotionLabel::Sad => "😔",
            EmotionLabel::Angry => "😠",
            EmotionLabel::Surprised => "😲",
            EmotionLabel::Anxious => "😰",
            EmotionLabel::Excited => "😃",
            EmotionLabel::Calm => "😌",
            EmotionLabel::Neutral => "🙂",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion label: {0}")]
pub struct ParseEmotionError(pub String);

impl FromStr for EmotionLabel {
    type Err = ParseEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        EmotionLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == lower)
            .ok_or_else(|| ParseEmotionError(s.to_string()))
    }
}

// ── Channels ───────────────────────────────────────────────

/// Sensor channel an emotion reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionChannel {
    Face,
    Voice,
}

impl EmotionChannel {
    /// Labels the mock detector for this channel draws from.
    pub fn mock_labels(&self) -> &'static [EmotionLabel] {
        match self {
            EmotionChannel::Face => &[
                EmotionLabel::Happy,
                EmotionLabel::Sad,
                EmotionLabel::Neutral,
                EmotionLabel::Surprised,
                EmotionLabel::Angry,
            ],
            EmotionChannel::Voice => &[
                EmotionLabel::Calm,
                EmotionLabel::Excited,
                EmotionLabel::Anxious,
                EmotionLabel::Neutral,
            ],
        }
    }
}

impl fmt::Display for EmotionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionChannel::Face => f.write_str("face"),
            EmotionChannel::Voice => f.write_str("voice"),
        }
    }
}

// ── Emotion State ──────────────────────────────────────────

/// Latest reading per channel plus whether the avatar is awake.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmotionState {
    face: EmotionLabel,
    voice: EmotionLabel,
    avatar_active: bool,
}

impl EmotionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading. Returns `true` when this reading woke the avatar.
    pub fn record(&mut self, channel: EmotionChannel, label: EmotionLabel) -> bool {
        match channel {
            EmotionChannel::Face => self.face = label,
            EmotionChannel::Voice => self.voice = label,
        }
        let woke = !self.avatar_active;
        self.avatar_active = true;
        woke
    }

    pub fn activate_avatar(&mut self) {
        self.avatar_active = true;
    }

    pub fn avatar_active(&self) -> bool {
        self.avatar_active
    }

    pub fn face(&self) -> EmotionLabel {
        self.face
    }

    pub fn voice(&self) -> EmotionLabel {
        self.voice
    }

    /// The label the companion reacts to.
    pub fn combined(&self) -> EmotionLabel {
        if !self.avatar_active {
            return EmotionLabel::Neutral;
        }
        if self.face != EmotionLabel::Neutral {
            self.face
        } else {
            self.voice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_reading_is_neutral() {
        assert_eq!(EmotionLabel::default(), EmotionLabel::Neutral);
        assert_eq!(EmotionState::new().combined(), EmotionLabel::Neutral);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Happy".parse::<EmotionLabel>().unwrap(), EmotionLabel::Happy);
        assert_eq!(" calm ".parse::<EmotionLabel>().unwrap(), EmotionLabel::Calm);
        assert!("confused".parse::<EmotionLabel>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&EmotionLabel::Surprised).unwrap();
        assert_eq!(json, "\"surprised\"");
    }

    #[test]
    fn inactive_avatar_reads_neutral() {
        let state = EmotionState::new();
        assert_eq!(state.combined(), EmotionLabel::Neutral);
    }

    #[test]
    fn face_wins_unless_neutral() {
        let mut state = EmotionState::new();
        assert!(state.record(EmotionChannel::Voice, EmotionLabel::Calm));
        assert_eq!(state.combined(), EmotionLabel::Calm);

        assert!(!state.record(EmotionChannel::Face, EmotionLabel::Angry));
        assert_eq!(state.combined(), EmotionLabel::Angry);

        state.record(EmotionChannel::Face, EmotionLabel::Neutral);
        assert_eq!(state.combined(), EmotionLabel::Calm);
    }

    #[test]
    fn mock_label_sets_are_channel_specific() {
        assert!(EmotionChannel::Face
            .mock_labels()
            .contains(&EmotionLabel::Angry));
        assert!(!EmotionChannel::Voice
            .mock_labels()
            .contains(&EmotionLabel::Angry));
    }
}
