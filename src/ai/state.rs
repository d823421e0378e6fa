//! The companion's single state store.
//!
//! All mutable state (context, engagement, emotion readings, conversation)
//! lives here and only changes through the handlers below. Nothing in this
//! file sleeps or spawns; timing lives in the orchestrator.
//!
//! Every conversation reset bumps `epoch`. A [`PendingReply`] remembers the
//! epoch it was generated in and is dropped on delivery if a reset happened
//! in between.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;

use super::context::{ContextController, ContextTransition, InteractionContext};
use super::conversation::{ConversationSession, Message, Utterance};
use super::emotion::{EmotionChannel, EmotionLabel, EmotionState};
use super::engagement::{EngagementEvent, EngagementLevel};
use super::responder::{self, ResponseRule};
use super::typing_sim::{calculate_thinking_delay, TypingParams};
use crate::sensors::{SensorKind, SensorStatus};

/// An assistant reply waiting out its thinking delay.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReply {
    pub epoch: u64,
    pub text: String,
    pub rule: ResponseRule,
    /// Emotion the reply answers; stored on the assistant message.
    pub emotion: EmotionLabel,
}

/// Result of a single emotion reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionUpdate {
    pub woke_avatar: bool,
    pub engagement: EngagementLevel,
    pub engagement_changed: bool,
    pub combined: EmotionLabel,
}

/// Read-only view for the UI surface.
#[derive(Debug, Clone, Serialize)]
pub struct CompanionSnapshot {
    pub context: InteractionContext,
    pub engagement: f32,
    pub engagement_label: &'static str,
    pub engagement_suggestion: Option<&'static str>,
    pub emotion: EmotionLabel,
    pub face_emotion: EmotionLabel,
    pub voice_emotion: EmotionLabel,
    pub avatar_expression: &'static str,
    pub avatar_active: bool,
    pub speaking: bool,
    pub typing: bool,
    pub sensors: BTreeMap<SensorKind, SensorStatus>,
    pub messages: Vec<Message>,
}

pub struct CompanionState {
    controller: ContextController,
    engagement: EngagementLevel,
    emotions: EmotionState,
    session: ConversationSession,
    sensors: BTreeMap<SensorKind, SensorStatus>,
    epoch: u64,
    pending: usize,
    speaking: bool,
    rng: StdRng,
}

impl CompanionState {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            controller: ContextController::new(),
            engagement: EngagementLevel::default(),
            emotions: EmotionState::new(),
            session: ConversationSession::default(),
            sensors: SensorKind::ALL
                .iter()
                .map(|kind| (*kind, SensorStatus::Idle))
                .collect(),
            epoch: 0,
            pending: 0,
            speaking: false,
            rng,
        }
    }

    // ── Context ────────────────────────────────────────────

    /// Startup entry into learning. `None` if already started.
    pub fn start(&mut self) -> Option<ContextTransition> {
        let transition = self.controller.start()?;
        self.emotions.activate_avatar();
        self.apply_transition(&transition);
        Some(transition)
    }

    pub fn switch_context(&mut self, to: InteractionContext) -> ContextTransition {
        let transition = self.controller.switch_to(to);
        self.apply_transition(&transition);
        transition
    }

    fn apply_transition(&mut self, transition: &ContextTransition) {
        self.engagement = self.engagement.apply(EngagementEvent::ContextChange);
        self.session.clear_and_reseed(transition.to);
        self.reset_epoch();
    }

    /// Explicit "clear chat": reseed with the current greeting. Engagement
    /// is left alone.
    pub fn clear_chat(&mut self) -> &Message {
        self.reset_epoch();
        let context = self.controller.current();
        self.session.clear_and_reseed(context)
    }

    fn reset_epoch(&mut self) {
        self.epoch += 1;
        self.pending = 0;
    }

    pub fn context(&self) -> InteractionContext {
        self.controller.current()
    }

    pub fn started(&self) -> bool {
        self.controller.started()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // ── Sensing ────────────────────────────────────────────

    pub fn record_emotion(&mut self, channel: EmotionChannel, label: EmotionLabel) -> EmotionUpdate {
        let woke_avatar = self.emotions.record(channel, label);
        let before = self.engagement;
        if channel == EmotionChannel::Face {
            self.engagement = self.engagement.apply(EngagementEvent::FaceEmotion(label));
        }
        EmotionUpdate {
            woke_avatar,
            engagement: self.engagement,
            engagement_changed: before != self.engagement,
            combined: self.emotions.combined(),
        }
    }

    pub fn attention_lost(&mut self) -> EngagementLevel {
        let context = self.controller.current();
        self.engagement = self.engagement.apply(EngagementEvent::AttentionLost(context));
        self.engagement
    }

    pub fn set_sensor_status(&mut self, kind: SensorKind, status: SensorStatus) -> bool {
        self.sensors.insert(kind, status) != Some(status)
    }

    pub fn sensor_status(&self, kind: SensorKind) -> SensorStatus {
        self.sensors.get(&kind).copied().unwrap_or(SensorStatus::Idle)
    }

    pub fn engagement(&self) -> EngagementLevel {
        self.engagement
    }

    pub fn current_emotion(&self) -> EmotionLabel {
        self.emotions.combined()
    }

    // ── Conversation ───────────────────────────────────────

    /// Typed input: log the user message and prepare the reply.
    pub fn submit_typed(&mut self, utterance: Utterance) -> PendingReply {
        let emotion = self.emotions.combined();
        let rule = responder::select_rule(
            utterance.as_str(),
            Some(emotion),
            self.controller.current(),
            self.engagement,
        );
        let text = rule.render(utterance.as_str());
        self.session.append(Message::user(utterance.into_inner()));
        self.queue(PendingReply {
            epoch: self.epoch,
            text,
            rule,
            emotion,
        })
    }

    /// Transcribed speech: counts as a speech event, then goes through the
    /// voice-path responder.
    pub fn submit_spoken(&mut self, utterance: Utterance) -> PendingReply {
        self.engagement = self.engagement.apply(EngagementEvent::Speech);
        let emotion = self.emotions.combined();
        let context = self.controller.current();
        let rule = responder::select_rule(utterance.as_str(), Some(emotion), context, self.engagement);
        let text = responder::render_spoken(rule, utterance.as_str(), &mut self.rng);
        self.session.append(Message::user(utterance.into_inner()));
        self.queue(PendingReply {
            epoch: self.epoch,
            text,
            rule,
            emotion,
        })
    }

    fn queue(&mut self, reply: PendingReply) -> PendingReply {
        self.pending += 1;
        reply
    }

    /// Append a reply unless a reset happened since it was generated.
    pub fn deliver(&mut self, reply: PendingReply) -> Option<Message> {
        if reply.epoch != self.epoch {
            return None;
        }
        self.pending = self.pending.saturating_sub(1);
        let message = Message::assistant(reply.text, Some(reply.emotion));
        Some(self.session.append(message).clone())
    }

    /// Thinking pause for the next reply, drawn from the session RNG.
    pub fn draw_thinking_delay(&mut self, min_ms: u64, max_ms: u64) -> TypingParams {
        calculate_thinking_delay(min_ms, max_ms, &mut self.rng)
    }

    pub fn typing(&self) -> bool {
        self.pending > 0
    }

    pub fn set_speaking(&mut self, speaking: bool) -> bool {
        let changed = self.speaking != speaking;
        self.speaking = speaking;
        changed
    }

    pub fn speaking(&self) -> bool {
        self.speaking
    }

    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    pub fn snapshot(&self) -> CompanionSnapshot {
        let context = self.controller.current();
        let band = self.engagement.band();
        let emotion = self.emotions.combined();
        CompanionSnapshot {
            context,
            engagement: self.engagement.value(),
            engagement_label: band.label(context),
            engagement_suggestion: band.suggestion(context),
            emotion,
            face_emotion: self.emotions.face(),
            voice_emotion: self.emotions.voice(),
            avatar_expression: emotion.expression(),
            avatar_active: self.emotions.avatar_active(),
            speaking: self.speaking,
            typing: self.typing(),
            sensors: self.sensors.clone(),
            messages: self.session.messages().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::conversation::Sender;

    fn started() -> CompanionState {
        let mut state = CompanionState::new(Some(1));
        state.start();
        state
    }

    fn say(text: &str) -> Utterance {
        Utterance::new(text).unwrap()
    }

    #[test]
    fn startup_seeds_learning_and_wakes_avatar() {
        let state = started();
        assert_eq!(state.context(), InteractionContext::Learning);
        assert!(state.snapshot().avatar_active);
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].text(), InteractionContext::Learning.greeting());
    }

    #[test]
    fn voice_emotion_does_not_move_engagement() {
        let mut state = started();
        let update = state.record_emotion(EmotionChannel::Voice, EmotionLabel::Excited);
        assert!(!update.engagement_changed);
        assert_eq!(update.combined, EmotionLabel::Excited);
        let update = state.record_emotion(EmotionChannel::Face, EmotionLabel::Happy);
        assert!(update.engagement_changed);
        assert_eq!(update.engagement.value(), 6.0);
    }

    #[test]
    fn reply_carries_the_emotion_it_answered() {
        let mut state = started();
        state.switch_context(InteractionContext::Interview);
        state.record_emotion(EmotionChannel::Face, EmotionLabel::Sad);
        let reply = state.submit_typed(say("today was rough"));
        assert_eq!(reply.rule, ResponseRule::EmotionSad);
        assert!(state.typing());

        let msg = state.deliver(reply).unwrap();
        assert_eq!(msg.sender(), Sender::Assistant);
        assert_eq!(msg.emotion(), Some(EmotionLabel::Sad));
        assert!(!state.typing());
    }

    #[test]
    fn stale_reply_is_dropped_after_context_switch() {
        let mut state = started();
        let reply = state.submit_typed(say("Can you explain this?"));
        state.switch_context(InteractionContext::Assessment);
        assert!(state.deliver(reply).is_none());
        assert_eq!(state.messages().len(), 1);
        assert_eq!(
            state.messages()[0].text(),
            InteractionContext::Assessment.greeting()
        );
    }

    #[test]
    fn stale_reply_is_dropped_after_clear() {
        let mut state = started();
        state.record_emotion(EmotionChannel::Face, EmotionLabel::Happy);
        let reply = state.submit_typed(say("hello"));
        state.clear_chat();
        assert!(state.deliver(reply).is_none());
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.engagement().value(), 6.0, "clear keeps engagement");
    }

    #[test]
    fn spoken_input_raises_engagement_before_replying() {
        let mut state = started();
        for _ in 0..3 {
            state.record_emotion(EmotionChannel::Face, EmotionLabel::Sad);
        }
        assert_eq!(state.engagement().value(), 2.0);
        let reply = state.submit_spoken(say("Hello, how are you today?"));
        assert_eq!(state.engagement().value(), 2.5);
        assert_eq!(reply.rule, ResponseRule::LearningDisengaged);
    }

    #[test]
    fn attention_loss_counts_only_in_learning() {
        let mut state = started();
        assert_eq!(state.attention_lost().value(), 4.0);
        state.switch_context(InteractionContext::Interview);
        assert_eq!(state.attention_lost().value(), 5.0);
    }

    #[test]
    fn sensor_status_changes_are_reported_once() {
        let mut state = started();
        assert!(state.set_sensor_status(SensorKind::Camera, SensorStatus::Active));
        assert!(!state.set_sensor_status(SensorKind::Camera, SensorStatus::Active));
        assert_eq!(state.sensor_status(SensorKind::Camera), SensorStatus::Active);
        assert_eq!(state.sensor_status(SensorKind::Microphone), SensorStatus::Idle);
    }
}
