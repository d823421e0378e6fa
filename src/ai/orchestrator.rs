//! Companion orchestrator: the async shell around [`CompanionState`].
//!
//! Owns the timers (thinking delays, speaking indicator), the injected speech
//! output and the UI event channel. State and timers sit behind separate
//! locks that are never held together. The timer registry is a plain
//! `std::sync::Mutex` that is never held across an await, so a reply is
//! registered in the same poll that appended its user message.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::context::{ContextTransition, InteractionContext};
use super::conversation::{Message, Utterance};
use super::emotion::{EmotionChannel, EmotionLabel};
use super::engagement::EngagementLevel;
use super::state::{CompanionSnapshot, CompanionState, EmotionUpdate, PendingReply};
use super::typing_sim::TypingParams;
use crate::config::CompanionConfig;
use crate::sensors::{SensorKind, SensorStatus};
use crate::tts::{emotion_tts, SpeechOutput};
use crate::utils::timer::DelayedTask;

const EVENT_CAPACITY: usize = 256;

/// Events pushed to the UI surface.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CompanionEvent {
    ContextChanged {
        context: InteractionContext,
        greeting: Message,
    },
    ChatCleared {
        greeting: Message,
    },
    MessageAppended(Message),
    Typing(TypingParams),
    TypingStopped,
    EngagementChanged {
        level: f32,
        label: &'static str,
    },
    EmotionDetected {
        channel: EmotionChannel,
        label: EmotionLabel,
        combined: EmotionLabel,
    },
    AvatarActivated,
    Speaking(bool),
    SensorStatus {
        sensor: SensorKind,
        status: SensorStatus,
    },
    SpeechUnavailable {
        reason: String,
    },
}

#[derive(Default)]
struct CompanionTasks {
    replies: Vec<DelayedTask>,
    speaking: Option<DelayedTask>,
}

#[derive(Clone)]
pub struct Companion {
    state: Arc<Mutex<CompanionState>>,
    tasks: Arc<std::sync::Mutex<CompanionTasks>>,
    speech: Arc<dyn SpeechOutput>,
    speech_warned: Arc<AtomicBool>,
    events: broadcast::Sender<CompanionEvent>,
    config: Arc<CompanionConfig>,
}

impl Companion {
    pub fn new(config: CompanionConfig, speech: Arc<dyn SpeechOutput>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(CompanionState::new(config.seed))),
            tasks: Arc::new(std::sync::Mutex::new(CompanionTasks::default())),
            speech,
            speech_warned: Arc::new(AtomicBool::new(false)),
            events,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CompanionEvent> {
        self.events.subscribe()
    }

    fn tasks(&self) -> MutexGuard<'_, CompanionTasks> {
        self.tasks.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn publish(&self, event: CompanionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // ── Context ────────────────────────────────────────────

    /// Startup entry into learning. Only the first call does anything.
    pub async fn start(&self) -> Option<ContextTransition> {
        let (transition, greeting, engagement) = {
            let mut state = self.state.lock().await;
            let transition = state.start()?;
            let greeting = state.messages().first().cloned();
            (transition, greeting, state.engagement())
        };
        info!(context = %transition.to, "companion started");
        self.announce_transition(&transition, greeting, engagement).await;
        self.publish(CompanionEvent::AvatarActivated);
        Some(transition)
    }

    pub async fn switch_context(&self, to: InteractionContext) -> ContextTransition {
        let (transition, greeting, engagement, was_typing) = {
            let mut state = self.state.lock().await;
            let was_typing = state.typing();
            let transition = state.switch_context(to);
            let greeting = state.messages().first().cloned();
            (transition, greeting, state.engagement(), was_typing)
        };
        self.cancel_pending_replies(was_typing);
        info!(from = ?transition.from, to = %transition.to, "context switched");
        self.announce_transition(&transition, greeting, engagement).await;
        transition
    }

    async fn announce_transition(
        &self,
        transition: &ContextTransition,
        greeting: Option<Message>,
        engagement: EngagementLevel,
    ) {
        if let Some(greeting) = greeting {
            self.publish(CompanionEvent::ContextChanged {
                context: transition.to,
                greeting,
            });
        }
        self.publish_engagement(engagement, transition.to);
        self.speak(transition.welcome, None).await;
    }

    /// Clear the chat and reseed it with the current greeting.
    pub async fn clear_chat(&self) -> Message {
        let (greeting, was_typing) = {
            let mut state = self.state.lock().await;
            let was_typing = state.typing();
            (state.clear_chat().clone(), was_typing)
        };
        self.cancel_pending_replies(was_typing);
        debug!("chat cleared");
        self.publish(CompanionEvent::ChatCleared {
            greeting: greeting.clone(),
        });
        greeting
    }

    /// Abort reply timers after a reset. `was_typing` is whether the reset
    /// dropped replies the UI was told about.
    fn cancel_pending_replies(&self, was_typing: bool) {
        let cancelled = {
            let mut tasks = self.tasks();
            let cancelled = tasks.replies.iter().filter(|t| !t.is_finished()).count();
            tasks.replies.clear();
            cancelled
        };
        if cancelled > 0 {
            debug!(cancelled, "cancelled pending replies");
        }
        if was_typing {
            self.publish(CompanionEvent::TypingStopped);
        }
    }

    // ── Sensing ────────────────────────────────────────────

    pub async fn record_emotion(&self, channel: EmotionChannel, label: EmotionLabel) -> EmotionUpdate {
        let (update, context) = {
            let mut state = self.state.lock().await;
            (state.record_emotion(channel, label), state.context())
        };
        debug!(%channel, %label, combined = %update.combined, "emotion detected");
        if update.woke_avatar {
            self.publish(CompanionEvent::AvatarActivated);
        }
        self.publish(CompanionEvent::EmotionDetected {
            channel,
            label,
            combined: update.combined,
        });
        if update.engagement_changed {
            self.publish_engagement(update.engagement, context);
        }
        update
    }

    /// The user looked away. Only lowers engagement while learning.
    pub async fn attention_lost(&self) -> EngagementLevel {
        let (before, after, context) = {
            let mut state = self.state.lock().await;
            let before = state.engagement();
            (before, state.attention_lost(), state.context())
        };
        if before != after {
            self.publish_engagement(after, context);
        }
        after
    }

    pub async fn set_sensor_status(&self, sensor: SensorKind, status: SensorStatus) {
        let changed = self.state.lock().await.set_sensor_status(sensor, status);
        if changed {
            self.publish(CompanionEvent::SensorStatus { sensor, status });
        }
    }

    pub async fn sensor_status(&self, sensor: SensorKind) -> SensorStatus {
        self.state.lock().await.sensor_status(sensor)
    }

    fn publish_engagement(&self, level: EngagementLevel, context: InteractionContext) {
        self.publish(CompanionEvent::EngagementChanged {
            level: level.value(),
            label: level.band().label(context),
        });
    }

    // ── Conversation ───────────────────────────────────────

    /// Typed input. Blank text is ignored and `None` comes back.
    pub async fn send_message(&self, text: &str) -> Option<Message> {
        let Some(utterance) = Utterance::new(text) else {
            debug!("ignoring blank message");
            return None;
        };
        let (user, reply, typing) = {
            let mut state = self.state.lock().await;
            let reply = state.submit_typed(utterance);
            let user = state.messages().last().cloned();
            let typing = self.draw_delay(&mut state);
            (user, reply, typing)
        };
        self.after_submit(user, reply, typing)
    }

    /// A final transcript from speech recognition.
    pub async fn hear_speech(&self, transcript: &str) -> Option<Message> {
        let Some(utterance) = Utterance::new(transcript) else {
            debug!("ignoring blank transcript");
            return None;
        };
        let (user, reply, typing, engagement, context) = {
            let mut state = self.state.lock().await;
            let reply = state.submit_spoken(utterance);
            let user = state.messages().last().cloned();
            let typing = self.draw_delay(&mut state);
            (user, reply, typing, state.engagement(), state.context())
        };
        self.publish_engagement(engagement, context);
        self.after_submit(user, reply, typing)
    }

    fn draw_delay(&self, state: &mut CompanionState) -> TypingParams {
        state.draw_thinking_delay(
            self.config.thinking_delay_min_ms,
            self.config.thinking_delay_max_ms,
        )
    }

    /// Announce and register a reply. Never awaits, so the user message and
    /// its reply timer are committed in the same poll.
    fn after_submit(
        &self,
        user: Option<Message>,
        reply: PendingReply,
        typing: TypingParams,
    ) -> Option<Message> {
        if let Some(ref message) = user {
            self.publish(CompanionEvent::MessageAppended(message.clone()));
        }
        debug!(rule = ?reply.rule, delay_ms = typing.duration_ms, "reply scheduled");
        let delay = Duration::from_millis(typing.duration_ms);
        self.publish(CompanionEvent::Typing(typing));

        let this = self.clone();
        let task = DelayedTask::spawn(delay, async move {
            this.finish_reply(reply).await;
        });
        let mut tasks = self.tasks();
        tasks.replies.retain(|t| !t.is_finished());
        tasks.replies.push(task);
        user
    }

    async fn finish_reply(&self, reply: PendingReply) {
        let (delivered, typing) = {
            let mut state = self.state.lock().await;
            let delivered = state.deliver(reply);
            (delivered, state.typing())
        };
        let Some(message) = delivered else {
            debug!("dropped stale reply");
            return;
        };
        self.publish(CompanionEvent::MessageAppended(message.clone()));
        if !typing {
            self.publish(CompanionEvent::TypingStopped);
        }
        self.speak(message.text(), message.emotion()).await;
    }

    // ── Speech ─────────────────────────────────────────────

    async fn speak(&self, text: &str, emotion: Option<EmotionLabel>) {
        if !self.config.speech_enabled {
            return;
        }
        if !self.speech.is_available().await {
            self.warn_speech_once(format!("{} output is not available", self.speech.id()));
            return;
        }
        // A new line replaces whatever is still being spoken.
        if self.state.lock().await.speaking() {
            self.speech.stop();
        }
        if let Err(e) = self.speech.speak(text, emotion_tts::params_for(emotion)).await {
            self.warn_speech_once(e.to_string());
            return;
        }
        self.mark_speaking().await;
    }

    fn warn_speech_once(&self, reason: String) {
        if !self.speech_warned.swap(true, Ordering::Relaxed) {
            warn!(%reason, "speech output unavailable, continuing text-only");
            self.publish(CompanionEvent::SpeechUnavailable { reason });
        }
    }

    /// Raise the speaking flag and (re)arm the timer that lowers it.
    async fn mark_speaking(&self) {
        if self.state.lock().await.set_speaking(true) {
            self.publish(CompanionEvent::Speaking(true));
        }
        let this = self.clone();
        let task = DelayedTask::spawn(self.config.speaking_duration(), async move {
            if this.state.lock().await.set_speaking(false) {
                this.publish(CompanionEvent::Speaking(false));
            }
        });
        // Replacing the old timer aborts it.
        self.tasks().speaking = Some(task);
    }

    /// Stop talking right away.
    pub async fn mute(&self) {
        self.speech.stop();
        self.tasks().speaking = None;
        if self.state.lock().await.set_speaking(false) {
            self.publish(CompanionEvent::Speaking(false));
        }
    }

    // ── Queries ────────────────────────────────────────────

    pub async fn snapshot(&self) -> CompanionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.lock().await.messages().to_vec()
    }

    pub async fn engagement(&self) -> EngagementLevel {
        self.state.lock().await.engagement()
    }

    pub async fn context(&self) -> InteractionContext {
        self.state.lock().await.context()
    }

    pub async fn current_emotion(&self) -> EmotionLabel {
        self.state.lock().await.current_emotion()
    }

    /// Replies still waiting out their thinking delay.
    pub fn pending_replies(&self) -> usize {
        self.tasks()
            .replies
            .iter()
            .filter(|t| !t.is_finished())
            .count()
    }

    /// Cancel every timer and silence speech.
    pub async fn shutdown(&self) {
        {
            let mut tasks = self.tasks();
            tasks.replies.clear();
            tasks.speaking = None;
        }
        self.speech.stop();
        info!("companion shut down");
    }
}
