//! Conversation session: an append-only message log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::InteractionContext;
use super::emotion::EmotionLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single chat message. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    id: Uuid,
    text: String,
    sender: Sender,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion: Option<EmotionLabel>,
    created_at: i64,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::build(text.into(), Sender::User, None)
    }

    /// `emotion` is the reading the reply was generated against.
    pub fn assistant(text: impl Into<String>, emotion: Option<EmotionLabel>) -> Self {
        Self::build(text.into(), Sender::Assistant, emotion)
    }

    fn build(text: String, sender: Sender, emotion: Option<EmotionLabel>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            sender,
            emotion,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn emotion(&self) -> Option<EmotionLabel> {
        self.emotion
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// A non-blank utterance. Blank input never reaches the responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    /// `None` for empty or whitespace-only input. The text is kept as typed.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationSession {
    messages: Vec<Message>,
}

impl ConversationSession {
    /// A session already seeded with the context greeting.
    pub fn seeded(context: InteractionContext) -> Self {
        let mut session = Self::default();
        session.clear_and_reseed(context);
        session
    }

    pub fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear_and_reseed(&mut self, context: InteractionContext) -> &Message {
        self.messages.clear();
        self.append(Message::assistant(context.greeting(), None))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn appended_messages_read_back_in_order() {
        let mut session = ConversationSession::default();
        let sent: Vec<Message> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {}", i))
                } else {
                    Message::assistant(format!("answer {}", i), Some(EmotionLabel::Calm))
                }
            })
            .collect();
        for m in &sent {
            session.append(m.clone());
        }
        assert_eq!(session.messages(), sent.as_slice());

        let ids: HashSet<Uuid> = session.messages().iter().map(|m| m.id()).collect();
        assert_eq!(ids.len(), 10, "ids must be unique");
        assert!(session
            .messages()
            .windows(2)
            .all(|w| w[0].created_at() <= w[1].created_at()));
    }

    #[test]
    fn reseed_leaves_only_the_greeting() {
        let mut session = ConversationSession::seeded(InteractionContext::Learning);
        session.append(Message::user("hello"));
        session.clear_and_reseed(InteractionContext::Interview);

        assert_eq!(session.len(), 1);
        let greeting = &session.messages()[0];
        assert_eq!(greeting.sender(), Sender::Assistant);
        assert_eq!(greeting.text(), InteractionContext::Interview.greeting());
        assert_eq!(greeting.emotion(), None);
    }

    #[test]
    fn blank_utterances_are_rejected() {
        assert!(Utterance::new("").is_none());
        assert!(Utterance::new("  \n\t ").is_none());
        let kept = Utterance::new("  hi  ").unwrap();
        assert_eq!(kept.as_str(), "  hi  ");
    }

    #[test]
    fn user_messages_carry_no_emotion() {
        let m = Message::user("hey");
        assert_eq!(m.sender(), Sender::User);
        assert!(m.emotion().is_none());
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("emotion").is_none());
        assert_eq!(json["sender"], "user");
    }
}
