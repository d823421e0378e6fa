//! Interaction contexts and the controller that switches between them.
//!
//! Every switch (including re-selecting the current context) hands back a
//! [`ContextTransition`] bundle: the caller resets engagement, reseeds the
//! conversation with the greeting, and queues the spoken welcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::engagement::EngagementLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionContext {
    #[default]
    Learning,
    Assessment,
    Interview,
}

impl InteractionContext {
    pub const ALL: [InteractionContext; 3] = [
        InteractionContext::Learning,
        InteractionContext::Assessment,
        InteractionContext::Interview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionContext::Learning => "learning",
            InteractionContext::Assessment => "assessment",
            InteractionContext::Interview => "interview",
        }
    }

    /// First assistant message of a fresh session.
    pub fn greeting(&self) -> &'static str {
        match self {
            InteractionContext::Learning => {
                "Hi! I'm your learning companion. What would you like to explore today?"
            }
            InteractionContext::Assessment => {
                "Welcome to your assessment. Take your time, read each question carefully, and answer in your own words."
            }
            InteractionContext::Interview => {
                "Hello, and welcome to your practice interview. Let's start with a simple one: tell me a little about yourself."
            }
        }
    }

    /// Spoken when the context becomes active.
    pub fn welcome(&self) -> &'static str {
        match self {
            InteractionContext::Learning => {
                "Learning mode is on. I'll keep an eye on how engaged you are and adjust as we go."
            }
            InteractionContext::Assessment => {
                "Assessment mode is on. I can't give answers, but I'll help you stay calm and focused."
            }
            InteractionContext::Interview => {
                "Interview mode is on. Answer as you would in a real interview and I'll share tips along the way."
            }
        }
    }
}

impl fmt::Display for InteractionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interaction context: {0}")]
pub struct ParseContextError(pub String);

impl FromStr for InteractionContext {
    type Err = ParseContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        InteractionContext::ALL
            .iter()
            .copied()
            .find(|ctx| ctx.as_str() == lower)
            .ok_or_else(|| ParseContextError(s.to_string()))
    }
}

// ── Transition Bundle ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ContextTransition {
    pub from: Option<InteractionContext>,
    pub to: InteractionContext,
    pub engagement: EngagementLevel,
    pub greeting: &'static str,
    pub welcome: &'static str,
    /// Set only on the startup entry.
    pub activate_avatar: bool,
    /// Set only on the startup entry.
    pub auto_start_sensors: bool,
}

// ── Controller ─────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ContextController {
    current: Option<InteractionContext>,
}

impl ContextController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current context. `Learning` before startup has run.
    pub fn current(&self) -> InteractionContext {
        self.current.unwrap_or_default()
    }

    pub fn started(&self) -> bool {
        self.current.is_some()
    }

    /// Startup entry into `Learning`. Only the first call produces a bundle.
    pub fn start(&mut self) -> Option<ContextTransition> {
        if self.current.is_some() {
            return None;
        }
        let mut transition = self.switch_to(InteractionContext::Learning);
        transition.activate_avatar = true;
        transition.auto_start_sensors = true;
        Some(transition)
    }

    /// Explicit user selection. Any context is reachable from any other.
    pub fn switch_to(&mut self, to: InteractionContext) -> ContextTransition {
        let from = self.current.replace(to);
        ContextTransition {
            from,
            to,
            engagement: EngagementLevel::default(),
            greeting: to.greeting(),
            welcome: to.welcome(),
            activate_avatar: false,
            auto_start_sensors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_controller_reports_learning() {
        assert_eq!(InteractionContext::default(), InteractionContext::Learning);
        assert_eq!(ContextController::new().current(), InteractionContext::Learning);
    }

    #[test]
    fn startup_enters_learning_once() {
        let mut ctl = ContextController::new();
        let t = ctl.start().expect("first start yields a transition");
        assert_eq!(t.from, None);
        assert_eq!(t.to, InteractionContext::Learning);
        assert!(t.activate_avatar && t.auto_start_sensors);
        assert!(ctl.start().is_none());
    }

    #[test]
    fn every_pair_of_contexts_is_connected() {
        for from in InteractionContext::ALL {
            for to in InteractionContext::ALL {
                let mut ctl = ContextController::new();
                ctl.switch_to(from);
                let t = ctl.switch_to(to);
                assert_eq!(t.from, Some(from));
                assert_eq!(ctl.current(), to);
                assert_eq!(t.engagement.value(), 5.0);
                assert_eq!(t.greeting, to.greeting());
                assert!(!t.activate_avatar);
            }
        }
    }

    #[test]
    fn parses_context_names() {
        assert_eq!(
            "Interview".parse::<InteractionContext>().unwrap(),
            InteractionContext::Interview
        );
        assert!("exam".parse::<InteractionContext>().is_err());
    }
}
