//! Scripted response selection.
//!
//! Rules are checked in a fixed order and the first match wins:
//! context triggers, then the emotion fallback, then generic utterance shape.
//! Keyword matching is case-insensitive substring containment on the whole
//! utterance (so "hi" also fires inside "this").
//!
//! [`generate`] is pure and deterministic. [`generate_spoken`] is the voice
//! path wrapper that swaps the plain acknowledgment for a randomly chosen
//! ambient phrase drawn from the caller's RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::context::InteractionContext;
use super::emotion::EmotionLabel;
use super::engagement::EngagementLevel;

// ── Keyword sets ───────────────────────────────────────────

const QUIZ_KW: &[&str] = &["quiz", "test"];
const EXPLAIN_KW: &[&str] = &["explain", "understand"];
const REPEAT_KW: &[&str] = &["repeat", "again"];
const DIFFICULT_KW: &[&str] = &["difficult", "hard"];
const BORED_KW: &[&str] = &["bored", "boring"];
const GREETING_KW: &[&str] = &["hello", "hi"];
const THANKS_KW: &[&str] = &["thank"];
const EXAMPLE_KW: &[&str] = &["example"];

const HINT_KW: &[&str] = &["hint", "help"];
const TIME_KW: &[&str] = &["time", "left"];
/// Assessment answers shorter than this (in chars) get an elaboration request.
const MIN_ASSESSMENT_ANSWER_CHARS: usize = 20;

const NERVOUS_KW: &[&str] = &["nervous", "anxious"];
const STRENGTH_KW: &[&str] = &["strength", "weakness"];
const SALARY_KW: &[&str] = &["salary", "compensation"];

const AMBIENT_PHRASES: &[&str] = &[
    "Hmm, let me think about that for a moment.",
    "I hear you. Give me a second to reflect on that.",
    "That's worth thinking about. Tell me a bit more while I mull it over.",
    "Interesting. I'm turning that over in my mind.",
];

// ── Rules ──────────────────────────────────────────────────

/// Which rule produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseRule {
    LearningDisengaged,
    LearningQuiz,
    LearningExplain,
    LearningRepeat,
    LearningDifficult,
    LearningBored,
    LearningGreeting,
    LearningThanks,
    LearningExample,

    AssessmentElaborate,
    AssessmentNoHints,
    AssessmentTime,

    InterviewNervous,
    InterviewStrengths,
    InterviewSalary,

    EmotionHappy,
    EmotionSad,
    EmotionAngry,
    EmotionStartled,
    EmotionExcited,
    EmotionCalm,

    GenericStatus,
    GenericHelp,
    GenericQuestion,
    GenericAcknowledge,
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

/// Pick the rule for an utterance. First match wins.
pub fn select_rule(
    utterance: &str,
    emotion: Option<EmotionLabel>,
    context: InteractionContext,
    engagement: EngagementLevel,
) -> ResponseRule {
    let lower = utterance.to_lowercase();

    if let Some(rule) = context_rule(&lower, utterance, context, engagement) {
        return rule;
    }
    if let Some(rule) = emotion.and_then(emotion_rule) {
        return rule;
    }
    generic_rule(&lower, utterance)
}

fn context_rule(
    lower: &str,
    original: &str,
    context: InteractionContext,
    engagement: EngagementLevel,
) -> Option<ResponseRule> {
    match context {
        InteractionContext::Learning => {
            if engagement.is_low() {
                return Some(ResponseRule::LearningDisengaged);
            }
            let table: [(&[&str], ResponseRule); 8] = [
                (QUIZ_KW, ResponseRule::LearningQuiz),
                (EXPLAIN_KW, ResponseRule::LearningExplain),
                (REPEAT_KW, ResponseRule::LearningRepeat),
                (DIFFICULT_KW, ResponseRule::LearningDifficult),
                (BORED_KW, ResponseRule::LearningBored),
                (GREETING_KW, ResponseRule::LearningGreeting),
                (THANKS_KW, ResponseRule::LearningThanks),
                (EXAMPLE_KW, ResponseRule::LearningExample),
            ];
            table
                .iter()
                .find(|(kw, _)| contains_any(lower, kw))
                .map(|(_, rule)| *rule)
        }
        InteractionContext::Assessment => {
            if original.chars().count() < MIN_ASSESSMENT_ANSWER_CHARS {
                Some(ResponseRule::AssessmentElaborate)
            } else if contains_any(lower, HINT_KW) {
                Some(ResponseRule::AssessmentNoHints)
            } else if contains_any(lower, TIME_KW) {
                Some(ResponseRule::AssessmentTime)
            } else {
                None
            }
        }
        InteractionContext::Interview => {
            if contains_any(lower, NERVOUS_KW) {
                Some(ResponseRule::InterviewNervous)
            } else if contains_any(lower, STRENGTH_KW) {
                Some(ResponseRule::InterviewStrengths)
            } else if contains_any(lower, SALARY_KW) {
                Some(ResponseRule::InterviewSalary)
            } else {
                None
            }
        }
    }
}

fn emotion_rule(emotion: EmotionLabel) -> Option<ResponseRule> {
    match emotion {
        EmotionLabel::Happy => Some(ResponseRule::EmotionHappy),
        EmotionLabel::Sad => Some(ResponseRule::EmotionSad),
        EmotionLabel::Angry => Some(ResponseRule::EmotionAngry),
        EmotionLabel::Anxious | EmotionLabel::Surprised => Some(ResponseRule::EmotionStartled),
        EmotionLabel::Excited => Some(ResponseRule::EmotionExcited),
        EmotionLabel::Calm => Some(ResponseRule::EmotionCalm),
        EmotionLabel::Neutral => None,
    }
}

fn generic_rule(lower: &str, original: &str) -> ResponseRule {
    if lower.contains("how are you") {
        ResponseRule::GenericStatus
    } else if lower.contains("help") {
        ResponseRule::GenericHelp
    } else if original.ends_with('?') {
        ResponseRule::GenericQuestion
    } else {
        ResponseRule::GenericAcknowledge
    }
}

impl ResponseRule {
    /// Response text for this rule. Only the happy reply looks at the utterance.
    pub fn render(&self, utterance: &str) -> String {
        let text = match self {
            ResponseRule::LearningDisengaged => {
                "I notice your attention might be drifting. Would you like to take a short break, or try this topic a different way?"
            }
            ResponseRule::LearningQuiz => {
                "Let's get you ready for that! I can run a few practice questions with you. Want to start with the key concepts?"
            }
            ResponseRule::LearningExplain => {
                "Of course. Let's go through it step by step. Tell me which part you'd like me to start with."
            }
            ResponseRule::LearningRepeat => {
                "No problem, I'm happy to go over that again. I'll take it a little slower this time."
            }
            ResponseRule::LearningDifficult => {
                "This part can be tricky, and it's completely normal to find it hard. Let's break it into smaller pieces together."
            }
            ResponseRule::LearningBored => {
                "Let's shake things up! How about a quick challenge or a real-world example to make this more interesting?"
            }
            ResponseRule::LearningGreeting => {
                "Hello! Great to have you here. What would you like to learn about today?"
            }
            ResponseRule::LearningThanks => {
                "You're welcome! You're making good progress. What should we look at next?"
            }
            ResponseRule::LearningExample => {
                "Good idea, examples make things click. Let me walk you through one."
            }
            ResponseRule::AssessmentElaborate => {
                "Could you elaborate on your answer? Try to explain your reasoning in a bit more detail."
            }
            ResponseRule::AssessmentNoHints => {
                "I can't give hints during the assessment, but I can suggest re-reading the question carefully and working through what you already know."
            }
            ResponseRule::AssessmentTime => {
                "Don't worry about the clock. You still have time, so focus on one question at a time."
            }
            ResponseRule::InterviewNervous => {
                "Feeling nervous is completely natural. Take a deep breath. You're well prepared, so just be yourself."
            }
            ResponseRule::InterviewStrengths => {
                "A good approach for strengths and weaknesses: give a concrete example, and for weaknesses, show what you're doing to improve."
            }
            ResponseRule::InterviewSalary => {
                "When compensation comes up, it helps to research the typical range beforehand and give a range rather than a single number."
            }
            ResponseRule::EmotionHappy => {
                let middle = if utterance.contains('?') {
                    "That's a great question!"
                } else {
                    "Thanks for sharing that with me!"
                };
                return format!(
                    "I'm glad you're feeling happy! {} I'm here to keep the positive vibes going. 😊",
                    middle
                );
            }
            ResponseRule::EmotionSad => {
                "I notice you might be feeling down. Remember that it's okay to feel this way sometimes. I'm here to listen and support you. Is there anything specific that's troubling you?"
            }
            ResponseRule::EmotionAngry => {
                "I understand that you might be feeling frustrated right now. Taking deep breaths can sometimes help. Would you like to talk more about what's bothering you?"
            }
            ResponseRule::EmotionStartled => {
                "It seems like something might have caught you off guard. I'm here to help you process these feelings. Would you like to talk more about it?"
            }
            ResponseRule::EmotionExcited => {
                "Your enthusiasm is contagious! I'm excited too! Tell me more about what's got you so energized!"
            }
            ResponseRule::EmotionCalm => {
                "I appreciate this peaceful moment we're sharing. It's nice to have these balanced conversations. What's on your mind?"
            }
            ResponseRule::GenericStatus => {
                "I'm doing well, thank you for asking! I'm here to assist and chat with you. How can I help you today?"
            }
            ResponseRule::GenericHelp => {
                "I'd be happy to help! I can chat with you, answer questions, or just keep you company. What do you need assistance with?"
            }
            ResponseRule::GenericQuestion => {
                "That's an interesting question. I'm designed to be a supportive companion. While I don't have all the answers, I can certainly try to help or just listen."
            }
            ResponseRule::GenericAcknowledge => {
                "Thank you for sharing that with me. I'm designed to be a supportive presence. Is there anything specific you'd like to talk about?"
            }
        };
        text.to_string()
    }
}

// ── Entry points ───────────────────────────────────────────

/// Deterministic response for a typed utterance. Never empty.
pub fn generate(
    utterance: &str,
    emotion: Option<EmotionLabel>,
    context: InteractionContext,
    engagement: EngagementLevel,
) -> String {
    select_rule(utterance, emotion, context, engagement).render(utterance)
}

/// Voice-path response: like [`generate`], except the plain acknowledgment
/// is replaced by an ambient phrase picked uniformly from `rng`.
pub fn generate_spoken<R: Rng + ?Sized>(
    utterance: &str,
    emotion: Option<EmotionLabel>,
    context: InteractionContext,
    engagement: EngagementLevel,
    rng: &mut R,
) -> String {
    let rule = select_rule(utterance, emotion, context, engagement);
    render_spoken(rule, utterance, rng)
}

/// Voice-path rendering of an already selected rule.
pub fn render_spoken<R: Rng + ?Sized>(rule: ResponseRule, utterance: &str, rng: &mut R) -> String {
    match rule {
        ResponseRule::GenericAcknowledge => AMBIENT_PHRASES
            .choose(rng)
            .copied()
            .unwrap_or(AMBIENT_PHRASES[0])
            .to_string(),
        rule => rule.render(utterance),
    }
}

pub fn ambient_phrases() -> &'static [&'static str] {
    AMBIENT_PHRASES
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn high() -> EngagementLevel {
        EngagementLevel::new(8.0)
    }

    fn rule(text: &str, emotion: Option<EmotionLabel>, ctx: InteractionContext) -> ResponseRule {
        select_rule(text, emotion, ctx, high())
    }

    #[test]
    fn explain_beats_question_fallback() {
        assert_eq!(
            rule("Can you explain this?", None, InteractionContext::Learning),
            ResponseRule::LearningExplain
        );
    }

    #[test]
    fn learning_keyword_order() {
        let ctx = InteractionContext::Learning;
        // "test" outranks "explain"
        assert_eq!(rule("explain the test", None, ctx), ResponseRule::LearningQuiz);
        assert_eq!(rule("Say that AGAIN", None, ctx), ResponseRule::LearningRepeat);
        assert_eq!(rule("this is hard", None, ctx), ResponseRule::LearningDifficult);
        assert_eq!(rule("so boring", None, ctx), ResponseRule::LearningBored);
        assert_eq!(rule("Hello there", None, ctx), ResponseRule::LearningGreeting);
        assert_eq!(rule("thanks a lot", None, ctx), ResponseRule::LearningThanks);
        assert_eq!(rule("an example please", None, ctx), ResponseRule::LearningExample);
    }

    #[test]
    fn low_engagement_preempts_learning_keywords() {
        let low = EngagementLevel::new(3.5);
        for text in ["Can you explain this?", "quiz me", "whatever"] {
            assert_eq!(
                select_rule(text, Some(EmotionLabel::Happy), InteractionContext::Learning, low),
                ResponseRule::LearningDisengaged
            );
        }
        // Threshold is exclusive.
        assert_eq!(
            select_rule("quiz me", None, InteractionContext::Learning, EngagementLevel::new(4.0)),
            ResponseRule::LearningQuiz
        );
    }

    #[test]
    fn low_engagement_only_matters_while_learning() {
        let low = EngagementLevel::new(1.0);
        assert_eq!(
            select_rule("I feel nervous", None, InteractionContext::Interview, low),
            ResponseRule::InterviewNervous
        );
    }

    #[test]
    fn short_assessment_answer_asks_for_more() {
        for emotion in [None, Some(EmotionLabel::Sad), Some(EmotionLabel::Happy)] {
            assert_eq!(
                rule("hint?", emotion, InteractionContext::Assessment),
                ResponseRule::AssessmentElaborate
            );
        }
    }

    #[test]
    fn assessment_keywords_after_length_check() {
        let ctx = InteractionContext::Assessment;
        assert_eq!(
            rule("Could you give me a hint for this one", None, ctx),
            ResponseRule::AssessmentNoHints
        );
        assert_eq!(
            rule("How much time do I have remaining", None, ctx),
            ResponseRule::AssessmentTime
        );
        assert_eq!(
            rule("The answer is photosynthesis, I think", Some(EmotionLabel::Calm), ctx),
            ResponseRule::EmotionCalm
        );
    }

    #[test]
    fn assessment_length_counts_chars_not_bytes() {
        // 19 chars, more than 20 bytes
        let text = "ééééééééééééééééééé";
        assert_eq!(text.chars().count(), 19);
        assert_eq!(
            rule(text, None, InteractionContext::Assessment),
            ResponseRule::AssessmentElaborate
        );
    }

    #[test]
    fn interview_keywords_fire_without_question_mark() {
        let ctx = InteractionContext::Interview;
        assert_eq!(rule("I feel nervous", None, ctx), ResponseRule::InterviewNervous);
        assert_eq!(
            rule("What is my biggest WEAKNESS", None, ctx),
            ResponseRule::InterviewStrengths
        );
        assert_eq!(
            rule("should I ask about salary?", None, ctx),
            ResponseRule::InterviewSalary
        );
    }

    #[test]
    fn emotion_fallback_when_no_context_rule() {
        let ctx = InteractionContext::Interview;
        let cases = [
            (EmotionLabel::Happy, ResponseRule::EmotionHappy),
            (EmotionLabel::Sad, ResponseRule::EmotionSad),
            (EmotionLabel::Angry, ResponseRule::EmotionAngry),
            (EmotionLabel::Anxious, ResponseRule::EmotionStartled),
            (EmotionLabel::Surprised, ResponseRule::EmotionStartled),
            (EmotionLabel::Excited, ResponseRule::EmotionExcited),
            (EmotionLabel::Calm, ResponseRule::EmotionCalm),
        ];
        for (emotion, expected) in cases {
            assert_eq!(rule("how are you?", Some(emotion), ctx), expected);
        }
    }

    #[test]
    fn neutral_falls_through_to_generic() {
        let ctx = InteractionContext::Interview;
        let neutral = Some(EmotionLabel::Neutral);
        assert_eq!(rule("How are you?", neutral, ctx), ResponseRule::GenericStatus);
        assert_eq!(rule("can you help", None, ctx), ResponseRule::GenericHelp);
        assert_eq!(rule("what now?", neutral, ctx), ResponseRule::GenericQuestion);
        assert_eq!(rule("ok", None, ctx), ResponseRule::GenericAcknowledge);
    }

    #[test]
    fn happy_reply_reacts_to_question_mark() {
        let ctx = InteractionContext::Interview;
        let asked = generate("what's next?", Some(EmotionLabel::Happy), ctx, high());
        let told = generate("I got the job", Some(EmotionLabel::Happy), ctx, high());
        assert!(asked.contains("That's a great question!"));
        assert!(told.contains("Thanks for sharing that with me!"));
    }

    #[test]
    fn every_rule_renders_non_empty_text() {
        let long = "x".repeat(40);
        for ctx in InteractionContext::ALL {
            for emotion in EmotionLabel::ALL {
                for text in ["", "?", "hi", long.as_str()] {
                    for level in [1.0, 5.0, 10.0] {
                        let out = generate(text, Some(emotion), ctx, EngagementLevel::new(level));
                        assert!(!out.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn spoken_path_is_reproducible_with_a_seed() {
        let ctx = InteractionContext::Interview;
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first: Vec<String> = (0..8)
            .map(|_| generate_spoken("ok", None, ctx, high(), &mut a))
            .collect();
        let second: Vec<String> = (0..8)
            .map(|_| generate_spoken("ok", None, ctx, high(), &mut b))
            .collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|p| ambient_phrases().contains(&p.as_str())));
    }

    #[test]
    fn spoken_path_keeps_specific_rules() {
        let mut rng = StdRng::seed_from_u64(1);
        let spoken = generate_spoken(
            "I feel nervous",
            None,
            InteractionContext::Interview,
            high(),
            &mut rng,
        );
        assert_eq!(
            spoken,
            ResponseRule::InterviewNervous.render("I feel nervous")
        );
    }
}
