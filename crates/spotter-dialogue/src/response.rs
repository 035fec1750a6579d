//! Response rendering.
//!
//! Conversational intents get light phrasing variation; everything that a
//! test or a re-prompt depends on (clarification questions, option lists,
//! error messages) renders deterministically.

use rand::Rng;

use spotter_core::types::{ClarificationContext, IntentKind};

static GREETINGS: &[&str] = &[
    "Hey! Ready to train?",
    "Hi there! What are we working on today?",
    "Hello! Want me to put a workout together?",
];

static FAREWELLS: &[&str] = &[
    "See you next session!",
    "Bye! Rest up.",
    "Take care, and good work today.",
];

static THANKS_REPLIES: &[&str] = &[
    "Anytime!",
    "Happy to help.",
    "You're welcome. Keep it up!",
];

const HELP_TEXT: &str = "I can create a workout (\"create a 20 minute strength workout\"), \
look up exercises (\"what is a squat?\"), and scale your current plan (\"double it\").";

const UNKNOWN_TEXT: &str =
    "I'm not sure I can help with that. Try asking for a workout or about an exercise.";

const NOTHING_TO_MODIFY_TEXT: &str =
    "There's no active workout to modify. Ask me to create one first.";

const STALE_CLARIFICATION_TEXT: &str =
    "The workout we were talking about is no longer active. Could you tell me again what you'd like to do?";

const LOOKUP_FOLLOW_UP_TEXT: &str = "Which exercise would you like to know about?";

const MISMATCH_PREFIX: &str = "Sorry, I didn't catch that.";

#[derive(Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Templated reply for a conversational intent, with varied phrasing.
    pub fn conversational(&self, kind: &IntentKind) -> String {
        match kind {
            IntentKind::Greeting => pick(GREETINGS),
            IntentKind::Farewell => pick(FAREWELLS),
            IntentKind::Thanks => pick(THANKS_REPLIES),
            _ => HELP_TEXT.to_string(),
        }
    }

    /// The question plus its enumerated options. Deterministic, so a
    /// re-prompt reproduces the original text exactly.
    pub fn clarification(&self, ctx: &ClarificationContext) -> String {
        let mut lines = vec![ctx.question.clone()];
        for (i, option) in ctx.options.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, option.label));
        }
        lines.join("\n")
    }

    /// The original question re-rendered behind a not-understood note.
    pub fn mismatch(&self, ctx: &ClarificationContext) -> String {
        format!("{} {}", MISMATCH_PREFIX, self.clarification(ctx))
    }

    pub fn unknown(&self) -> String {
        UNKNOWN_TEXT.to_string()
    }

    pub fn nothing_to_modify(&self) -> String {
        NOTHING_TO_MODIFY_TEXT.to_string()
    }

    pub fn stale_clarification(&self) -> String {
        STALE_CLARIFICATION_TEXT.to_string()
    }

    pub fn lookup_follow_up(&self) -> String {
        LOOKUP_FOLLOW_UP_TEXT.to_string()
    }
}

fn pick(phrases: &[&str]) -> String {
    let i = rand::thread_rng().gen_range(0..phrases.len());
    phrases[i].to_string()
}
