//! Keyword and regex patterns for the primary-intent stage.
//!
//! Compiled once and reused across calls. The cascade is short-circuiting:
//! callers try each matcher in a fixed order and take the first hit.

use std::sync::LazyLock;

use regex::Regex;

use spotter_core::types::{ExperienceLevel, IntentKind};

// =============================================================================
// Conversational patterns
// =============================================================================

struct ConversationalPatterns {
    greeting: Vec<Regex>,
    farewell: Vec<Regex>,
    thanks: Vec<Regex>,
    help: Vec<Regex>,
}

static CONVERSATIONAL: LazyLock<ConversationalPatterns> = LazyLock::new(|| {
    let mk = |pats: &[&str]| -> Vec<Regex> {
        pats.iter()
            .map(|p| Regex::new(p).expect("Invalid conversational regex"))
            .collect()
    };

    ConversationalPatterns {
        greeting: mk(&[
            r"(?i)^\s*(?:hi|hello|hey|howdy|yo)\b",
            r"(?i)^\s*good\s+(?:morning|afternoon|evening)\b",
        ]),
        farewell: mk(&[
            r"(?i)^\s*(?:bye|goodbye)\b",
            r"(?i)\bsee\s+you\b",
            r"(?i)\bgood\s*night\b",
            r"(?i)\bcatch\s+you\s+later\b",
            r"(?i)\bsigning\s+off\b",
        ]),
        thanks: mk(&[
            r"(?i)\bthanks\b",
            r"(?i)\bthank\s+you\b",
            r"(?i)\bthx\b",
            r"(?i)\bappreciate\s+(?:it|that)\b",
        ]),
        help: mk(&[
            r"(?i)\bhelp\b",
            r"(?i)\bwhat\s+can\s+you\s+do\b",
            r"(?i)\bhow\s+do(?:es)?\s+this\s+work\b",
        ]),
    }
});

/// Classify a conversational utterance, checking greeting, farewell,
/// thanks, then help-request.
pub(crate) fn conversational(utterance: &str) -> Option<IntentKind> {
    let pats = &*CONVERSATIONAL;
    if pats.greeting.iter().any(|re| re.is_match(utterance)) {
        return Some(IntentKind::Greeting);
    }
    if pats.farewell.iter().any(|re| re.is_match(utterance)) {
        return Some(IntentKind::Farewell);
    }
    if pats.thanks.iter().any(|re| re.is_match(utterance)) {
        return Some(IntentKind::Thanks);
    }
    if pats.help.iter().any(|re| re.is_match(utterance)) {
        return Some(IntentKind::HelpRequest);
    }
    None
}

// =============================================================================
// Exercise lookup patterns
// =============================================================================

static LOOKUP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bwhat\s+muscles\s+do(?:es)?\s+(?:(?:an|a|the)\s+)?([a-z][a-z\s-]*?)\s+work[\s?.!]*$",
        r"(?i)\bwhat(?:'s|\s+is)\s+(?:an|a|the)\s+([a-z][a-z\s-]*?)[\s?.!]*$",
        r"(?i)\btell\s+me\s+about\s+(?:(?:an|a|the)\s+)?([a-z][a-z\s-]*?)[\s?.!]*$",
        r"(?i)\bhow\s+do\s+i\s+(?:do|perform)\s+(?:(?:an|a|the)\s+)?([a-z][a-z\s-]*?)[\s?.!]*$",
        r"(?i)\blook\s+up\s+(?:(?:an|a|the)\s+)?([a-z][a-z\s-]*?)[\s?.!]*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid lookup regex"))
    .collect()
});

static LOOKUP_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blook\s+(?:something\s+)?up\b").unwrap());

/// Subjects too generic to dispatch a lookup for.
static GENERIC_SUBJECTS: &[&str] = &["exercise", "exercises", "something", "it", "that"];

/// Detect an info-lookup request. The inner option is the extracted
/// subject; `Some(None)` means a lookup with no usable subject.
pub(crate) fn lookup(utterance: &str) -> Option<Option<String>> {
    for re in LOOKUP_PATTERNS.iter() {
        if let Some(caps) = re.captures(utterance) {
            let subject = caps
                .get(1)
                .map_or("", |m| m.as_str())
                .trim()
                .to_lowercase();
            if subject.is_empty() || GENERIC_SUBJECTS.contains(&subject.as_str()) {
                return Some(None);
            }
            return Some(Some(subject));
        }
    }
    if LOOKUP_BARE.is_match(utterance) {
        return Some(None);
    }
    None
}

// =============================================================================
// Workout creation patterns
// =============================================================================

static CREATION_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:create|make|build|plan|start|generate|give\s+me|set\s+up|new)\b")
        .unwrap()
});

static CREATION_NOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:workout|routine|training\s+session)\b").unwrap());

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(strength|cardio|core|mobility|hiit|full[\s-]?body|upper[\s-]?body|lower[\s-]?body|legs?)\b",
    )
    .unwrap()
});

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,3})\s*(?:-\s*)?(?:minutes?|mins?)\b").unwrap());

static LEVEL_BEGINNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:beginner|novice|just\s+starting|new\s+to\s+this)\b").unwrap()
});
static LEVEL_INTERMEDIATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bintermediate\b").unwrap());
static LEVEL_ADVANCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:advanced|expert|experienced)\b").unwrap());

/// Detect a workout-creation request and extract its slots:
/// target category, duration in minutes, and experience level.
pub(crate) fn creation(
    utterance: &str,
) -> Option<(Option<String>, Option<u32>, Option<ExperienceLevel>)> {
    if !CREATION_VERB.is_match(utterance) || !CREATION_NOUN.is_match(utterance) {
        return None;
    }

    let category = CATEGORY_RE.captures(utterance).map(|caps| {
        let raw = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
        let spaced = raw.replace('-', " ");
        if spaced == "leg" {
            "legs".to_string()
        } else {
            spaced
        }
    });

    let duration_minutes = DURATION_RE
        .captures(utterance)
        .and_then(|caps| caps.get(1).map_or("", |m| m.as_str()).parse::<u32>().ok());

    let level = if LEVEL_BEGINNER.is_match(utterance) {
        Some(ExperienceLevel::Beginner)
    } else if LEVEL_INTERMEDIATE.is_match(utterance) {
        Some(ExperienceLevel::Intermediate)
    } else if LEVEL_ADVANCED.is_match(utterance) {
        Some(ExperienceLevel::Advanced)
    } else {
        None
    };

    Some((category, duration_minutes, level))
}

// =============================================================================
// Modification phrases
// =============================================================================

/// Bespoke exact-phrase rule, evaluated after the keyword matchers.
static MODIFY_PHRASES: &[&str] = &[
    "double it",
    "double the workout",
    "double everything",
    "make it double",
];

pub(crate) fn is_modify_phrase(utterance: &str) -> bool {
    let normalized = utterance
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_lowercase();
    MODIFY_PHRASES.contains(&normalized.as_str())
}
