//! Episodic memory: an append-only, bounded record of past turns.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use spotter_core::types::Timestamp;

/// Default number of turns retained when no configuration is supplied.
const DEFAULT_CAP: usize = 50;

/// A single completed exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user_input: String,
    pub agent_response: String,
    pub at: Timestamp,
}

/// Bounded turn history. Appending past the cap trims the oldest turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodicMemory {
    turns: VecDeque<Turn>,
    cap: usize,
}

impl Default for EpisodicMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAP)
    }
}

impl EpisodicMemory {
    pub fn new(cap: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            cap,
        }
    }

    /// Append a completed turn, trimming the oldest entries past the cap.
    pub fn record(&mut self, user_input: impl Into<String>, agent_response: impl Into<String>) {
        self.turns.push_back(Turn {
            user_input: user_input.into(),
            agent_response: agent_response.into(),
            at: Timestamp::now(),
        });
        while self.turns.len() > self.cap {
            self.turns.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }
}
