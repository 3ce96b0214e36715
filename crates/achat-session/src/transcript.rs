//! Chat transcript.
//!
//! An ordered, bounded list of finished messages. Messages are immutable
//! once appended; the oldest is evicted when the buffer is full.

use std::collections::VecDeque;

use crate::protocol::{ANSWER_PREFIX, PROBLEM_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// A single finished message, text includes its speaker prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    speaker: Speaker,
    text: String,
}

impl Message {
    /// The echo of a prompt the user sent.
    pub fn problem(prompt: &str) -> Self {
        Self {
            speaker: Speaker::User,
            text: format!("{PROBLEM_PREFIX}{prompt}"),
        }
    }

    /// A streamed reply. `text` already carries the answer prefix.
    pub(crate) fn answer(text: String) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text,
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text without the speaker prefix.
    pub fn body(&self) -> &str {
        let prefix = match self.speaker {
            Speaker::User => PROBLEM_PREFIX,
            Speaker::Assistant => ANSWER_PREFIX,
        };
        self.text.strip_prefix(prefix).unwrap_or(&self.text)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: VecDeque<Message>,
    max_messages: usize,
}

impl Transcript {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            max_messages: max_messages.max(1),
        }
    }

    pub fn push(&mut self, message: Message) {
        if self.messages.len() >= self.max_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Remove and return the most recent message.
    pub fn delete_last(&mut self) -> Option<Message> {
        self.messages.pop_back()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    /// Most recent assistant message.
    pub fn last_answer(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::Assistant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(1000)
    }
}
