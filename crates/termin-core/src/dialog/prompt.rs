//! Suspending prompts and their answer parsing.

use crate::transport::Activity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const AFFIRM_WORDS: [&str; 14] = [
    "ja", "jo", "jep", "jawohl", "klar", "genau", "richtig", "stimmt", "passt", "gerne", "yes",
    "y", "yep", "ok",
];

const DENY_WORDS: [&str; 9] = [
    "nein", "ne", "nee", "nö", "noe", "falsch", "no", "n", "nope",
];

/// What kind of answer a prompt expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Free text, returned verbatim.
    Text,
    /// Binary yes/no question.
    Confirm,
}

/// A prompt recorded on a suspended stack frame.
///
/// The frame keeps the whole request so a later turn knows how to
/// interpret the raw answer and what to re-send when it does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub text: String,
    /// Sent instead of `text` when the answer was unusable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_text: Option<String>,
}

impl PromptRequest {
    /// Creates a free-text prompt.
    pub fn text_prompt(text: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Text,
            text: text.into(),
            retry_text: None,
        }
    }

    /// Creates a yes/no prompt with a dedicated retry line.
    pub fn confirm(text: impl Into<String>, retry_text: impl Into<String>) -> Self {
        Self {
            kind: PromptKind::Confirm,
            text: text.into(),
            retry_text: Some(retry_text.into()),
        }
    }

    /// The activity announcing this prompt.
    pub fn activity(&self) -> Activity {
        Activity::prompt(&self.text)
    }

    /// The activity for a repeated attempt after an unusable answer.
    pub fn retry_activity(&self) -> Activity {
        Activity::prompt(self.retry_text.as_deref().unwrap_or(&self.text))
    }

    /// Parses a raw answer according to the prompt kind.
    ///
    /// `None` means the answer is unusable and the prompt is asked again.
    pub fn parse_answer(&self, raw: &str) -> Option<Value> {
        match self.kind {
            PromptKind::Text => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Value::String(trimmed.to_string()))
                }
            }
            PromptKind::Confirm => parse_confirmation(raw).map(Value::Bool),
        }
    }
}

/// Maps a free-form utterance onto yes/no.
///
/// German and English short forms are accepted; anything else is treated
/// as unclear and leads to a re-prompt.
pub fn parse_confirmation(raw: &str) -> Option<bool> {
    let text = raw.trim().to_lowercase();
    let text = text.trim_end_matches(['.', '!']);
    if AFFIRM_WORDS.contains(&text) {
        return Some(true);
    }
    if DENY_WORDS.contains(&text) {
        return Some(false);
    }
    None
}
