//! Recognition results in the LUIS v3 prediction shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The intent LUIS reports when nothing else matched.
pub const NONE_INTENT: &str = "None";

/// Confidence attached to one intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub score: f64,
}

/// What the recognizer understood of one utterance.
///
/// `entities` keeps the raw LUIS v3 composite payload, `$instance` spans
/// included; `crate::entities` knows the paths into it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognizerResult {
    pub text: String,
    #[serde(default)]
    pub intents: HashMap<String, IntentScore>,
    #[serde(default)]
    pub entities: Value,
}

impl RecognizerResult {
    /// The highest-scoring intent, `"None"` when there are no intents.
    pub fn top_intent(&self) -> &str {
        self.intents
            .iter()
            .max_by(|a, b| {
                a.1.score
                    .partial_cmp(&b.1.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(name, _)| name.as_str())
            .unwrap_or(NONE_INTENT)
    }
}
