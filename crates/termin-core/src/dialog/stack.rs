//! Dialogue stack and frames.

use super::prompt::PromptRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One running or suspended dialogue.
///
/// `options` is owned by the frame: the parent hands a value in at push
/// time and the dialogue mutates it through typed round-trips, so no two
/// frames ever alias each other's state. `step` is a plain index into the
/// dialogue's declared steps, which is what lets a frame deserialized from
/// storage resume exactly where it left off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub dialog_id: String,
    pub step: usize,
    #[serde(default)]
    pub options: Value,
    /// The prompt this frame is suspended on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awaiting: Option<PromptRequest>,
}

impl StackFrame {
    pub fn new(dialog_id: impl Into<String>, options: Value) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            step: 0,
            options,
            awaiting: None,
        }
    }
}

/// The per-conversation stack of active dialogues.
///
/// The top frame is the innermost dialogue and the only one that receives
/// user input. An empty stack means no dialogue is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogStack {
    frames: Vec<StackFrame>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    /// Drops every frame. Used by cancellation.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
