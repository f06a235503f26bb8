//! Step execution contract between dialogues and the runner.

use super::prompt::PromptRequest;
use crate::error::Result;
use crate::transport::{Activity, Transport};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One incoming user turn.
///
/// Bundles the raw utterance with the channel used to answer it. The
/// runner threads this through every step executed during the turn.
pub struct TurnContext<'a> {
    conversation_id: &'a str,
    text: &'a str,
    transport: &'a dyn Transport,
}

impl<'a> TurnContext<'a> {
    pub fn new(conversation_id: &'a str, text: &'a str, transport: &'a dyn Transport) -> Self {
        Self {
            conversation_id,
            text,
            transport,
        }
    }

    pub fn conversation_id(&self) -> &str {
        self.conversation_id
    }

    /// The raw utterance of this turn.
    pub fn text(&self) -> &str {
        self.text
    }

    pub async fn send_activity(&self, activity: Activity) -> Result<()> {
        self.transport.send_activity(activity).await
    }

    /// Sends a plain informational line.
    pub async fn send_notice(&self, text: impl Into<String>) -> Result<()> {
        self.send_activity(Activity::notice(text)).await
    }
}

/// What a dialogue sees while one of its steps runs.
///
/// Options belong to the frame and are edited through typed round-trips;
/// the result slot carries whatever the previous step or a returning child
/// dialogue produced.
pub struct StepContext<'a> {
    turn: &'a TurnContext<'a>,
    options: &'a mut Value,
    result: Option<Value>,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(
        turn: &'a TurnContext<'a>,
        options: &'a mut Value,
        result: Option<Value>,
    ) -> Self {
        Self {
            turn,
            options,
            result,
        }
    }

    pub fn turn(&self) -> &TurnContext<'a> {
        self.turn
    }

    /// Typed view of the frame options. `Null` reads as the default.
    pub fn options_as<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.options.is_null() {
            return Ok(T::default());
        }
        serde_json::from_value(self.options.clone()).map_err(Into::into)
    }

    /// Writes the frame options back.
    pub fn set_options<T: Serialize>(&mut self, options: &T) -> Result<()> {
        *self.options = serde_json::to_value(options)?;
        Ok(())
    }

    /// The raw value handed to this step, if any.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Typed view of the handed-over value. `Null` reads as absent.
    pub fn result_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.result {
            Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value.clone())?)),
            _ => Ok(None),
        }
    }

    /// The handed-over value as text, for prompt answers.
    pub fn result_text(&self) -> Option<&str> {
        self.result.as_ref().and_then(Value::as_str)
    }

    /// The handed-over value as a confirmation outcome.
    pub fn result_bool(&self) -> Option<bool> {
        self.result.as_ref().and_then(Value::as_bool)
    }

    pub async fn send_activity(&self, activity: Activity) -> Result<()> {
        self.turn.send_activity(activity).await
    }

    pub async fn send_notice(&self, text: impl Into<String>) -> Result<()> {
        self.turn.send_notice(text).await
    }
}

/// What a step decided to do with the turn.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Suspend the turn and wait for the user's answer to this prompt.
    Prompt(PromptRequest),
    /// Continue with the next step in the same turn, handing it a value.
    Next(Value),
    /// Push a child dialogue; its result arrives at the following step.
    Begin { dialog_id: String, options: Value },
    /// Finish this dialogue, returning a value to the parent.
    End(Option<Value>),
    /// Restart as `dialog_id` (possibly this dialogue) from its first step.
    Replace { dialog_id: String, options: Value },
}

impl StepAction {
    /// Convenience for `Begin` with owned ids built from constants.
    pub fn begin(dialog_id: impl Into<String>, options: Value) -> Self {
        Self::Begin {
            dialog_id: dialog_id.into(),
            options,
        }
    }

    /// Convenience for `Replace` with owned ids built from constants.
    pub fn replace(dialog_id: impl Into<String>, options: Value) -> Self {
        Self::Replace {
            dialog_id: dialog_id.into(),
            options,
        }
    }
}

/// A dialogue: an ordered list of named steps executed by the runner.
///
/// Implementations hold no per-conversation state; everything mutable
/// lives in the frame options. That keeps a dialogue resumable from a
/// deserialized stack, where the only record of progress is a step index.
#[async_trait]
pub trait Dialog: Send + Sync {
    /// Stable identifier recorded on stack frames.
    fn id(&self) -> &'static str;

    /// Ordered step names. Descriptive only; dispatch happens by index.
    fn step_names(&self) -> &'static [&'static str];

    /// Dialogues this one begins or replaces into.
    ///
    /// Checked at assembly time so a missing registration fails fast
    /// instead of surfacing mid-conversation.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    /// Runs one step.
    ///
    /// # Arguments
    ///
    /// * `step` - Index into `step_names()`
    /// * `ctx` - Turn input, frame options and the previous step's result
    ///
    /// # Returns
    ///
    /// The action the runner should take next
    async fn on_step(&self, step: usize, ctx: StepContext<'_>) -> Result<StepAction>;
}
