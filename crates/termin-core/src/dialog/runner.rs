//! The dialogue stack runner.
//!
//! Drives one conversation turn at a time: resumes the suspended frame,
//! cascades through steps that finish synchronously and suspends again on
//! the next prompt. Dialogues never call each other directly; they return
//! a `StepAction` and the runner does the stack work.

use super::interceptor::CancelHelpInterceptor;
use super::stack::{DialogStack, StackFrame};
use super::step::{Dialog, StepAction, StepContext, TurnContext};
use crate::error::{Result, TerminError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Where a conversation stands after one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnStatus {
    /// No dialogue is active.
    Empty,
    /// A prompt went out; the stack waits for the next user message.
    Waiting,
    /// The root dialogue finished and returned this value.
    Complete(Option<Value>),
    /// The turn was intercepted and the stack unwound.
    Cancelled,
}

/// Executes dialogues against a conversation's stack.
///
/// The runner owns the dialogue registry and nothing else; all
/// per-conversation state lives in the `DialogStack` handed into each
/// call, so one runner serves any number of conversations.
pub struct DialogRunner {
    dialogs: HashMap<String, Arc<dyn Dialog>>,
    root_id: String,
    interceptor: Option<CancelHelpInterceptor>,
}

impl DialogRunner {
    pub fn builder() -> DialogRunnerBuilder {
        DialogRunnerBuilder::default()
    }

    /// Drives one conversation turn.
    ///
    /// Interception runs first, then the suspended dialogue resumes with
    /// this turn's input. When nothing is suspended, the root dialogue
    /// begins instead.
    ///
    /// # Arguments
    ///
    /// * `stack` - The conversation's dialogue stack
    /// * `turn` - The incoming user turn
    ///
    /// # Returns
    ///
    /// The stack's status after the turn
    pub async fn run(&self, stack: &mut DialogStack, turn: &TurnContext<'_>) -> Result<TurnStatus> {
        if let Some(interceptor) = &self.interceptor {
            if let Some(status) = interceptor.intercept(turn, stack).await? {
                return Ok(status);
            }
        }

        let status = self.continue_dialog(stack, turn).await?;
        if status == TurnStatus::Empty {
            return self
                .begin_dialog(stack, turn, &self.root_id, Value::Null)
                .await;
        }
        Ok(status)
    }

    /// Starts `dialog_id` on top of the stack and runs it until it
    /// suspends or finishes.
    ///
    /// # Errors
    ///
    /// `NotFound` when the dialogue is not registered. The stack is left
    /// untouched in that case.
    pub async fn begin_dialog(
        &self,
        stack: &mut DialogStack,
        turn: &TurnContext<'_>,
        dialog_id: &str,
        options: Value,
    ) -> Result<TurnStatus> {
        self.dialog(dialog_id)?;
        stack.push(StackFrame::new(dialog_id, options));
        tracing::debug!(target: "termin::dialog", dialog = dialog_id, depth = stack.depth(), "begin dialogue");
        self.run_stack(stack, turn, None).await
    }

    /// Resumes the suspended dialogue with the turn's input.
    ///
    /// A pending prompt consumes the utterance first: a usable answer
    /// advances the frame past the prompting step, an unusable one
    /// re-sends the prompt's retry line and stays suspended.
    ///
    /// # Returns
    ///
    /// `TurnStatus::Empty` when there is nothing to resume
    pub async fn continue_dialog(
        &self,
        stack: &mut DialogStack,
        turn: &TurnContext<'_>,
    ) -> Result<TurnStatus> {
        if stack.is_empty() {
            return Ok(TurnStatus::Empty);
        }

        let mut resumed = None;
        if let Some(frame) = stack.top_mut() {
            if let Some(prompt) = frame.awaiting.clone() {
                match prompt.parse_answer(turn.text()) {
                    Some(answer) => {
                        frame.awaiting = None;
                        frame.step += 1;
                        resumed = Some(answer);
                    }
                    None => {
                        tracing::debug!(target: "termin::dialog", dialog = %frame.dialog_id, "answer not usable, repeating prompt");
                        turn.send_activity(prompt.retry_activity()).await?;
                        return Ok(TurnStatus::Waiting);
                    }
                }
            }
        }

        self.run_stack(stack, turn, resumed).await
    }

    /// Cascades through steps until the turn suspends or the stack drains.
    async fn run_stack(
        &self,
        stack: &mut DialogStack,
        turn: &TurnContext<'_>,
        mut result: Option<Value>,
    ) -> Result<TurnStatus> {
        loop {
            let Some(frame) = stack.top() else {
                return Ok(TurnStatus::Empty);
            };
            let dialog_id = frame.dialog_id.clone();
            let step = frame.step;
            let dialog = self.dialog(&dialog_id)?;

            // Walking past the last step ends the dialogue with the
            // carried value, like an implicit End.
            let action = if step >= dialog.step_names().len() {
                StepAction::End(result.take())
            } else {
                let frame = self.top_mut(stack)?;
                let ctx = StepContext::new(turn, &mut frame.options, result.take());
                dialog.on_step(step, ctx).await?
            };

            match action {
                StepAction::Prompt(prompt) => {
                    tracing::debug!(target: "termin::dialog", dialog = %dialog_id, step, "suspending on prompt");
                    turn.send_activity(prompt.activity()).await?;
                    self.top_mut(stack)?.awaiting = Some(prompt);
                    return Ok(TurnStatus::Waiting);
                }
                StepAction::Next(value) => {
                    self.top_mut(stack)?.step += 1;
                    result = Some(value);
                }
                StepAction::Begin { dialog_id, options } => {
                    self.dialog(&dialog_id)?;
                    // The child's result is delivered to the step after
                    // the one that began it.
                    self.top_mut(stack)?.step += 1;
                    tracing::debug!(target: "termin::dialog", dialog = %dialog_id, depth = stack.depth() + 1, "begin child dialogue");
                    stack.push(StackFrame::new(dialog_id, options));
                    result = None;
                }
                StepAction::End(value) => {
                    stack.pop();
                    tracing::debug!(target: "termin::dialog", dialog = %dialog_id, has_result = value.is_some(), "dialogue ended");
                    if stack.is_empty() {
                        return Ok(TurnStatus::Complete(value));
                    }
                    result = Some(value.unwrap_or(Value::Null));
                }
                StepAction::Replace { dialog_id, options } => {
                    self.dialog(&dialog_id)?;
                    stack.pop();
                    tracing::debug!(target: "termin::dialog", dialog = %dialog_id, "replace dialogue");
                    stack.push(StackFrame::new(dialog_id, options));
                    result = None;
                }
            }
        }
    }

    fn dialog(&self, id: &str) -> Result<&Arc<dyn Dialog>> {
        self.dialogs
            .get(id)
            .ok_or_else(|| TerminError::not_found("dialog", id))
    }

    fn top_mut<'s>(&self, stack: &'s mut DialogStack) -> Result<&'s mut StackFrame> {
        stack
            .top_mut()
            .ok_or_else(|| TerminError::dialog("dialogue stack drained mid-turn"))
    }
}

/// Assembles a `DialogRunner`.
#[derive(Default)]
pub struct DialogRunnerBuilder {
    dialogs: HashMap<String, Arc<dyn Dialog>>,
    root_id: Option<String>,
    interceptor: Option<CancelHelpInterceptor>,
}

impl DialogRunnerBuilder {
    /// Registers a dialogue under its own id.
    pub fn register(mut self, dialog: impl Dialog + 'static) -> Self {
        self.dialogs.insert(dialog.id().to_string(), Arc::new(dialog));
        self
    }

    /// Sets the dialogue begun on a turn that finds an empty stack.
    pub fn root(mut self, dialog_id: impl Into<String>) -> Self {
        self.root_id = Some(dialog_id.into());
        self
    }

    /// Installs cancel/help interception.
    pub fn interceptor(mut self, interceptor: CancelHelpInterceptor) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Validates the assembly and builds the runner.
    ///
    /// # Errors
    ///
    /// `Config` when no root is set, the root is not registered, or a
    /// registered dialogue declares a dependency that is not registered.
    pub fn build(self) -> Result<DialogRunner> {
        let root_id = self
            .root_id
            .ok_or_else(|| TerminError::config("no root dialogue set"))?;
        if !self.dialogs.contains_key(&root_id) {
            return Err(TerminError::config(format!(
                "root dialogue '{root_id}' is not registered"
            )));
        }
        for dialog in self.dialogs.values() {
            for dependency in dialog.dependencies() {
                if !self.dialogs.contains_key(*dependency) {
                    return Err(TerminError::config(format!(
                        "dialogue '{}' requires '{}' which is not registered",
                        dialog.id(),
                        dependency
                    )));
                }
            }
        }
        Ok(DialogRunner {
            dialogs: self.dialogs,
            root_id,
            interceptor: self.interceptor,
        })
    }
}
