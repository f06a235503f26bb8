//! Bot assembly and the per-turn entry point.

use crate::appointment_dialog::AppointmentDialog;
use crate::date_resolver::DateResolverDialog;
use crate::main_dialog::{MAIN_DIALOG_ID, MainDialog};
use std::sync::Arc;
use termin_core::dialog::{CancelHelpInterceptor, DialogRunner, TurnContext, TurnStatus};
use termin_core::error::Result;
use termin_core::store::ConversationStore;
use termin_core::transport::Transport;
use termin_nlu::Recognizer;

/// The assembled appointment assistant.
///
/// Owns the dialogue registry and the state store; everything that
/// changes between turns travels through the store, so a single bot
/// value serves any number of conversations.
pub struct AppointmentBot {
    runner: DialogRunner,
    store: Arc<dyn ConversationStore>,
}

impl AppointmentBot {
    /// Wires the three dialogues to the runner.
    ///
    /// # Errors
    ///
    /// `Config` when the dialogue registry is inconsistent; that is an
    /// assembly bug, not a runtime condition.
    pub fn new(recognizer: Arc<dyn Recognizer>, store: Arc<dyn ConversationStore>) -> Result<Self> {
        let runner = DialogRunner::builder()
            .register(MainDialog::new(recognizer))
            .register(AppointmentDialog)
            .register(DateResolverDialog)
            .root(MAIN_DIALOG_ID)
            .interceptor(CancelHelpInterceptor::new())
            .build()?;
        Ok(Self { runner, store })
    }

    /// Runs one user turn for one conversation.
    ///
    /// Loads the conversation's stack, lets the runner act on the
    /// utterance and saves the stack back, suspended or not.
    ///
    /// # Arguments
    ///
    /// * `conversation_id` - Which conversation the utterance belongs to
    /// * `text` - The raw user utterance
    /// * `transport` - Channel for the bot's replies
    ///
    /// # Returns
    ///
    /// The stack's status after the turn
    pub async fn on_turn(
        &self,
        conversation_id: &str,
        text: &str,
        transport: &dyn Transport,
    ) -> Result<TurnStatus> {
        let mut state = self
            .store
            .load(conversation_id)
            .await?
            .unwrap_or_default();

        let turn = TurnContext::new(conversation_id, text, transport);
        let status = self.runner.run(&mut state.stack, &turn).await?;

        self.store.save(conversation_id, &state).await?;
        tracing::debug!(
            target: "termin::dialog",
            conversation = conversation_id,
            ?status,
            "turn finished"
        );
        Ok(status)
    }
}
