//! Conversation state persistence.

use crate::dialog::DialogStack;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Everything the engine remembers about one conversation between turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub stack: DialogStack,
}

/// Storage interface for conversation state.
///
/// State is loaded at the start of a turn and saved after it; the engine
/// holds nothing in between, so any backend that can round-trip the serde
/// representation works.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Loads the state for a conversation.
    ///
    /// # Arguments
    ///
    /// * `conversation_id` - The conversation ID
    ///
    /// # Returns
    ///
    /// The stored state, `None` for a conversation seen for the first time
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>>;

    /// Persists the state for a conversation.
    ///
    /// # Arguments
    ///
    /// * `conversation_id` - The conversation ID
    /// * `state` - The state after the turn
    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()>;
}

/// In-memory reference store. State lives exactly as long as the process.
#[derive(Default)]
pub struct MemoryConversationStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>> {
        let states = self.states.read().await;
        Ok(states.get(conversation_id).cloned())
    }

    async fn save(&self, conversation_id: &str, state: &ConversationState) -> Result<()> {
        let mut states = self.states.write().await;
        states.insert(conversation_id.to_string(), state.clone());
        Ok(())
    }
}
