//! Outgoing message channel between dialogues and the host.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How the channel should treat the user after an activity was delivered.
///
/// Mirrors the hints a voice-capable channel needs: a prompt expects an
/// answer, a notice does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputHint {
    /// The bot is waiting for the user's answer to this activity.
    ExpectingInput,
    /// Informational output, no answer expected.
    IgnoringInput,
}

/// A single outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Display text.
    pub text: String,
    /// Spoken rendition for voice channels. Prompts duplicate `text` here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
    pub input_hint: InputHint,
}

impl Activity {
    /// Creates a plain notice that does not expect an answer.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speak: None,
            input_hint: InputHint::IgnoringInput,
        }
    }

    /// Creates a prompt activity. The text doubles as the spoken form.
    pub fn prompt(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            speak: Some(text.clone()),
            text,
            input_hint: InputHint::ExpectingInput,
        }
    }
}

/// Delivery channel for outgoing activities.
///
/// The engine never cares where activities end up. The console host prints
/// them; tests record them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one activity to the user.
    ///
    /// # Arguments
    ///
    /// * `activity` - The activity to deliver
    ///
    /// # Returns
    ///
    /// `Ok(())` on delivery, a `Transport` error otherwise
    async fn send_activity(&self, activity: Activity) -> Result<()>;
}
