//! The recognizer seam between dialogues and the NLU service.

use crate::config::LuisConfig;
use crate::luis::LuisClient;
use crate::result::RecognizerResult;
use async_trait::async_trait;
use termin_core::error::{Result, TerminError};

/// External natural-language understanding, seen from the dialogues.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Whether calls to `recognize` can succeed at all.
    ///
    /// An unconfigured recognizer is not an error; the dialogues degrade
    /// to pure slot filling.
    fn is_configured(&self) -> bool;

    /// Runs intent and entity recognition on one utterance.
    ///
    /// # Errors
    ///
    /// Calling an unconfigured recognizer is an error, and so is any
    /// transport failure. There are no retries; a failed call fails the
    /// turn.
    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult>;
}

/// LUIS-backed recognizer for appointment utterances.
///
/// Construction never fails on missing settings: an incomplete
/// configuration just yields an unconfigured recognizer.
pub struct AppointmentRecognizer {
    client: Option<LuisClient>,
}

impl AppointmentRecognizer {
    /// Builds the recognizer from endpoint settings.
    ///
    /// # Errors
    ///
    /// Only when the settings are complete but the HTTP client cannot be
    /// constructed from them.
    pub fn new(config: &LuisConfig) -> Result<Self> {
        if !config.is_complete() {
            tracing::warn!(target: "termin::nlu", "recognizer not configured, running with slot filling only");
            return Ok(Self { client: None });
        }
        Ok(Self {
            client: Some(LuisClient::from_config(config)?),
        })
    }

    /// A recognizer that is never configured. Useful for hosts and tests
    /// that want the degraded path explicitly.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }
}

#[async_trait]
impl Recognizer for AppointmentRecognizer {
    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| TerminError::recognizer("recognizer is not configured"))?;
        let result = client.predict(utterance).await?;
        tracing::debug!(target: "termin::nlu", top_intent = result.top_intent(), "utterance recognized");
        Ok(result)
    }
}
