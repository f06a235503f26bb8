//! LUIS v3 prediction client.
//!
//! Speaks to the published production slot of one LUIS application. The
//! service itself stays external; this client only maps its wire shape
//! onto `RecognizerResult`.

use crate::config::LuisConfig;
use crate::result::{IntentScore, RecognizerResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use termin_core::error::{Result, TerminError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one LUIS application's prediction slot.
#[derive(Clone)]
pub struct LuisClient {
    client: Client,
    endpoint: String,
    app_id: String,
    api_key: String,
}

impl LuisClient {
    /// Builds a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// `Config` when one of the three settings is missing, `Recognizer`
    /// when the HTTP client cannot be constructed.
    pub fn from_config(config: &LuisConfig) -> Result<Self> {
        let endpoint = config
            .endpoint()
            .ok_or_else(|| TerminError::config("LUIS host name is not set"))?;
        let app_id = config
            .app_id
            .clone()
            .ok_or_else(|| TerminError::config("LUIS application id is not set"))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TerminError::config("LUIS API key is not set"))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| TerminError::recognizer(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint,
            app_id,
            api_key,
        })
    }

    /// Calls the prediction endpoint for one utterance.
    ///
    /// No retries here: a failed call fails the whole turn.
    pub async fn predict(&self, utterance: &str) -> Result<RecognizerResult> {
        let url = format!(
            "{}/luis/prediction/v3.0/apps/{}/slots/production/predict",
            self.endpoint, self.app_id
        );
        tracing::debug!(target: "termin::nlu", app_id = %self.app_id, "calling prediction endpoint");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", utterance),
                ("subscription-key", self.api_key.as_str()),
                ("verbose", "true"),
                ("show-all-intents", "true"),
                ("log", "false"),
            ])
            .send()
            .await
            .map_err(|err| TerminError::recognizer(format!("LUIS request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(TerminError::recognizer(format!(
                "LUIS returned {status}: {body}"
            )));
        }

        let parsed: PredictionResponse = response.json().await.map_err(|err| {
            TerminError::recognizer(format!("failed to parse LUIS response: {err}"))
        })?;
        Ok(parsed.into_result(utterance))
    }
}

#[derive(Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    query: Option<String>,
    prediction: Prediction,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(default)]
    intents: HashMap<String, IntentScore>,
    #[serde(default)]
    entities: Value,
}

impl PredictionResponse {
    fn into_result(self, utterance: &str) -> RecognizerResult {
        RecognizerResult {
            text: self.query.unwrap_or_else(|| utterance.to_string()),
            intents: self.prediction.intents,
            entities: self.prediction.entities,
        }
    }
}
