//! The orchestrator dialogue one conversation lives in.
//!
//! Its waterfall greets, hands the utterance to the recognizer, starts
//! the slot-filling dialogue with whatever was understood and announces
//! the proposal once the user confirmed. The last step replaces the
//! dialogue with itself, so a conversation never leaves this loop.

use crate::appointment_dialog::APPOINTMENT_DIALOG_ID;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use termin_core::appointment::AppointmentRequest;
use termin_core::dialog::{Dialog, PromptRequest, StepAction, StepContext};
use termin_core::error::{Result, TerminError};
use termin_core::timex::TimexExpression;
use termin_nlu::{Recognizer, appointment_date, person_entities, topic_entities};

pub const MAIN_DIALOG_ID: &str = "main";

/// Intent names as trained in the LUIS model.
pub const CREATE_APPOINTMENT_INTENT: &str = "TerminMachen";
pub const GET_WEATHER_INTENT: &str = "GetWeather";

const GREETING: &str = "Wie kann ich dir helfen?\nTippe z.B. sowas wie \"Termin mit Prof. Reichelt zum Thema BPA am 22. Juli 2020\"";
const RESTART_PROMPT: &str = "Was kann ich noch für dich tun?";
const UNCONFIGURED_NOTICE: &str = "Hinweis: Die Spracherkennung ist nicht konfiguriert. \
     Setze LUIS_APP_ID, LUIS_API_KEY und LUIS_API_HOST_NAME, damit ich freie Sätze verstehe.";
const WEATHER_STUB_TEXT: &str = "Wettervorhersagen kann ich leider noch nicht.";

/// Frame options for the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainDialogOptions {
    /// Replaces the first greeting on repeat passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_msg: Option<String>,
}

pub struct MainDialog {
    recognizer: Arc<dyn Recognizer>,
}

#[async_trait]
impl Dialog for MainDialog {
    fn id(&self) -> &'static str {
        MAIN_DIALOG_ID
    }

    fn step_names(&self) -> &'static [&'static str] {
        &["intro", "act", "final"]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[APPOINTMENT_DIALOG_ID]
    }

    async fn on_step(&self, step: usize, ctx: StepContext<'_>) -> Result<StepAction> {
        match step {
            0 => self.intro_step(ctx).await,
            1 => self.act_step(ctx).await,
            2 => self.final_step(ctx).await,
            _ => Err(TerminError::dialog(format!(
                "main dialogue has no step {step}"
            ))),
        }
    }
}

impl MainDialog {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self { recognizer }
    }

    /// Greets and asks for a free-form utterance. Without a recognizer
    /// there is nothing to parse it with, so the step only leaves a
    /// notice and falls through to plain slot filling.
    async fn intro_step(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        if !self.recognizer.is_configured() {
            ctx.send_notice(UNCONFIGURED_NOTICE).await?;
            return Ok(StepAction::Next(Value::Null));
        }

        let options: MainDialogOptions = ctx.options_as()?;
        let text = options.restart_msg.unwrap_or_else(|| GREETING.to_string());
        Ok(StepAction::Prompt(PromptRequest::text_prompt(text)))
    }

    /// Runs recognition on the answer and branches on the intent.
    async fn act_step(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        if !self.recognizer.is_configured() {
            return Ok(StepAction::begin(
                APPOINTMENT_DIALOG_ID,
                serde_json::to_value(AppointmentRequest::new())?,
            ));
        }

        let utterance = ctx.result_text().unwrap_or_else(|| ctx.turn().text());
        let result = self.recognizer.recognize(utterance).await?;

        match result.top_intent() {
            CREATE_APPOINTMENT_INTENT => {
                let persons = person_entities(&result);
                let topics = topic_entities(&result);

                // A person the model saw but could not resolve stays an
                // empty slot; the user is told why they are asked again.
                if persons.has_unresolved_mention() {
                    let warning = format!(
                        "Sorry, aber ich kenne diese Person nicht: {}",
                        persons.mentions.join(", ")
                    );
                    ctx.send_notice(warning).await?;
                }

                let request = AppointmentRequest {
                    person: persons.best().map(str::to_string),
                    topic: topics.best().map(str::to_string),
                    date: appointment_date(&result),
                };
                tracing::debug!(
                    target: "termin::dialog",
                    ?request,
                    "recognizer understood an appointment request"
                );
                Ok(StepAction::begin(
                    APPOINTMENT_DIALOG_ID,
                    serde_json::to_value(&request)?,
                ))
            }
            GET_WEATHER_INTENT => {
                ctx.send_notice(WEATHER_STUB_TEXT).await?;
                Ok(StepAction::Next(Value::Null))
            }
            other => {
                let text = format!(
                    "Sorry, das habe ich nicht verstanden. Versuche deinen Satz auf eine andere Weise zu formulieren (bei dir war {other})."
                );
                ctx.send_notice(text).await?;
                Ok(StepAction::Next(Value::Null))
            }
        }
    }

    /// Announces a confirmed proposal and restarts the waterfall. The
    /// date is rendered relative to today, so "morgen" stays "morgen".
    async fn final_step(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        if let Some(request) = ctx.result_as::<AppointmentRequest>()? {
            let date = request.date.as_deref().unwrap_or_default();
            let when = match TimexExpression::parse(date) {
                Ok(expr) => expr.to_natural_language(Local::now().date_naive()),
                Err(_) => format!("am {date}"),
            };
            let text = format!(
                "Ich habe einen Terminvorschlag mit {} zum Thema {} {} erstellt.",
                request.person.as_deref().unwrap_or_default(),
                request.topic.as_deref().unwrap_or_default(),
                when,
            );
            ctx.send_notice(text).await?;
        }

        let options = MainDialogOptions {
            restart_msg: Some(RESTART_PROMPT.to_string()),
        };
        Ok(StepAction::replace(
            MAIN_DIALOG_ID,
            serde_json::to_value(options)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment_dialog::AppointmentDialog;
    use crate::date_resolver::DateResolverDialog;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use termin_core::dialog::{DialogRunner, DialogStack, TurnContext, TurnStatus};
    use termin_core::transport::{Activity, Transport};
    use termin_nlu::{IntentScore, RecognizerResult};

    // Mock Transport for testing
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Activity>>,
    }

    #[async_trait::async_trait]
    impl Transport for RecordingTransport {
        async fn send_activity(&self, activity: Activity) -> Result<()> {
            self.sent.lock().unwrap().push(activity);
            Ok(())
        }
    }

    impl RecordingTransport {
        fn texts(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|activity| activity.text.clone())
                .collect()
        }
    }

    // Mock Recognizer for testing
    struct CannedRecognizer {
        configured: bool,
        result: Mutex<Option<RecognizerResult>>,
    }

    #[async_trait::async_trait]
    impl Recognizer for CannedRecognizer {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn recognize(&self, _utterance: &str) -> Result<RecognizerResult> {
            self.result
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| TerminError::recognizer("no canned result left"))
        }
    }

    fn runner(recognizer: CannedRecognizer) -> DialogRunner {
        DialogRunner::builder()
            .register(MainDialog::new(Arc::new(recognizer)))
            .register(AppointmentDialog)
            .register(DateResolverDialog)
            .root(MAIN_DIALOG_ID)
            .build()
            .unwrap()
    }

    fn intent_result(intent: &str) -> RecognizerResult {
        RecognizerResult {
            text: String::new(),
            intents: HashMap::from([(intent.to_string(), IntentScore { score: 0.9 })]),
            entities: Value::Null,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_intro_degrades_to_slot_filling() {
        let transport = RecordingTransport::default();
        let turn = TurnContext::new("c1", "hallo", &transport);
        let mut stack = DialogStack::new();
        let recognizer = CannedRecognizer {
            configured: false,
            result: Mutex::new(None),
        };

        let status = runner(recognizer).run(&mut stack, &turn).await.unwrap();

        assert_eq!(status, TurnStatus::Waiting);
        let texts = transport.texts();
        assert!(texts[0].contains("nicht konfiguriert"));
        assert_eq!(texts[1], "Mit wem möchtest du einen Termin haben?");
    }

    #[tokio::test]
    async fn test_unknown_intent_is_reported_and_the_loop_restarts() {
        let transport = RecordingTransport::default();
        let mut stack = DialogStack::new();
        let recognizer = CannedRecognizer {
            configured: true,
            result: Mutex::new(Some(intent_result("None"))),
        };
        let runner = runner(recognizer);

        let hello = TurnContext::new("c1", "hallo", &transport);
        let status = runner.run(&mut stack, &hello).await.unwrap();
        assert_eq!(status, TurnStatus::Waiting);
        assert_eq!(transport.texts()[0], GREETING);

        let nonsense = TurnContext::new("c1", "blubb", &transport);
        let status = runner.run(&mut stack, &nonsense).await.unwrap();
        assert_eq!(status, TurnStatus::Waiting);

        let texts = transport.texts();
        assert!(texts[1].contains("nicht verstanden"));
        assert!(texts[1].contains("None"));
        // The waterfall replaced itself and prompts with the restart line.
        assert_eq!(texts[2], RESTART_PROMPT);
        assert_eq!(stack.depth(), 1);
    }
}
