use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use termin_core::dialog::{CANCEL_TEXT, HELP_TEXT, TurnStatus};
use termin_core::error::{Result, TerminError};
use termin_core::store::{ConversationStore, MemoryConversationStore};
use termin_core::transport::{Activity, Transport};
use termin_dialogs::{AppointmentBot, CREATE_APPOINTMENT_INTENT, GET_WEATHER_INTENT};
use termin_nlu::{IntentScore, Recognizer, RecognizerResult};

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
    /// Takes everything sent since the last call, as plain text.
    fn drain_texts(&self) -> Vec<String> {
        std::mem::take(&mut *self.sent.lock().unwrap())
            .into_iter()
            .map(|activity| activity.text)
            .collect()
    }
}

// Mock Recognizer for testing
struct ScriptedRecognizer {
    configured: bool,
    responses: Mutex<Vec<RecognizerResult>>,
}

impl ScriptedRecognizer {
    fn unconfigured() -> Self {
        Self {
            configured: false,
            responses: Mutex::new(Vec::new()),
        }
    }

    fn with_responses(responses: Vec<RecognizerResult>) -> Self {
        Self {
            configured: true,
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait::async_trait]
impl Recognizer for ScriptedRecognizer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn recognize(&self, _utterance: &str) -> Result<RecognizerResult> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(TerminError::recognizer("no scripted response left"));
        }
        Ok(responses.remove(0))
    }
}

fn bot_with(recognizer: ScriptedRecognizer) -> (AppointmentBot, Arc<MemoryConversationStore>) {
    let store = Arc::new(MemoryConversationStore::new());
    let bot = AppointmentBot::new(Arc::new(recognizer), store.clone())
        .expect("Should assemble the bot");
    (bot, store)
}

fn intent_only(intent: &str) -> RecognizerResult {
    RecognizerResult {
        text: String::new(),
        intents: HashMap::from([(intent.to_string(), IntentScore { score: 0.9 })]),
        entities: Value::Null,
    }
}

/// A recognition result the way LUIS v3 reports a fully understood
/// appointment utterance.
fn appointment_result(person: &str, mention: &str, topic: &str, timex: &str) -> RecognizerResult {
    RecognizerResult {
        text: String::new(),
        intents: HashMap::from([(
            CREATE_APPOINTMENT_INTENT.to_string(),
            IntentScore { score: 0.97 },
        )]),
        entities: json!({
            "mit": [{"Person": [[person]]}],
            "zum": [{"Thema": [[topic]]}],
            "datetime": [{"type": "date", "timex": [timex]}],
            "$instance": {
                "mit": [{"text": mention}],
                "zum": [{"text": topic}]
            }
        }),
    }
}

#[tokio::test]
async fn test_happy_path_prefills_every_slot() {
    let transport = RecordingTransport::default();
    let recognizer = ScriptedRecognizer::with_responses(vec![appointment_result(
        "Reichelt",
        "Prof. Reichelt",
        "BPA",
        "2020-07-22",
    )]);
    let (bot, _store) = bot_with(recognizer);

    // Opening turn: only the greeting goes out.
    let status = bot.on_turn("c1", "hallo", &transport).await.unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Wie kann ich dir helfen?"));

    // The one-shot utterance fills every slot, so the only reply is the
    // confirmation question.
    let status = bot
        .on_turn(
            "c1",
            "Termin mit Reichelt zum Thema BPA am 22. Juli 2020",
            &transport,
        )
        .await
        .unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1, "no slot prompts expected: {texts:?}");
    assert!(texts[0].contains("Reichelt"));
    assert!(texts[0].contains("BPA"));
    assert!(texts[0].contains("2020-07-22"));

    // Affirmation: the proposal announcement plus the restart prompt.
    let status = bot.on_turn("c1", "ja", &transport).await.unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("Reichelt"));
    assert!(texts[0].contains("BPA"));
    assert!(texts[0].contains("am 22. Juli 2020"));
    assert!(texts[0].ends_with("erstellt."));
    assert_eq!(texts[1], "Was kann ich noch für dich tun?");
}

#[tokio::test]
async fn test_unconfigured_recognizer_walks_every_slot() {
    let transport = RecordingTransport::default();
    let (bot, _store) = bot_with(ScriptedRecognizer::unconfigured());

    bot.on_turn("c1", "hallo", &transport).await.unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("nicht konfiguriert"));
    assert_eq!(texts[1], "Mit wem möchtest du einen Termin haben?");

    bot.on_turn("c1", "Reichelt", &transport).await.unwrap();
    assert_eq!(transport.drain_texts(), vec!["Was ist der Betreff?"]);

    bot.on_turn("c1", "BPA", &transport).await.unwrap();
    assert_eq!(
        transport.drain_texts(),
        vec!["An welchem Datum soll der Termin stattfinden?"]
    );

    bot.on_turn("c1", "22.07.2020", &transport).await.unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Reichelt"));
    assert!(texts[0].contains("BPA"));
    assert!(texts[0].contains("2020-07-22"));

    let status = bot.on_turn("c1", "ja", &transport).await.unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    // Proposal, then the restarted loop: notice and first slot prompt.
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("am 22. Juli 2020"));
    assert!(texts[1].contains("nicht konfiguriert"));
    assert_eq!(texts[2], "Mit wem möchtest du einen Termin haben?");
}

#[tokio::test]
async fn test_ambiguous_date_is_clarified_before_confirmation() {
    let transport = RecordingTransport::default();
    let recognizer = ScriptedRecognizer::with_responses(vec![appointment_result(
        "Reichelt",
        "Prof. Reichelt",
        "BPA",
        "XXXX-WXX-3",
    )]);
    let (bot, _store) = bot_with(recognizer);

    bot.on_turn("c1", "hallo", &transport).await.unwrap();
    transport.drain_texts();

    // Person and topic resolve, the weekday does not pin down a day: the
    // resolver asks for the full date instead of confirming.
    bot.on_turn("c1", "Termin mit Reichelt zum Thema BPA am Mittwoch", &transport)
        .await
        .unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Tag, Monat und Jahr"));

    // Another bare weekday is rejected again.
    bot.on_turn("c1", "Mittwoch", &transport).await.unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Tag, Monat und Jahr"));

    // A full date ends the loop on the spot.
    bot.on_turn("c1", "22.07.2020", &transport).await.unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("2020-07-22"));
    assert!(texts[0].contains("Ist das richtig?"));
}

#[tokio::test]
async fn test_cancel_mid_flow_empties_the_stack() {
    let answers = ["Reichelt", "BPA", "22.07.2020"];

    // Cancel while the person, topic, date and confirm prompts are
    // pending, one conversation each.
    for answered in 0..=3 {
        let transport = RecordingTransport::default();
        let (bot, store) = bot_with(ScriptedRecognizer::unconfigured());
        let conversation = format!("cancel-{answered}");

        bot.on_turn(&conversation, "hallo", &transport).await.unwrap();
        for answer in answers.iter().take(answered) {
            bot.on_turn(&conversation, answer, &transport).await.unwrap();
        }
        transport.drain_texts();

        let status = bot
            .on_turn(&conversation, "abbrechen", &transport)
            .await
            .unwrap();
        assert_eq!(status, TurnStatus::Cancelled);
        assert_eq!(transport.drain_texts(), vec![CANCEL_TEXT.to_string()]);

        let state = store.load(&conversation).await.unwrap().unwrap();
        assert!(
            state.stack.is_empty(),
            "stack should be empty after cancelling with {answered} slots answered"
        );
    }
}

#[tokio::test]
async fn test_rejection_at_confirm_produces_no_proposal() {
    let transport = RecordingTransport::default();
    let (bot, _store) = bot_with(ScriptedRecognizer::unconfigured());
    let mut transcript = Vec::new();

    for text in ["hallo", "Reichelt", "BPA", "22.07.2020"] {
        bot.on_turn("c1", text, &transport).await.unwrap();
        transcript.extend(transport.drain_texts());
    }

    let status = bot.on_turn("c1", "nein", &transport).await.unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    transcript.extend(texts.clone());

    // The loop restarts with slot filling; no proposal was announced.
    assert_eq!(texts.last().map(String::as_str), Some("Mit wem möchtest du einen Termin haben?"));
    assert!(
        transcript.iter().all(|text| !text.contains("erstellt")),
        "rejected request must not produce a proposal: {transcript:?}"
    );
}

#[tokio::test]
async fn test_restart_uses_the_follow_up_greeting() {
    let transport = RecordingTransport::default();
    let utterance = "Termin mit Reichelt zum Thema BPA am 22. Juli 2020";
    let recognizer = ScriptedRecognizer::with_responses(vec![
        appointment_result("Reichelt", "Prof. Reichelt", "BPA", "2020-07-22"),
        appointment_result("Reichelt", "Prof. Reichelt", "BPA", "2020-07-22"),
    ]);
    let (bot, store) = bot_with(recognizer);

    // First cycle.
    bot.on_turn("c1", "hallo", &transport).await.unwrap();
    assert!(transport.drain_texts()[0].starts_with("Wie kann ich dir helfen?"));
    bot.on_turn("c1", utterance, &transport).await.unwrap();
    transport.drain_texts();
    bot.on_turn("c1", "ja", &transport).await.unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.last().map(String::as_str), Some("Was kann ich noch für dich tun?"));

    // Second cycle runs off the restart prompt, not a fresh greeting.
    bot.on_turn("c1", utterance, &transport).await.unwrap();
    transport.drain_texts();
    let status = bot.on_turn("c1", "ja", &transport).await.unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    assert!(texts[0].contains("erstellt"));
    assert_eq!(texts.last().map(String::as_str), Some("Was kann ich noch für dich tun?"));

    // No frames pile up across cycles: just the waiting orchestrator.
    let state = store.load("c1").await.unwrap().unwrap();
    assert_eq!(state.stack.depth(), 1);
}

#[tokio::test]
async fn test_help_keeps_the_pending_prompt_answerable() {
    let transport = RecordingTransport::default();
    let (bot, _store) = bot_with(ScriptedRecognizer::unconfigured());

    bot.on_turn("c1", "hallo", &transport).await.unwrap();
    transport.drain_texts();

    let status = bot.on_turn("c1", "hilfe", &transport).await.unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    assert_eq!(transport.drain_texts(), vec![HELP_TEXT.to_string()]);

    // The person prompt is still the one being answered.
    bot.on_turn("c1", "Reichelt", &transport).await.unwrap();
    assert_eq!(transport.drain_texts(), vec!["Was ist der Betreff?"]);
}

#[tokio::test]
async fn test_weather_intent_reports_unsupported() {
    let transport = RecordingTransport::default();
    let recognizer = ScriptedRecognizer::with_responses(vec![intent_only(GET_WEATHER_INTENT)]);
    let (bot, _store) = bot_with(recognizer);

    bot.on_turn("c1", "hallo", &transport).await.unwrap();
    transport.drain_texts();

    let status = bot
        .on_turn("c1", "Wie wird das Wetter morgen?", &transport)
        .await
        .unwrap();
    assert_eq!(status, TurnStatus::Waiting);
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("Wettervorhersagen"));
    assert_eq!(texts[1], "Was kann ich noch für dich tun?");
}

#[tokio::test]
async fn test_unresolved_person_mention_warns_and_asks() {
    let transport = RecordingTransport::default();
    let unresolved = RecognizerResult {
        text: String::new(),
        intents: HashMap::from([(
            CREATE_APPOINTMENT_INTENT.to_string(),
            IntentScore { score: 0.91 },
        )]),
        entities: json!({
            "mit": [{}],
            "zum": [{"Thema": [["BPA"]]}],
            "datetime": [{"type": "date", "timex": ["2020-07-22"]}],
            "$instance": {
                "mit": [{"text": "Dr. Unbekannt"}]
            }
        }),
    };
    let (bot, _store) = bot_with(ScriptedRecognizer::with_responses(vec![unresolved]));

    bot.on_turn("c1", "hallo", &transport).await.unwrap();
    transport.drain_texts();

    // The model saw a person it could not resolve: warn, then ask.
    bot.on_turn("c1", "Termin mit Dr. Unbekannt zum Thema BPA am 22.07.2020", &transport)
        .await
        .unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].contains("kenne diese Person nicht"));
    assert!(texts[0].contains("Dr. Unbekannt"));
    assert_eq!(texts[1], "Mit wem möchtest du einen Termin haben?");

    // Topic and date were resolved, so the direct answer goes straight
    // to confirmation.
    bot.on_turn("c1", "Olaf", &transport).await.unwrap();
    let texts = transport.drain_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Olaf"));
    assert!(texts[0].contains("BPA"));
}

#[tokio::test]
async fn test_recognizer_failure_surfaces_as_turn_error() {
    let transport = RecordingTransport::default();
    // Configured but with nothing scripted: the first recognition fails.
    let (bot, _store) = bot_with(ScriptedRecognizer::with_responses(Vec::new()));

    bot.on_turn("c1", "hallo", &transport).await.unwrap();

    let err = bot
        .on_turn("c1", "Termin mit Reichelt", &transport)
        .await
        .unwrap_err();
    assert!(err.is_recognizer(), "unexpected error: {err}");
}
