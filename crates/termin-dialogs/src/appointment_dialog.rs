//! Slot filling for one appointment request.
//!
//! Each step owns one slot: it either passes an already-filled value
//! through or prompts for it. The answer is captured at the start of the
//! following step, so a suspended conversation picks up exactly where it
//! stopped. Dates that do not pin down a calendar day are delegated to
//! the resolver dialogue before the user is asked to confirm.

use crate::date_resolver::{DATE_RESOLVER_DIALOG_ID, DateResolverOptions};
use async_trait::async_trait;
use serde_json::Value;
use termin_core::appointment::AppointmentRequest;
use termin_core::dialog::{Dialog, PromptRequest, StepAction, StepContext};
use termin_core::error::{Result, TerminError};
use termin_core::timex::is_ambiguous;

pub const APPOINTMENT_DIALOG_ID: &str = "appointment";

const PERSON_PROMPT: &str = "Mit wem möchtest du einen Termin haben?";
const TOPIC_PROMPT: &str = "Was ist der Betreff?";
const CONFIRM_RETRY: &str = "Bitte antworte mit Ja oder Nein.";

pub struct AppointmentDialog;

#[async_trait]
impl Dialog for AppointmentDialog {
    fn id(&self) -> &'static str {
        APPOINTMENT_DIALOG_ID
    }

    fn step_names(&self) -> &'static [&'static str] {
        &["person", "topic", "date", "confirm", "final"]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[DATE_RESOLVER_DIALOG_ID]
    }

    async fn on_step(&self, step: usize, ctx: StepContext<'_>) -> Result<StepAction> {
        match step {
            0 => self.person_step(ctx).await,
            1 => self.topic_step(ctx).await,
            2 => self.date_step(ctx).await,
            3 => self.confirm_step(ctx).await,
            4 => self.final_step(ctx).await,
            _ => Err(TerminError::dialog(format!(
                "appointment dialogue has no step {step}"
            ))),
        }
    }
}

impl AppointmentDialog {
    async fn person_step(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        let request: AppointmentRequest = ctx.options_as()?;
        match request.person {
            Some(person) => Ok(StepAction::Next(Value::String(person))),
            None => Ok(StepAction::Prompt(PromptRequest::text_prompt(
                PERSON_PROMPT,
            ))),
        }
    }

    async fn topic_step(&self, mut ctx: StepContext<'_>) -> Result<StepAction> {
        let mut request: AppointmentRequest = ctx.options_as()?;

        // The previous step hands over either its prompt answer or the
        // value it skipped with.
        if let Some(person) = ctx.result_text() {
            request.person = Some(person.to_string());
        }
        ctx.set_options(&request)?;

        match request.topic {
            Some(topic) => Ok(StepAction::Next(Value::String(topic))),
            None => Ok(StepAction::Prompt(PromptRequest::text_prompt(TOPIC_PROMPT))),
        }
    }

    async fn date_step(&self, mut ctx: StepContext<'_>) -> Result<StepAction> {
        let mut request: AppointmentRequest = ctx.options_as()?;

        if let Some(topic) = ctx.result_text() {
            request.topic = Some(topic.to_string());
        }
        ctx.set_options(&request)?;

        match request.date {
            Some(date) if !is_ambiguous(&date) => Ok(StepAction::Next(Value::String(date))),
            hint => {
                let options = DateResolverOptions {
                    date: hint,
                    retry: false,
                };
                Ok(StepAction::begin(
                    DATE_RESOLVER_DIALOG_ID,
                    serde_json::to_value(options)?,
                ))
            }
        }
    }

    async fn confirm_step(&self, mut ctx: StepContext<'_>) -> Result<StepAction> {
        let mut request: AppointmentRequest = ctx.options_as()?;

        if let Some(date) = ctx.result_text() {
            request.date = Some(date.to_string());
        }
        ctx.set_options(&request)?;

        let text = format!(
            "Ich habe einen Terminvorschlag für {} zum Thema {} am {}. Ist das richtig?",
            request.person.as_deref().unwrap_or_default(),
            request.topic.as_deref().unwrap_or_default(),
            request.date.as_deref().unwrap_or_default(),
        );
        Ok(StepAction::Prompt(PromptRequest::confirm(
            text,
            CONFIRM_RETRY,
        )))
    }

    /// Only an affirmed request leaves this dialogue; a rejection ends
    /// with no result so the caller restarts cleanly.
    async fn final_step(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        if ctx.result_bool() == Some(true) {
            let request: AppointmentRequest = ctx.options_as()?;
            tracing::debug!(
                target: "termin::dialog",
                complete = request.is_complete(),
                "appointment request confirmed"
            );
            return Ok(StepAction::End(Some(serde_json::to_value(&request)?)));
        }
        Ok(StepAction::End(None))
    }
}
