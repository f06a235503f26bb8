//! Clarification loop for appointment dates.
//!
//! The slot-filling dialogue hands over whatever date expression it has,
//! possibly none. This dialogue keeps asking until the user names a full
//! calendar day; partial answers like a bare weekday restart it.

use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use termin_core::dialog::{Dialog, PromptRequest, StepAction, StepContext};
use termin_core::error::{Result, TerminError};
use termin_core::timex::{is_ambiguous, parse_user_date};

pub const DATE_RESOLVER_DIALOG_ID: &str = "date_resolver";

const ASK_TEXT: &str = "An welchem Datum soll der Termin stattfinden?";
const CLARIFY_TEXT: &str =
    "Bitte nenne mir das genaue Datum mit Tag, Monat und Jahr, zum Beispiel 22.07.2020.";

/// Frame options for the resolver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateResolverOptions {
    /// Expression handed in by the caller, possibly partial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Set when a previous answer was rejected.
    #[serde(default)]
    pub retry: bool,
}

pub struct DateResolverDialog;

#[async_trait]
impl Dialog for DateResolverDialog {
    fn id(&self) -> &'static str {
        DATE_RESOLVER_DIALOG_ID
    }

    fn step_names(&self) -> &'static [&'static str] {
        &["ask", "resolve"]
    }

    async fn on_step(&self, step: usize, ctx: StepContext<'_>) -> Result<StepAction> {
        match step {
            0 => self.ask(ctx).await,
            1 => self.resolve(ctx).await,
            _ => Err(TerminError::dialog(format!(
                "date resolver has no step {step}"
            ))),
        }
    }
}

impl DateResolverDialog {
    /// A definite hint ends the dialogue without a single prompt.
    async fn ask(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        let options: DateResolverOptions = ctx.options_as()?;

        if let Some(date) = &options.date {
            if !is_ambiguous(date) {
                return Ok(StepAction::End(Some(Value::String(date.clone()))));
            }
        }

        // An ambiguous hint gets the clarification wording right away.
        let text = if options.retry || options.date.is_some() {
            CLARIFY_TEXT
        } else {
            ASK_TEXT
        };
        Ok(StepAction::Prompt(PromptRequest::text_prompt(text)))
    }

    async fn resolve(&self, ctx: StepContext<'_>) -> Result<StepAction> {
        let answer = ctx.result_text().unwrap_or_default();

        if let Some(expr) = parse_user_date(answer, Local::now().date_naive()) {
            if expr.is_definite() {
                return Ok(StepAction::End(Some(Value::String(
                    expr.timex().to_string(),
                ))));
            }
        }

        tracing::debug!(target: "termin::dialog", answer, "date answer is not definite, asking again");
        let options = DateResolverOptions {
            date: None,
            retry: true,
        };
        Ok(StepAction::replace(
            DATE_RESOLVER_DIALOG_ID,
            serde_json::to_value(options)?,
        ))
    }
}
