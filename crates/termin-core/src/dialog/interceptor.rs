//! Turn interception for cancel and help utterances.

use super::runner::TurnStatus;
use super::stack::DialogStack;
use super::step::TurnContext;
use crate::error::Result;
use crate::transport::Activity;

const CANCEL_WORDS: [&str; 4] = ["cancel", "quit", "abbrechen", "abbruch"];
const HELP_WORDS: [&str; 3] = ["help", "?", "hilfe"];

pub const HELP_TEXT: &str = "Ich helfe dir dabei, Termine zu vereinbaren. Sag mir einfach, \
     mit wem, zu welchem Thema und an welchem Tag du einen Termin möchtest. \
     Mit \"abbrechen\" beendest du den aktuellen Vorgang.";
pub const CANCEL_TEXT: &str = "Okay, ich habe das abgebrochen.";
pub const NOTHING_TO_CANCEL_TEXT: &str = "Gerade gibt es nichts abzubrechen.";

/// Keyword middleware that runs before the active step sees the turn.
///
/// Cancellation unwinds the whole stack in one go; help answers without
/// disturbing it, so a pending prompt is still pending afterwards.
/// Matching is exact on the trimmed, lowercased utterance - a sentence
/// that merely mentions "abbrechen" still reaches the dialogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelHelpInterceptor;

impl CancelHelpInterceptor {
    pub fn new() -> Self {
        Self
    }

    /// Checks the turn before any step runs.
    ///
    /// # Returns
    ///
    /// `Some(status)` when the turn was consumed here, `None` when the
    /// dialogue should process it normally
    pub async fn intercept(
        &self,
        turn: &TurnContext<'_>,
        stack: &mut DialogStack,
    ) -> Result<Option<TurnStatus>> {
        let text = turn.text().trim().to_lowercase();

        if HELP_WORDS.contains(&text.as_str()) {
            turn.send_activity(Activity::prompt(HELP_TEXT)).await?;
            return Ok(Some(TurnStatus::Waiting));
        }

        if CANCEL_WORDS.contains(&text.as_str()) {
            if stack.is_empty() {
                turn.send_notice(NOTHING_TO_CANCEL_TEXT).await?;
            } else {
                let depth = stack.depth();
                stack.clear();
                tracing::debug!(target: "termin::dialog", frames = depth, "dialogue stack cancelled");
                turn.send_notice(CANCEL_TEXT).await?;
            }
            return Ok(Some(TurnStatus::Cancelled));
        }

        Ok(None)
    }
}
