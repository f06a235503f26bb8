//! Date expression handling.
//!
//! Appointment dates travel through the dialogues as TIMEX-style strings
//! (`2020-07-22`, `XXXX-07-22`, `XXXX-WXX-3`, optionally with a `T…` time
//! suffix). This module parses them, classifies their ambiguity, renders
//! them for humans and recovers them from free-form German input.
//!
//! # Module Structure
//!
//! - `expression`: Parsed expression type (`TimexExpression`) and its tags
//! - `parse`: Free-form user input to expression (`parse_user_date`)

mod expression;
mod parse;

// Re-export public API
pub use expression::TimexExpression;
pub use parse::parse_user_date;

/// Returns the calendar portion of a TIMEX-style string, dropping any
/// time-of-day suffix.
///
/// `2020-07-22T15` becomes `2020-07-22`; strings without a time part are
/// returned unchanged.
pub fn date_part(timex: &str) -> &str {
    match timex.split_once('T') {
        Some((date, _)) => date,
        None => timex,
    }
}

/// Whether a date slot holding this expression still needs clarification.
///
/// An expression is unambiguous only when it pins down a full calendar day.
/// Anything unparsable counts as ambiguous so a malformed slot leads back
/// to the clarification loop instead of a confirmed appointment.
pub fn is_ambiguous(timex: &str) -> bool {
    TimexExpression::parse(timex)
        .map(|expr| !expr.is_definite())
        .unwrap_or(true)
}
