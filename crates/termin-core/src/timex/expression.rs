//! Parsed TIMEX-style date expressions.

use crate::error::{Result, TerminError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

pub(crate) const WEEKDAY_NAMES: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

/// A parsed TIMEX-style date expression.
///
/// Unknown components are written as `X` runs in the raw form
/// (`XXXX-07-22` is "July 22nd of some year", `XXXX-WXX-3` is "some
/// Wednesday"). The expression is `definite` only when year, month and day
/// are all present, and only definite expressions are accepted into an
/// appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimexExpression {
    raw: String,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    /// ISO weekday from the week form, 1 = Monday.
    weekday: Option<u32>,
    has_time: bool,
}

impl TimexExpression {
    /// Parses a TIMEX-style string.
    ///
    /// Accepted calendar forms: `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and the
    /// week form `YYYY-Www-D`, each component replaceable by an `X` run.
    /// A `T…` suffix marks a time-of-day part; its content is not
    /// interpreted further.
    ///
    /// # Errors
    ///
    /// Returns a `DateExpression` error for empty input, unrecognized
    /// forms or impossible calendar dates.
    pub fn parse(timex: &str) -> Result<Self> {
        let raw = timex.trim();
        if raw.is_empty() {
            return Err(TerminError::date_expression("empty expression"));
        }

        let (date_text, time_text) = match raw.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (raw, None),
        };

        let mut expr = Self {
            raw: raw.to_string(),
            year: None,
            month: None,
            day: None,
            weekday: None,
            has_time: time_text.is_some_and(|t| !t.is_empty()),
        };

        if !date_text.is_empty() {
            let tokens: Vec<&str> = date_text.split('-').collect();
            match tokens.as_slice() {
                [year] => {
                    expr.year = field(year)?;
                }
                [year, month] => {
                    expr.year = field(year)?;
                    expr.month = field(month)?;
                }
                [year, week, weekday] if week.starts_with('W') => {
                    expr.year = field(year)?;
                    // The week number is validated but not retained; the
                    // weekday alone decides how the expression renders.
                    field::<u32>(&week[1..])?;
                    expr.weekday = field(weekday)?;
                }
                [year, month, day] => {
                    expr.year = field(year)?;
                    expr.month = field(month)?;
                    expr.day = field(day)?;
                }
                _ => {
                    return Err(TerminError::date_expression(format!(
                        "unsupported date form '{date_text}'"
                    )));
                }
            }
        }

        expr.validate()?;
        Ok(expr)
    }

    fn validate(&self) -> Result<()> {
        if let Some(weekday) = self.weekday {
            if !(1..=7).contains(&weekday) {
                return Err(TerminError::date_expression(format!(
                    "weekday out of range in '{}'",
                    self.raw
                )));
            }
        }
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => {
                if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                    return Err(TerminError::date_expression(format!(
                        "impossible calendar date '{}'",
                        self.raw
                    )));
                }
            }
            _ => {
                if let Some(month) = self.month {
                    if !(1..=12).contains(&month) {
                        return Err(TerminError::date_expression(format!(
                            "month out of range in '{}'",
                            self.raw
                        )));
                    }
                }
                if let Some(day) = self.day {
                    // Checked against a leap year so XXXX-02-29 stays valid.
                    let month = self.month.unwrap_or(1);
                    if NaiveDate::from_ymd_opt(2020, month, day).is_none() {
                        return Err(TerminError::date_expression(format!(
                            "day out of range in '{}'",
                            self.raw
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The raw TIMEX string this expression was parsed from.
    pub fn timex(&self) -> &str {
        &self.raw
    }

    /// Descriptive tags for this expression.
    ///
    /// The subset consumed by the dialogues: `date`, `definite`, `time`
    /// and `datetime`.
    pub fn types(&self) -> Vec<&'static str> {
        let mut types = Vec::new();
        let has_date = self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.weekday.is_some();
        if has_date {
            types.push("date");
        }
        if self.is_definite() {
            types.push("definite");
        }
        if self.has_time {
            types.push("time");
            if has_date {
                types.push("datetime");
            }
        }
        types
    }

    /// Whether the expression pins down a full calendar day.
    pub fn is_definite(&self) -> bool {
        self.year.is_some() && self.month.is_some() && self.day.is_some()
    }

    /// The calendar day, when definite.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    /// Renders the expression in conversational German, relative to `today`.
    ///
    /// Definite dates close to `today` become `heute` / `morgen` /
    /// `gestern` / `am kommenden {Wochentag}`; everything else falls back
    /// to the spelled-out date. Non-definite expressions render whatever
    /// is known about them.
    pub fn to_natural_language(&self, today: NaiveDate) -> String {
        if let Some(date) = self.to_date() {
            let days_ahead = date.signed_duration_since(today).num_days();
            return match days_ahead {
                0 => "heute".to_string(),
                1 => "morgen".to_string(),
                -1 => "gestern".to_string(),
                2..=6 => format!(
                    "am kommenden {}",
                    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
                ),
                _ => format!(
                    "am {}. {} {}",
                    date.day(),
                    MONTH_NAMES[date.month0() as usize],
                    date.year()
                ),
            };
        }
        if let Some(weekday) = self.weekday {
            return format!("am nächsten {}", WEEKDAY_NAMES[(weekday - 1) as usize]);
        }
        if let (Some(month), Some(day)) = (self.month, self.day) {
            return format!("am {}. {}", day, MONTH_NAMES[(month - 1) as usize]);
        }
        self.raw.clone()
    }
}

impl std::fmt::Display for TimexExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses one date component. An `X` run means "unknown".
fn field<T: std::str::FromStr>(token: &str) -> Result<Option<T>> {
    if token.is_empty() {
        return Err(TerminError::date_expression("empty date component"));
    }
    if token.chars().all(|c| c == 'X') {
        return Ok(None);
    }
    token
        .parse()
        .map(Some)
        .map_err(|_| TerminError::date_expression(format!("bad date component '{token}'")))
}
