//! Free-form German date input.

use super::expression::TimexExpression;
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Static Regexes - one per accepted written form
// ============================================================================

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

static DOTTED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{2}|\d{4})$").unwrap());

static DOTTED_NO_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.?$").unwrap());

static SPELLED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.?\s*([a-zäöüß]+)(?:\s+(\d{4}))?$").unwrap());

/// Filler words allowed in front of the actual date.
const LEADING_WORDS: [&str; 15] = [
    "am",
    "an",
    "den",
    "der",
    "zum",
    "für",
    "fuer",
    "nächsten",
    "naechsten",
    "nächste",
    "naechste",
    "kommenden",
    "kommende",
    "diesen",
    "dieser",
];

const WEEKDAYS: [(&str, u32); 8] = [
    ("montag", 1),
    ("dienstag", 2),
    ("mittwoch", 3),
    ("donnerstag", 4),
    ("freitag", 5),
    ("samstag", 6),
    ("sonnabend", 6),
    ("sonntag", 7),
];

const MONTH_ALIASES: [(&str, u32); 26] = [
    ("januar", 1),
    ("jan", 1),
    ("februar", 2),
    ("feb", 2),
    ("märz", 3),
    ("maerz", 3),
    ("mär", 3),
    ("mrz", 3),
    ("april", 4),
    ("apr", 4),
    ("mai", 5),
    ("juni", 6),
    ("jun", 6),
    ("juli", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("oktober", 10),
    ("okt", 10),
    ("november", 11),
    ("nov", 11),
    ("dezember", 12),
    ("dez", 12),
];

/// Recovers a date expression from free-form German input.
///
/// Handles relative words (`heute`, `morgen`, `übermorgen`), weekday names
/// (which stay ambiguous and go back through clarification), numeric forms
/// (`22.07.2020`, `22.07.`, ISO) and spelled-out months (`22. Juli 2020`).
/// Leading filler such as `am` or `nächsten` is ignored. Returns `None`
/// when nothing matches or the named day does not exist.
pub fn parse_user_date(input: &str, today: NaiveDate) -> Option<TimexExpression> {
    let normalized = input.trim().to_lowercase();
    let text = strip_leading_words(&normalized);
    if text.is_empty() {
        return None;
    }

    if let Some(days) = relative_days(text) {
        let date = today + Duration::days(days);
        return from_timex(&date.format("%Y-%m-%d").to_string());
    }

    if let Some((_, weekday)) = WEEKDAYS.iter().find(|(name, _)| *name == text) {
        return from_timex(&format!("XXXX-WXX-{weekday}"));
    }

    if let Some(caps) = ISO_DATE.captures(text) {
        return from_timex(&format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]));
    }

    if let Some(caps) = DOTTED_DATE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let year = if caps[3].len() == 2 { 2000 + year } else { year };
        return from_timex(&format!("{year:04}-{month:02}-{day:02}"));
    }

    if let Some(caps) = DOTTED_NO_YEAR.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        return from_timex(&format!("XXXX-{month:02}-{day:02}"));
    }

    if let Some(caps) = SPELLED_DATE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        return match caps.get(3) {
            Some(year) => {
                let year: i32 = year.as_str().parse().ok()?;
                from_timex(&format!("{year:04}-{month:02}-{day:02}"))
            }
            None => from_timex(&format!("XXXX-{month:02}-{day:02}")),
        };
    }

    None
}

/// Validation happens in the expression parser, so impossible dates such
/// as `31.02.2021` fall out as `None` here.
fn from_timex(timex: &str) -> Option<TimexExpression> {
    TimexExpression::parse(timex).ok()
}

fn relative_days(text: &str) -> Option<i64> {
    match text {
        "heute" => Some(0),
        "morgen" => Some(1),
        "übermorgen" | "uebermorgen" => Some(2),
        "gestern" => Some(-1),
        _ => None,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    MONTH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, month)| *month)
}

fn strip_leading_words(mut text: &str) -> &str {
    'outer: loop {
        for word in LEADING_WORDS {
            if let Some(rest) = text.strip_prefix(word) {
                if let Some(rest) = rest.strip_prefix(' ') {
                    text = rest.trim_start();
                    continue 'outer;
                }
            }
        }
        return text;
    }
}
