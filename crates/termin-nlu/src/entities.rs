//! Appointment entity extraction.
//!
//! LUIS models the utterance "Termin mit Prof. Reichelt zum Thema BPA am
//! 22. Juli 2020" as composite entities: `mit` wraps the person, `zum`
//! wraps the topic, `datetime` carries TIMEX strings, and `$instance`
//! records the raw source spans. These helpers walk those paths and hand
//! the dialogues plain strings.

use crate::result::RecognizerResult;
use serde_json::Value;

/// Values extracted for one composite entity.
///
/// `resolved` holds canonical list-entity values, `mentions` the raw text
/// spans they were found in. A mention without a resolution means the
/// utterance named something the model does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeEntities {
    pub resolved: Vec<String>,
    pub mentions: Vec<String>,
}

impl CompositeEntities {
    /// The first resolved value, the one a slot gets filled with.
    pub fn best(&self) -> Option<&str> {
        self.resolved.first().map(String::as_str)
    }

    /// Something was mentioned but nothing resolved.
    pub fn has_unresolved_mention(&self) -> bool {
        self.resolved.is_empty() && !self.mentions.is_empty()
    }
}

/// Person mentions from the `mit` composite.
pub fn person_entities(result: &RecognizerResult) -> CompositeEntities {
    composite(&result.entities, "mit", "Person")
}

/// Topic mentions from the `zum` composite.
pub fn topic_entities(result: &RecognizerResult) -> CompositeEntities {
    composite(&result.entities, "zum", "Thema")
}

/// The first datetime entity's TIMEX date portion.
///
/// A time of day in the utterance is dropped here; only the calendar day
/// matters to the appointment.
pub fn appointment_date(result: &RecognizerResult) -> Option<String> {
    let timex = result
        .entities
        .get("datetime")?
        .get(0)?
        .get("timex")?
        .get(0)?
        .as_str()?;
    Some(termin_core::timex::date_part(timex).to_string())
}

fn composite(entities: &Value, name: &str, role: &str) -> CompositeEntities {
    CompositeEntities {
        resolved: resolved_values(entities, name, role),
        mentions: instance_texts(entities, name),
    }
}

/// Walks `entities.{name}[i].{role}[j][k]`: list entities resolve into
/// nested string arrays.
fn resolved_values(entities: &Value, name: &str, role: &str) -> Vec<String> {
    let mut values = Vec::new();
    let Some(composites) = entities.get(name).and_then(Value::as_array) else {
        return values;
    };
    for item in composites {
        let Some(groups) = item.get(role).and_then(Value::as_array) else {
            continue;
        };
        for group in groups {
            match group {
                Value::Array(inner) => {
                    values.extend(inner.iter().filter_map(Value::as_str).map(str::to_string));
                }
                Value::String(single) => values.push(single.clone()),
                _ => {}
            }
        }
    }
    values
}

/// Walks `entities.$instance.{name}[i].text` for the raw source spans.
fn instance_texts(entities: &Value, name: &str) -> Vec<String> {
    entities
        .get("$instance")
        .and_then(|instance| instance.get(name))
        .and_then(Value::as_array)
        .map(|spans| {
            spans
                .iter()
                .filter_map(|span| span.get("text").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
