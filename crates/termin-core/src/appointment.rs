//! Appointment request domain model.

use serde::{Deserialize, Serialize};

/// The slots collected for one appointment proposal.
///
/// `date` holds a TIMEX-style expression string, not a resolved calendar
/// day; ambiguity is judged by `crate::timex::is_ambiguous`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub person: Option<String>,
    pub topic: Option<String>,
    pub date: Option<String>,
}

impl AppointmentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every slot has a value.
    pub fn is_complete(&self) -> bool {
        self.person.is_some() && self.topic.is_some() && self.date.is_some()
    }
}
