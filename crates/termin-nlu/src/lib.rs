//! NLU adapter for the terminbot assistant.
//!
//! Wraps an external LUIS prediction endpoint behind the `Recognizer`
//! trait and extracts the appointment entities the dialogues care about.
//! The dialogues only ever see `RecognizerResult`; whether it came from a
//! live endpoint or a test double is invisible to them.
//!
//! # Module Structure
//!
//! - `result`: Recognition results in the LUIS v3 shape (`RecognizerResult`)
//! - `config`: Endpoint settings from the environment (`LuisConfig`)
//! - `luis`: Prediction HTTP client (`LuisClient`)
//! - `entities`: Appointment entity extraction (`CompositeEntities`)
//! - `recognizer`: The adapter seam (`Recognizer`, `AppointmentRecognizer`)

pub mod config;
pub mod entities;
pub mod luis;
pub mod recognizer;
pub mod result;

// Re-export public API
pub use config::LuisConfig;
pub use entities::{CompositeEntities, appointment_date, person_entities, topic_entities};
pub use luis::LuisClient;
pub use recognizer::{AppointmentRecognizer, Recognizer};
pub use result::{IntentScore, NONE_INTENT, RecognizerResult};
