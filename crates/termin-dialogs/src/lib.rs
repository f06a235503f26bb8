//! The terminbot dialogue set.
//!
//! Three dialogues cooperate on one appointment: the main orchestrator
//! loops forever and consults the recognizer, the slot-filling dialogue
//! collects person, topic and date, and the date resolver clarifies
//! ambiguous dates. `AppointmentBot` wires them to a `DialogRunner` and
//! a `ConversationStore` for hosts that just want one entry point per
//! turn.
//!
//! # Module Structure
//!
//! - `main_dialog`: Orchestrator waterfall (`MainDialog`)
//! - `appointment_dialog`: Slot filling (`AppointmentDialog`)
//! - `date_resolver`: Date clarification loop (`DateResolverDialog`)
//! - `bot`: Assembled bot (`AppointmentBot`)
//!
//! # Usage
//!
//! ```ignore
//! let recognizer = Arc::new(AppointmentRecognizer::new(&LuisConfig::from_env())?);
//! let store = Arc::new(MemoryConversationStore::new());
//! let bot = AppointmentBot::new(recognizer, store)?;
//!
//! let status = bot.on_turn("conversation-1", "Termin mit Reichelt", &transport).await?;
//! ```

mod appointment_dialog;
mod bot;
mod date_resolver;
mod main_dialog;

// Re-export public API
pub use appointment_dialog::{APPOINTMENT_DIALOG_ID, AppointmentDialog};
pub use bot::AppointmentBot;
pub use date_resolver::{DATE_RESOLVER_DIALOG_ID, DateResolverDialog, DateResolverOptions};
pub use main_dialog::{
    CREATE_APPOINTMENT_INTENT, GET_WEATHER_INTENT, MAIN_DIALOG_ID, MainDialog, MainDialogOptions,
};
