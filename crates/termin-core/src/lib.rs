//! Core engine for the terminbot assistant.
//!
//! Hosts the dialogue stack runner, the prompt and interception machinery,
//! TIMEX-style date handling and the conversation state model. Concrete
//! dialogues and the NLU adapter live in their own crates on top of this
//! one.

pub mod appointment;
pub mod dialog;
pub mod error;
pub mod store;
pub mod timex;
pub mod transport;

// Re-export common error type
pub use error::TerminError;
