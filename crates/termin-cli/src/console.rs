//! Terminal output for bot activities.

use async_trait::async_trait;
use colored::Colorize;
use termin_core::error::Result;
use termin_core::transport::{Activity, InputHint, Transport};

/// Prints every activity to stdout, one colored line per text line.
///
/// Questions the bot waits on stand out from plain notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTransport;

impl ConsoleTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_activity(&self, activity: Activity) -> Result<()> {
        for line in activity.text.lines() {
            match activity.input_hint {
                InputHint::ExpectingInput => println!("{}", line.bright_blue()),
                InputHint::IgnoringInput => println!("{}", line.blue()),
            }
        }
        Ok(())
    }
}
