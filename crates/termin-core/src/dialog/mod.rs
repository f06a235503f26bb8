//! Dialogue orchestration engine.
//!
//! Dialogues are explicit step machines run against a per-conversation
//! stack of frames. A turn either cascades through steps synchronously or
//! suspends on a prompt; nested dialogues return values to their parents
//! through the stack.
//!
//! # Module Structure
//!
//! - `stack`: Persistent stack state (`DialogStack`, `StackFrame`)
//! - `prompt`: Suspending prompts and answer parsing (`PromptRequest`)
//! - `step`: Step contract (`Dialog`, `StepContext`, `StepAction`)
//! - `interceptor`: Cancel/help middleware (`CancelHelpInterceptor`)
//! - `runner`: Turn driver (`DialogRunner`, `TurnStatus`)
//!
//! # Usage
//!
//! ```ignore
//! use termin_core::dialog::{Dialog, DialogRunner, DialogStack, TurnContext};
//!
//! let runner = DialogRunner::builder()
//!     .root("main")
//!     .register(my_dialog)
//!     .build()?;
//! let status = runner.run(&mut stack, &turn).await?;
//! ```

mod interceptor;
mod prompt;
mod runner;
mod stack;
mod step;

// Re-export public API
pub use interceptor::{CANCEL_TEXT, CancelHelpInterceptor, HELP_TEXT, NOTHING_TO_CANCEL_TEXT};
pub use prompt::{PromptKind, PromptRequest, parse_confirmation};
pub use runner::{DialogRunner, DialogRunnerBuilder, TurnStatus};
pub use stack::{DialogStack, StackFrame};
pub use step::{Dialog, StepAction, StepContext, TurnContext};
