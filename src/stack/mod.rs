// ABOUTME: Stack provisioning driven to a terminal status by polling.
// ABOUTME: Exports the status classification, state machine, and parameter schema.

mod error;
mod machine;
mod params;
mod status;

pub use error::{StackError, StackErrorKind};
pub use machine::{
    DEFAULT_POLL_INTERVAL, PollOutcome, Sleeper, StackMachine, Submitted, TokioSleeper,
};
pub use params::{PRICE_CLASSES, StackParameters};
pub use status::StackStatus;
