// ABOUTME: Command module aggregator for the edgeship CLI.
// ABOUTME: Re-exports deploy, prune, stack, and status command handlers.

mod deploy;
mod prompt;
mod prune;
mod stack;
mod status;
mod workspace;

pub use deploy::{DeployOptions, deploy};
pub use prune::{PruneOptions, prune};
pub use stack::stack;
pub use status::status;
pub use workspace::Workspace;
