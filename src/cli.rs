//! CLI domain: parse, route and output only.
//! No ledger logic; the route table hands invocations to the dispatcher.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::{CommandOutput, RunContext};
